//! Currencies and the exchange rates between them.
//!
//! Rates are expressed relative to the rub: `usd` is how many dollars one rub
//! buys. Converting from A to B is therefore `amount / rate(A) * rate(B)`.

use crate::domain::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    Rub,
    Usd,
    Eur,
}

impl Currency {
    /// Parse either spelling. The user record says `usd`/`eur`, item records
    /// say `doll`/`euro`.
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code.trim().to_lowercase().as_str() {
            "rub" => Ok(Currency::Rub),
            "usd" | "doll" => Ok(Currency::Usd),
            "eur" | "euro" => Ok(Currency::Eur),
            _ => Err(ValidationError::UnknownCurrency(code.to_string())),
        }
    }

    /// Code used for the display currency (`checkedCurr`)
    pub fn display_code(&self) -> &'static str {
        match self {
            Currency::Rub => "rub",
            Currency::Usd => "usd",
            Currency::Eur => "eur",
        }
    }

    /// Code used inside item records
    pub fn item_code(&self) -> &'static str {
        match self {
            Currency::Rub => "rub",
            Currency::Usd => "doll",
            Currency::Eur => "euro",
        }
    }

    /// Order in which the currency sign cycles: rub, eur, usd, rub
    pub fn next(&self) -> Self {
        match self {
            Currency::Rub => Currency::Eur,
            Currency::Eur => Currency::Usd,
            Currency::Usd => Currency::Rub,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRates {
    pub usd: f64,
    pub eur: f64,
}

impl ExchangeRates {
    pub fn new(usd: f64, eur: f64) -> Self {
        Self { usd, eur }
    }

    pub fn rate_of(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Rub => 1.0,
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
        }
    }

    /// Convert without any finiteness guard; callers decide what a NaN means.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        amount / self.rate_of(from) * self.rate_of(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_accepts_both_spellings() {
        assert_eq!(Currency::from_code("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_code("doll").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_code("EUR").unwrap(), Currency::Eur);
        assert_eq!(Currency::from_code("euro").unwrap(), Currency::Eur);
        assert_eq!(Currency::from_code(" rub ").unwrap(), Currency::Rub);

        assert!(matches!(
            Currency::from_code("gbp"),
            Err(ValidationError::UnknownCurrency(code)) if code == "gbp"
        ));
    }

    #[test]
    fn test_codes_per_context() {
        assert_eq!(Currency::Usd.display_code(), "usd");
        assert_eq!(Currency::Usd.item_code(), "doll");
        assert_eq!(Currency::Eur.display_code(), "eur");
        assert_eq!(Currency::Eur.item_code(), "euro");
        assert_eq!(Currency::Rub.item_code(), Currency::Rub.display_code());
    }

    #[test]
    fn test_cycle_visits_every_currency() {
        assert_eq!(Currency::Rub.next(), Currency::Eur);
        assert_eq!(Currency::Eur.next(), Currency::Usd);
        assert_eq!(Currency::Usd.next(), Currency::Rub);
    }

    #[test]
    fn test_convert() {
        let rates = ExchangeRates::new(0.02, 0.01);

        assert_eq!(rates.convert(100.0, Currency::Rub, Currency::Usd), 2.0);
        assert_eq!(rates.convert(2.0, Currency::Usd, Currency::Rub), 100.0);
        assert!((rates.convert(1.0, Currency::Usd, Currency::Eur) - 0.5).abs() < 1e-12);
        assert_eq!(rates.convert(42.0, Currency::Eur, Currency::Eur), 42.0);
    }
}
