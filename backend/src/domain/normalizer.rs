//! Currency and period normalization.
//!
//! Every item is stored in its own currency and recurrence period. Before
//! items can be summed they are brought to a common footing: a monthly amount
//! in the user's display currency.

use tracing::warn;

use super::models::{Currency, ExchangeRates, Item};

/// Monthly amount of `item` expressed in `target`.
///
/// Always finite. An item whose value or exchange rate yields a non-finite
/// result contributes 0 so one broken record cannot spoil a whole total.
pub fn monthly_equivalent(item: &Item, target: Currency, rates: &ExchangeRates) -> f64 {
    let monthly = item.value * item.period.monthly_factor();
    let converted = rates.convert(monthly, item.currency, target);

    if converted.is_finite() {
        converted
    } else {
        warn!(
            "Item {} ({:?}) has no finite monthly value in {}; counting it as 0",
            item.id,
            item.title,
            target.display_code()
        );
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Period;

    fn rates() -> ExchangeRates {
        ExchangeRates::new(0.015, 0.0125)
    }

    fn item(currency: Currency, period: Period, value: f64) -> Item {
        Item {
            id: 1,
            title: "Test".to_string(),
            icon: "wallet".to_string(),
            currency,
            period,
            value,
        }
    }

    #[test]
    fn test_same_currency_monthly_is_identity() {
        for currency in [Currency::Rub, Currency::Usd, Currency::Eur] {
            for value in [0.0, 1.0, 1234.56, 1e9] {
                let result = monthly_equivalent(&item(currency, Period::Month, value), currency, &rates());
                assert_eq!(result, value);
            }
        }
    }

    #[test]
    fn test_period_factors_applied() {
        let r = rates();
        assert_eq!(monthly_equivalent(&item(Currency::Rub, Period::Hour, 2.0), Currency::Rub, &r), 1440.0);
        assert_eq!(monthly_equivalent(&item(Currency::Rub, Period::Day, 100.0), Currency::Rub, &r), 3000.0);
        assert!((monthly_equivalent(&item(Currency::Rub, Period::Quarter, 300.0), Currency::Rub, &r) - 100.0).abs() < 1e-9);
        assert!((monthly_equivalent(&item(Currency::Rub, Period::Year, 1200.0), Currency::Rub, &r) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_currency_conversion() {
        let r = ExchangeRates::new(0.02, 0.01);

        // 10 dollars a month are 500 rub
        let dollars = item(Currency::Usd, Period::Month, 10.0);
        assert!((monthly_equivalent(&dollars, Currency::Rub, &r) - 500.0).abs() < 1e-9);

        // and 5 euro
        assert!((monthly_equivalent(&dollars, Currency::Eur, &r) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_in_value() {
        let r = rates();
        for period in [Period::Hour, Period::Day, Period::Month, Period::Quarter, Period::Year] {
            for currency in [Currency::Rub, Currency::Usd, Currency::Eur] {
                let single = monthly_equivalent(&item(currency, period, 37.5), Currency::Eur, &r);
                let double = monthly_equivalent(&item(currency, period, 75.0), Currency::Eur, &r);
                assert!((double - 2.0 * single).abs() <= 1e-9 * double.abs().max(1.0));
            }
        }
    }

    #[test]
    fn test_broken_rate_contributes_zero() {
        let broken = ExchangeRates::new(0.0, 0.01);

        let result = monthly_equivalent(&item(Currency::Usd, Period::Month, 10.0), Currency::Rub, &broken);
        assert_eq!(result, 0.0);

        let result = monthly_equivalent(&item(Currency::Rub, Period::Month, f64::NAN), Currency::Rub, &rates());
        assert_eq!(result, 0.0);
    }
}
