//! Item form input handling.
//!
//! The add/edit dialog hands over plain strings: a title, an icon name, the
//! currency and period codes from two selects, and a formatted amount such as
//! `"12 500"`. This module turns those strings into validated [`ItemFields`].

use super::errors::ValidationError;
use super::ledger::validate_fields;
use super::models::{Currency, ItemFields, Period};

/// Raw strings from the item dialog
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemDraft {
    pub title: String,
    pub icon: String,
    pub currency: String,
    pub period: String,
    pub value: String,
}

impl ItemDraft {
    pub fn new(
        title: impl Into<String>,
        icon: impl Into<String>,
        currency: impl Into<String>,
        period: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            currency: currency.into(),
            period: period.into(),
            value: value.into(),
        }
    }

    /// Parse and validate. The first problem found is reported.
    pub fn validate(&self) -> Result<ItemFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let currency = Currency::from_code(&self.currency)?;
        let period = Period::from_code(&self.period)?;
        let value = parse_amount(&self.value)?;

        let fields = ItemFields::new(title, self.icon.trim(), currency, period, value);
        validate_fields(&fields)?;
        Ok(fields)
    }
}

/// Parse an amount as typed or formatted by the client.
///
/// Digit group separators (spaces, no-break spaces, commas) are dropped before
/// parsing. Only finite numbers are accepted.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Err(ValidationError::InvalidValue(raw.to_string()));
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidValue(raw.to_string())),
    }
}

/// Format an amount the way it is stored in the document: shortest digit
/// string, no exponent, no trailing `.0`.
pub fn format_amount(value: f64) -> String {
    format!("{}", value)
}
