use crate::domain::errors::ValidationError;

/// Recurrence period of an income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Hour,
    Day,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code.trim().to_lowercase().as_str() {
            "hour" => Ok(Period::Hour),
            "day" => Ok(Period::Day),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            _ => Err(ValidationError::UnknownPeriod(code.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }

    /// Multiplier that turns one period's amount into a monthly amount.
    /// A month is counted as 30 days of 24 hours.
    pub fn monthly_factor(&self) -> f64 {
        match self {
            Period::Hour => 24.0 * 30.0,
            Period::Day => 30.0,
            Period::Month => 1.0,
            Period::Quarter => 1.0 / 3.0,
            Period::Year => 1.0 / 12.0,
        }
    }
}
