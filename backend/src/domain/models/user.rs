use super::{Currency, ExchangeRates};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub login: String,
    pub last_visit: String,
    pub avatar: String,
    pub rates: ExchangeRates,
    /// Currency every total is displayed in
    pub checked_curr: Currency,
    /// Previous display currency, kept only so the client can animate the switch
    pub last_curr: String,
    /// Share of net monthly income put aside, in [0, 1]
    pub checked_percent: f64,
    pub notes: String,
}
