//! Savings policy: how much of the net monthly income goes to savings, and the
//! rules tying the deposit options together.
//!
//! Interest accrual is not modelled; the deposit fields are plain state.

use shared::SliderRange;

use super::errors::ValidationError;
use super::models::{Currency, ExchangeRates, Savings};

/// Number of steps the savings slider is divided into
pub const SLIDER_STEPS: f64 = 20.0;

/// Portion of `net` set aside for savings.
///
/// Disposable income cannot be negative for allocation purposes, so a
/// negative net allocates nothing. The result always lies in [0, net].
pub fn allocation(net: f64, checked_percent: f64) -> f64 {
    if !net.is_finite() || net <= 0.0 {
        return 0.0;
    }
    let share = net * checked_percent;
    if share.is_nan() {
        return 0.0;
    }
    share.clamp(0.0, net)
}

/// Slider shown on the statistics page: from 0 to |net| in twenty steps,
/// starting at the current allocation.
pub fn allocation_slider(net: f64, checked_percent: f64) -> SliderRange {
    let max = if net.is_finite() { net.abs() } else { 0.0 };
    SliderRange {
        min: 0.0,
        max,
        step: max / SLIDER_STEPS,
        start: allocation(net, checked_percent),
    }
}

/// Turn the deposit on or off. Switching it off also switches off
/// capitalization; the interest percent is kept but unused.
pub fn toggle_deposit(savings: &mut Savings, enabled: bool) {
    savings.deposit = enabled;
    if !enabled {
        savings.capitalization = false;
    }
}

/// Capitalization only applies to money on deposit.
pub fn set_capitalization(savings: &mut Savings, enabled: bool) {
    savings.capitalization = enabled && savings.deposit;
}

pub fn set_free_money(savings: &mut Savings, amount: f64) -> Result<(), ValidationError> {
    savings.free_money = non_negative(amount, "Free money")?;
    Ok(())
}

pub fn set_interest_percent(savings: &mut Savings, percent: f64) -> Result<(), ValidationError> {
    savings.percent = non_negative(percent, "Interest percent")?;
    Ok(())
}

pub(crate) fn non_negative(value: f64, what: &'static str) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue(value.to_string()));
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeAmount(what));
    }
    Ok(value)
}

/// Free money re-expressed in another display currency, rounded to whole units.
/// Falls back to the unconverted amount if the rates produce nothing usable.
pub fn convert_free_money(amount: f64, from: Currency, to: Currency, rates: &ExchangeRates) -> f64 {
    let converted = rates.convert(amount, from, to);
    if converted.is_finite() {
        converted.round()
    } else {
        amount
    }
}
