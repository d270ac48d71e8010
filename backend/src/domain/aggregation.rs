//! Aggregation of the ledger into monthly totals.

use super::ledger::{Collection, Ledger};
use super::models::{Currency, ExchangeRates};
use super::normalizer::monthly_equivalent;

/// Monthly sums in one display currency. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyTotals {
    pub income_total: f64,
    pub expense_total: f64,
    /// income_total - expense_total
    pub net: f64,
}

/// Recompute the monthly totals of `ledger` in `target`.
///
/// Sums in insertion order so repeated calls give bit-identical results.
pub fn recompute(ledger: &Ledger, target: Currency, rates: &ExchangeRates) -> MonthlyTotals {
    let income_total = collection_total(&ledger.incomes, target, rates);
    let expense_total = collection_total(&ledger.expenses, target, rates);

    MonthlyTotals {
        income_total,
        expense_total,
        net: income_total - expense_total,
    }
}

fn collection_total(collection: &Collection, target: Currency, rates: &ExchangeRates) -> f64 {
    collection
        .items()
        .iter()
        .map(|item| monthly_equivalent(item, target, rates))
        .fold(0.0, |total, amount| total + amount)
}
