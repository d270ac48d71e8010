//! Session state: everything one user edits between loading and saving.
//!
//! The application shell owns a single [`SessionState`] and calls these
//! methods in response to user actions. Nothing here persists or renders; the
//! caller recomputes with [`SessionState::totals`] after a mutation and then
//! encodes the state when it wants to save.

use shared::SliderRange;
use tracing::{debug, info};

use super::aggregation::{recompute, MonthlyTotals};
use super::errors::{LedgerError, ValidationError};
use super::item_form::ItemDraft;
use super::ledger::Ledger;
use super::models::{Currency, Item, ItemFields, ItemId, ItemKind, Savings, User};
use super::savings_policy;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: User,
    pub savings: Savings,
    pub ledger: Ledger,
}

impl SessionState {
    pub fn new(user: User, savings: Savings, ledger: Ledger) -> Self {
        Self { user, savings, ledger }
    }

    /// Monthly totals in the current display currency
    pub fn totals(&self) -> MonthlyTotals {
        recompute(&self.ledger, self.user.checked_curr, &self.user.rates)
    }

    /// Amount of the net monthly income currently set aside for savings
    pub fn allocation(&self) -> f64 {
        savings_policy::allocation(self.totals().net, self.user.checked_percent)
    }

    pub fn allocation_slider(&self) -> SliderRange {
        savings_policy::allocation_slider(self.totals().net, self.user.checked_percent)
    }

    pub fn list_items(&self, kind: ItemKind) -> &[Item] {
        self.ledger.list_items(kind)
    }

    pub fn add_item(&mut self, kind: ItemKind, fields: ItemFields) -> Result<ItemId, LedgerError> {
        let id = self.ledger.add_item(kind, fields)?;
        info!("{}: added {} {}", self.user.login, kind, id);
        Ok(id)
    }

    pub fn add_item_from_draft(&mut self, kind: ItemKind, draft: &ItemDraft) -> Result<ItemId, LedgerError> {
        let fields = draft.validate()?;
        self.add_item(kind, fields)
    }

    pub fn edit_item(&mut self, kind: ItemKind, id: ItemId, fields: ItemFields) -> Result<(), LedgerError> {
        self.ledger.edit_item(kind, id, fields)?;
        info!("{}: edited {} {}", self.user.login, kind, id);
        Ok(())
    }

    pub fn edit_item_from_draft(&mut self, kind: ItemKind, id: ItemId, draft: &ItemDraft) -> Result<(), LedgerError> {
        if self.ledger.get_item(kind, id).is_none() {
            return Err(LedgerError::NotFound { kind, id });
        }
        let fields = draft.validate()?;
        self.edit_item(kind, id, fields)
    }

    pub fn delete_item(&mut self, kind: ItemKind, id: ItemId) -> Result<Item, LedgerError> {
        let removed = self.ledger.delete_item(kind, id)?;
        info!("{}: deleted {} {}", self.user.login, kind, id);
        Ok(removed)
    }

    /// Switch the display currency. Free money is re-expressed in the new
    /// currency and the old one is remembered in `last_curr`.
    pub fn set_display_currency(&mut self, currency: Currency) {
        let previous = self.user.checked_curr;
        if previous == currency {
            return;
        }

        self.savings.free_money = savings_policy::convert_free_money(
            self.savings.free_money,
            previous,
            currency,
            &self.user.rates,
        );
        self.user.last_curr = previous.display_code().to_string();
        self.user.checked_curr = currency;

        info!(
            "{}: display currency {} -> {}",
            self.user.login,
            previous.display_code(),
            currency.display_code()
        );
    }

    /// Advance to the next display currency (rub, eur, usd, rub, ...)
    pub fn cycle_display_currency(&mut self) -> Currency {
        let next = self.user.checked_curr.next();
        self.set_display_currency(next);
        next
    }

    /// Set the savings share, clamped to [0, 1]. NaN leaves the share unchanged.
    pub fn set_checked_percent(&mut self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        self.user.checked_percent = percent.clamp(0.0, 1.0);
        debug!("{}: checked percent {}", self.user.login, self.user.checked_percent);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.user.notes = notes.into();
    }

    pub fn toggle_deposit(&mut self, enabled: bool) {
        savings_policy::toggle_deposit(&mut self.savings, enabled);
    }

    pub fn set_capitalization(&mut self, enabled: bool) {
        savings_policy::set_capitalization(&mut self.savings, enabled);
    }

    pub fn set_free_money(&mut self, amount: f64) -> Result<(), ValidationError> {
        savings_policy::set_free_money(&mut self.savings, amount)
    }

    pub fn set_interest_percent(&mut self, percent: f64) -> Result<(), ValidationError> {
        savings_policy::set_interest_percent(&mut self.savings, percent)
    }

    /// Saving needs a known user
    pub fn can_persist(&self) -> bool {
        !self.user.login.trim().is_empty()
    }

    /// The statistics page needs at least one income and one expense
    pub fn ready_for_statistics(&self) -> bool {
        !self.ledger.incomes.is_empty() && !self.ledger.expenses.is_empty()
    }
}
