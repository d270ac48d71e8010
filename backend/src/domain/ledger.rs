//! Ledger store: the income and expense collections of one session.
//!
//! Both collections share one implementation, parameterized by [`ItemKind`].
//! Items keep their insertion order for display and summation. Ids are handed
//! out from a per-collection high-water mark, so an id freed by a delete is
//! never issued again during the session.

use tracing::{debug, warn};

use super::errors::{LedgerError, ValidationError};
use super::models::{Item, ItemFields, ItemId, ItemKind};

/// Check the invariants every stored item must satisfy.
pub fn validate_fields(fields: &ItemFields) -> Result<(), ValidationError> {
    if fields.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if !fields.value.is_finite() {
        return Err(ValidationError::InvalidValue(fields.value.to_string()));
    }
    if fields.value <= 0.0 {
        return Err(ValidationError::NonPositiveValue);
    }
    Ok(())
}

fn normalized(mut fields: ItemFields) -> ItemFields {
    let trimmed = fields.title.trim();
    if trimmed.len() != fields.title.len() {
        fields.title = trimmed.to_string();
    }
    fields
}

#[derive(Debug, Clone)]
pub struct Collection {
    kind: ItemKind,
    items: Vec<Item>,
    /// Highest id ever issued or loaded in this session
    last_id: ItemId,
}

/// Equality ignores the high-water mark, which is session-only state.
impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.items == other.items
    }
}

impl Collection {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            last_id: 0,
        }
    }

    /// Build a collection from already validated items, in the given order.
    pub(crate) fn from_items(kind: ItemKind, items: Vec<Item>) -> Self {
        let last_id = items.iter().map(|item| item.id).max().unwrap_or(0);
        Self { kind, items, last_id }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    fn position(&self, id: ItemId) -> Result<usize, LedgerError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| {
                warn!("No {} with id {}", self.kind, id);
                LedgerError::NotFound { kind: self.kind, id }
            })
    }

    pub fn add(&mut self, fields: ItemFields) -> Result<ItemId, LedgerError> {
        validate_fields(&fields)?;

        let id = self.last_id.checked_add(1).ok_or(LedgerError::IdsExhausted { kind: self.kind })?;
        self.items.push(Item::from_fields(id, normalized(fields)));
        self.last_id = id;

        debug!("Added {} {}", self.kind, id);
        Ok(id)
    }

    /// Replace every mutable field of an existing item.
    pub fn edit(&mut self, id: ItemId, fields: ItemFields) -> Result<(), LedgerError> {
        let index = self.position(id)?;
        validate_fields(&fields)?;

        self.items[index].replace_fields(normalized(fields));
        debug!("Edited {} {}", self.kind, id);
        Ok(())
    }

    /// Remove an item. Remaining ids are left as they are.
    pub fn delete(&mut self, id: ItemId) -> Result<Item, LedgerError> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        debug!("Deleted {} {}", self.kind, id);
        Ok(removed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub incomes: Collection,
    pub expenses: Collection,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            incomes: Collection::new(ItemKind::Income),
            expenses: Collection::new(ItemKind::Expense),
        }
    }

    pub fn collection(&self, kind: ItemKind) -> &Collection {
        match kind {
            ItemKind::Income => &self.incomes,
            ItemKind::Expense => &self.expenses,
        }
    }

    pub fn collection_mut(&mut self, kind: ItemKind) -> &mut Collection {
        match kind {
            ItemKind::Income => &mut self.incomes,
            ItemKind::Expense => &mut self.expenses,
        }
    }

    pub fn add_item(&mut self, kind: ItemKind, fields: ItemFields) -> Result<ItemId, LedgerError> {
        self.collection_mut(kind).add(fields)
    }

    pub fn edit_item(&mut self, kind: ItemKind, id: ItemId, fields: ItemFields) -> Result<(), LedgerError> {
        self.collection_mut(kind).edit(id, fields)
    }

    pub fn delete_item(&mut self, kind: ItemKind, id: ItemId) -> Result<Item, LedgerError> {
        self.collection_mut(kind).delete(id)
    }

    pub fn list_items(&self, kind: ItemKind) -> &[Item] {
        self.collection(kind).items()
    }

    pub fn get_item(&self, kind: ItemKind, id: ItemId) -> Option<&Item> {
        self.collection(kind).get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Currency, Period};

    fn fields(title: &str, value: f64) -> ItemFields {
        ItemFields::new(title, "wallet", Currency::Rub, Period::Month, value)
    }

    fn ids(ledger: &Ledger, kind: ItemKind) -> Vec<ItemId> {
        ledger.list_items(kind).iter().map(|item| item.id).collect()
    }

    #[test]
    fn test_add_assigns_sequential_ids_per_kind() {
        let mut ledger = Ledger::new();

        assert_eq!(ledger.add_item(ItemKind::Income, fields("Salary", 1000.0)).unwrap(), 1);
        assert_eq!(ledger.add_item(ItemKind::Income, fields("Bonus", 200.0)).unwrap(), 2);
        assert_eq!(ledger.add_item(ItemKind::Expense, fields("Rent", 300.0)).unwrap(), 1);

        assert_eq!(ids(&ledger, ItemKind::Income), vec![1, 2]);
        assert_eq!(ids(&ledger, ItemKind::Expense), vec![1]);
    }

    #[test]
    fn test_add_trims_title() {
        let mut ledger = Ledger::new();
        let id = ledger.add_item(ItemKind::Income, fields("  Salary ", 10.0)).unwrap();

        assert_eq!(ledger.get_item(ItemKind::Income, id).unwrap().title, "Salary");
    }

    #[test]
    fn test_add_rejects_invalid_fields_without_changing_state() {
        let mut ledger = Ledger::new();
        ledger.add_item(ItemKind::Income, fields("Salary", 1000.0)).unwrap();
        let before = ledger.clone();

        assert_eq!(
            ledger.add_item(ItemKind::Income, fields("   ", 10.0)),
            Err(LedgerError::Validation(ValidationError::EmptyTitle))
        );
        assert_eq!(
            ledger.add_item(ItemKind::Income, fields("Gift", 0.0)),
            Err(LedgerError::Validation(ValidationError::NonPositiveValue))
        );
        assert_eq!(
            ledger.add_item(ItemKind::Income, fields("Gift", -5.0)),
            Err(LedgerError::Validation(ValidationError::NonPositiveValue))
        );
        assert!(matches!(
            ledger.add_item(ItemKind::Income, fields("Gift", f64::INFINITY)),
            Err(LedgerError::Validation(ValidationError::InvalidValue(_)))
        ));

        assert_eq!(ledger, before);
        // Failed adds do not consume ids either
        assert_eq!(ledger.add_item(ItemKind::Income, fields("Gift", 5.0)).unwrap(), 2);
    }

    #[test]
    fn test_edit_replaces_all_fields() {
        let mut ledger = Ledger::new();
        let id = ledger.add_item(ItemKind::Expense, fields("Rent", 300.0)).unwrap();

        let replacement = ItemFields::new("Mortgage", "house", Currency::Eur, Period::Year, 4800.0);
        ledger.edit_item(ItemKind::Expense, id, replacement.clone()).unwrap();

        let item = ledger.get_item(ItemKind::Expense, id).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.fields(), replacement);
    }

    #[test]
    fn test_edit_unknown_id_is_not_found() {
        let mut ledger = Ledger::new();
        ledger.add_item(ItemKind::Income, fields("Salary", 1000.0)).unwrap();

        assert_eq!(
            ledger.edit_item(ItemKind::Expense, 1, fields("Rent", 1.0)),
            Err(LedgerError::NotFound { kind: ItemKind::Expense, id: 1 })
        );
    }

    #[test]
    fn test_edit_with_invalid_fields_keeps_old_item() {
        let mut ledger = Ledger::new();
        let id = ledger.add_item(ItemKind::Income, fields("Salary", 1000.0)).unwrap();

        let result = ledger.edit_item(ItemKind::Income, id, fields("", 2000.0));
        assert!(matches!(result, Err(LedgerError::Validation(ValidationError::EmptyTitle))));
        assert_eq!(ledger.get_item(ItemKind::Income, id).unwrap().value, 1000.0);
    }

    #[test]
    fn test_delete_keeps_other_ids_and_order() {
        let mut ledger = Ledger::new();
        for (title, value) in [("A", 1.0), ("B", 2.0), ("C", 3.0)] {
            ledger.add_item(ItemKind::Expense, fields(title, value)).unwrap();
        }

        let removed = ledger.delete_item(ItemKind::Expense, 2).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(ids(&ledger, ItemKind::Expense), vec![1, 3]);

        assert_eq!(
            ledger.delete_item(ItemKind::Expense, 2),
            Err(LedgerError::NotFound { kind: ItemKind::Expense, id: 2 })
        );
    }

    #[test]
    fn test_add_then_delete_does_not_reuse_id() {
        let mut ledger = Ledger::new();
        ledger.add_item(ItemKind::Income, fields("Salary", 1000.0)).unwrap();
        let before = ledger.clone();

        let id = ledger.add_item(ItemKind::Income, fields("Temp", 50.0)).unwrap();
        ledger.delete_item(ItemKind::Income, id).unwrap();

        assert_eq!(ledger, before);
        assert_eq!(ledger.add_item(ItemKind::Income, fields("Next", 10.0)).unwrap(), id + 1);
    }

    #[test]
    fn test_loaded_collection_continues_after_highest_id() {
        let items = vec![
            Item::from_fields(7, fields("Old", 1.0)),
            Item::from_fields(3, fields("Older", 1.0)),
        ];
        let mut collection = Collection::from_items(ItemKind::Income, items);

        assert_eq!(collection.add(fields("New", 1.0)).unwrap(), 8);
        let order: Vec<ItemId> = collection.items().iter().map(|item| item.id).collect();
        assert_eq!(order, vec![7, 3, 8]);
    }

    #[test]
    fn test_exhausted_ids() {
        let items = vec![Item::from_fields(ItemId::MAX, fields("Last", 1.0))];
        let mut collection = Collection::from_items(ItemKind::Expense, items);

        assert_eq!(
            collection.add(fields("Overflow", 1.0)),
            Err(LedgerError::IdsExhausted { kind: ItemKind::Expense })
        );
    }
}
