//! Domain model for income and expense items.
use std::fmt;

use super::{Currency, Period};

pub type ItemId = u32;

/// Which collection an item belongs to. Ids are unique per kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Income,
    Expense,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Income => "income",
            ItemKind::Expense => "expense",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Symbolic icon name, e.g. "wallet" or "cart"
    pub icon: String,
    pub currency: Currency,
    pub period: Period,
    /// Amount per period, in `currency`
    pub value: f64,
}

/// The mutable part of an item. Edits always replace all of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub title: String,
    pub icon: String,
    pub currency: Currency,
    pub period: Period,
    pub value: f64,
}

impl ItemFields {
    pub fn new(
        title: impl Into<String>,
        icon: impl Into<String>,
        currency: Currency,
        period: Period,
        value: f64,
    ) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            currency,
            period,
            value,
        }
    }
}

impl Item {
    pub fn from_fields(id: ItemId, fields: ItemFields) -> Self {
        Self {
            id,
            title: fields.title,
            icon: fields.icon,
            currency: fields.currency,
            period: fields.period,
            value: fields.value,
        }
    }

    pub fn fields(&self) -> ItemFields {
        ItemFields {
            title: self.title.clone(),
            icon: self.icon.clone(),
            currency: self.currency,
            period: self.period,
            value: self.value,
        }
    }

    pub(crate) fn replace_fields(&mut self, fields: ItemFields) {
        self.title = fields.title;
        self.icon = fields.icon;
        self.currency = fields.currency;
        self.period = fields.period;
        self.value = fields.value;
    }
}
