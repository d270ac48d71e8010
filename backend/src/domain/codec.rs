//! Persistence codec between [`SessionState`] and the JSON document.
//!
//! The wire shape lives in `shared::UserDocument`; this module is the only
//! place where its strings become currencies, periods and numbers and back.

use std::collections::HashSet;

use shared::{ItemDocument, ItemMap, LedgerDocument, UserDocument};
use tracing::{info, warn};

use super::errors::{DecodeError, ValidationError};
use super::item_form::{format_amount, parse_amount};
use super::ledger::{Collection, Ledger};
use super::models::{Currency, ExchangeRates, Item, ItemKind, Period, Savings, User};
use super::savings_policy::non_negative;
use super::session::SessionState;

/// Parse a raw document into a session. Fails as a whole; no partial state.
pub fn load_from_document(raw: &str) -> Result<SessionState, DecodeError> {
    let document: UserDocument = serde_json::from_str(raw)?;
    decode(document)
}

/// Serialize a session into the raw document text.
pub fn to_document(state: &SessionState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&encode(state))
}

pub fn decode(document: UserDocument) -> Result<SessionState, DecodeError> {
    let rates = ExchangeRates::new(
        positive_rate(document.usd, "usd")?,
        positive_rate(document.eur, "eur")?,
    );

    let checked_curr = if document.checked_curr.trim().is_empty() {
        Currency::default()
    } else {
        Currency::from_code(&document.checked_curr)
            .map_err(|source| DecodeError::Field { field: "checkedCurr", source })?
    };

    let user = User {
        login: document.login,
        last_visit: document.last_visit,
        avatar: document.avatar,
        rates,
        checked_curr,
        last_curr: document.last_curr,
        checked_percent: document.checked_percent,
        notes: document.notes,
    };

    if document.capitalization && !document.deposit {
        warn!("{}: capitalization without deposit, clearing it", user.login);
    }
    let savings = Savings {
        free_money: non_negative(document.free_money, "Free money")
            .map_err(|source| DecodeError::Field { field: "freeMoney", source })?,
        deposit: document.deposit,
        capitalization: document.capitalization && document.deposit,
        percent: non_negative(document.percent, "Interest percent")
            .map_err(|source| DecodeError::Field { field: "percent", source })?,
    };

    let ledger = Ledger {
        incomes: decode_collection(ItemKind::Income, document.data.incomes)?,
        expenses: decode_collection(ItemKind::Expense, document.data.expenses)?,
    };

    info!(
        "Decoded document for {:?}: {} incomes, {} expenses",
        user.login,
        ledger.incomes.len(),
        ledger.expenses.len()
    );
    Ok(SessionState::new(user, savings, ledger))
}

pub fn encode(state: &SessionState) -> UserDocument {
    let user = &state.user;
    let savings = &state.savings;

    UserDocument {
        login: user.login.clone(),
        last_visit: user.last_visit.clone(),
        avatar: user.avatar.clone(),
        usd: user.rates.usd,
        eur: user.rates.eur,
        checked_curr: user.checked_curr.display_code().to_string(),
        last_curr: user.last_curr.clone(),
        checked_percent: user.checked_percent,
        notes: user.notes.clone(),
        free_money: savings.free_money,
        deposit: savings.deposit,
        capitalization: savings.capitalization,
        percent: savings.percent,
        data: LedgerDocument {
            incomes: encode_collection(&state.ledger.incomes),
            expenses: encode_collection(&state.ledger.expenses),
        },
    }
}

fn positive_rate(rate: f64, name: &'static str) -> Result<f64, DecodeError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(DecodeError::InvalidRate(name))
    }
}

fn decode_collection(kind: ItemKind, map: ItemMap) -> Result<Collection, DecodeError> {
    let mut seen = HashSet::with_capacity(map.len());
    let mut items = Vec::with_capacity(map.len());

    for (key, document) in map.0 {
        let own_id = match kind {
            ItemKind::Income => document.income_id.or(document.expense_id),
            ItemKind::Expense => document.expense_id.or(document.income_id),
        };
        let id = match own_id.or_else(|| key.trim().parse().ok()) {
            Some(id) => id,
            None => return Err(DecodeError::MissingId { kind, key }),
        };
        if id == 0 {
            return Err(DecodeError::ZeroId { kind });
        }
        if !seen.insert(id) {
            return Err(DecodeError::DuplicateId { kind, id });
        }
        if key != id.to_string() {
            warn!("{} key {:?} does not match its id {}, using the id", kind, key, id);
        }

        items.push(decode_item(kind, id, document)?);
    }

    Ok(Collection::from_items(kind, items))
}

fn decode_item(kind: ItemKind, id: u32, document: ItemDocument) -> Result<Item, DecodeError> {
    if document.title.trim().is_empty() {
        return Err(DecodeError::Field { field: "title", source: ValidationError::EmptyTitle });
    }
    let currency = Currency::from_code(&document.currency)
        .map_err(|source| DecodeError::Field { field: "currency", source })?;
    let period = Period::from_code(&document.period)
        .map_err(|source| DecodeError::Field { field: "period", source })?;

    let value = match parse_amount(&document.value) {
        Ok(value) if value >= 0.0 => value,
        _ => {
            warn!("{} {} has unusable value {:?}, counting it as 0", kind, id, document.value);
            0.0
        }
    };

    Ok(Item {
        id,
        title: document.title,
        icon: document.icon,
        currency,
        period,
        value,
    })
}

fn encode_collection(collection: &Collection) -> ItemMap {
    let kind = collection.kind();
    let entries = collection
        .items()
        .iter()
        .map(|item| {
            let document = ItemDocument {
                income_id: (kind == ItemKind::Income).then_some(item.id),
                expense_id: (kind == ItemKind::Expense).then_some(item.id),
                title: item.title.clone(),
                icon: item.icon.clone(),
                currency: item.currency.item_code().to_string(),
                period: item.period.code().to_string(),
                value: format_amount(item.value),
            };
            (item.id.to_string(), document)
        })
        .collect();
    ItemMap(entries)
}
