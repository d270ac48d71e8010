//! Error types raised by the domain layer.

use super::models::ItemKind;

/// Rejected input. The mutation that produced it leaves state unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Value is not a number: {0:?}")]
    InvalidValue(String),
    #[error("Value must be greater than zero")]
    NonPositiveValue,
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),
    #[error("Unknown currency code: {0:?}")]
    UnknownCurrency(String),
    #[error("Unknown period code: {0:?}")]
    UnknownPeriod(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No {kind} with id {id}")]
    NotFound { kind: ItemKind, id: u32 },
    #[error("No {kind} ids left to assign")]
    IdsExhausted { kind: ItemKind },
}

/// Malformed persisted document. Fatal at load time.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("Exchange rate for {0} must be a positive number")]
    InvalidRate(&'static str),
    #[error("{kind} entry {key:?} has no usable id")]
    MissingId { kind: ItemKind, key: String },
    #[error("{kind} ids must be positive")]
    ZeroId { kind: ItemKind },
    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: ItemKind, id: u32 },
}
