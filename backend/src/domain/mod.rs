//! Domain core: the financial data model and everything derived from it.
//!
//! - `models`: users, savings, items, currencies, periods
//! - `normalizer`: one item to a monthly amount in a display currency
//! - `ledger`: income and expense collections
//! - `aggregation`: monthly totals over the ledger
//! - `savings_policy`: allocation and deposit rules
//! - `item_form`: parsing of the item dialog input
//! - `session`: the state one user edits
//! - `codec`: session to and from the persisted document
//!
//! Nothing in here touches storage or the network.

pub mod aggregation;
pub mod codec;
pub mod errors;
pub mod item_form;
pub mod ledger;
pub mod models;
pub mod normalizer;
pub mod savings_policy;
pub mod session;

pub use aggregation::{recompute, MonthlyTotals};
pub use codec::{decode, encode, load_from_document, to_document};
pub use errors::{DecodeError, LedgerError, ValidationError};
pub use item_form::ItemDraft;
pub use ledger::{Collection, Ledger};
pub use normalizer::monthly_equivalent;
pub use session::SessionState;
