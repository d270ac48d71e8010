pub mod currency;
pub mod item;
pub mod period;
pub mod savings;
pub mod user;

pub use currency::{Currency, ExchangeRates};
pub use item::{Item, ItemFields, ItemId, ItemKind};
pub use period::Period;
pub use savings::Savings;
pub use user::User;
