//! Domain module
//!
//! Core domain types and business rules. Nothing in here touches the
//! database or HTTP layer.

pub mod amount;
pub mod context;
pub mod currency;
pub mod date_range;
pub mod error;
pub mod history;
pub mod kind;

pub use amount::{Amount, AmountError};
pub use context::RequestContext;
pub use currency::Currency;
pub use date_range::{parse_instant, DateRange};
pub use error::DomainError;
pub use history::{HistoryDelta, HistoryKey};
pub use kind::TransactionType;
