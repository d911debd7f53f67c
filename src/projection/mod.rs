//! Projection module
//!
//! Keeps the read-model history tables (`month_history`, `year_history`)
//! in step with the transactions table. Every write goes through the same
//! database transaction as the row it is derived from.

mod service;

pub use service::{HistoryProjection, ProjectionError};
