//! finance_tracker Library
//!
//! Re-exports modules for the server binary and integration testing.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod models;
pub mod projection;
pub mod state;
pub mod stats;

pub use config::Config;
pub use domain::{Amount, Currency, DateRange, DomainError, RequestContext, TransactionType};
pub use error::{AppError, AppResult};
pub use state::{AppSettings, AppState};
