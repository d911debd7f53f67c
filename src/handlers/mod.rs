//! Command Handlers module
//!
//! Write-side handlers. Each one validates against the current database
//! state, performs its writes and keeps the history projection in step.

mod category_handler;
mod commands;
mod settings_handler;
mod transaction_handler;

#[cfg(test)]
mod tests;

pub use category_handler::{CreateCategoryHandler, DeleteCategoryHandler};
pub use commands::*;
pub use settings_handler::UserSettingsHandler;
pub use transaction_handler::{CreateTransactionHandler, DeleteTransactionHandler};
