//! Command definitions
//!
//! Commands represent intentions to change the system state. They carry
//! already-validated domain types; parsing happens at the API boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Amount, Currency, TransactionType};
use crate::models::CategoryId;

// =========================================================================
// Categories
// =========================================================================

/// Command to create a category for the current user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub icon: String,
    pub kind: TransactionType,
}

impl CreateCategoryCommand {
    pub fn new(name: String, kind: TransactionType) -> Self {
        Self {
            name,
            icon: String::new(),
            kind,
        }
    }

    pub fn with_icon(mut self, icon: String) -> Self {
        self.icon = icon;
        self
    }
}

/// Command to delete one of the current user's categories
#[derive(Debug, Clone)]
pub struct DeleteCategoryCommand {
    pub id: CategoryId,
}

impl DeleteCategoryCommand {
    pub fn new(id: CategoryId) -> Self {
        Self { id }
    }
}

// =========================================================================
// Transactions
// =========================================================================

/// Command to record a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionCommand {
    pub amount: Amount,
    pub date: DateTime<Utc>,
    pub description: String,
    pub kind: TransactionType,
    /// Name of an existing category with the same type
    pub category: String,
}

impl CreateTransactionCommand {
    pub fn new(amount: Amount, date: DateTime<Utc>, kind: TransactionType, category: String) -> Self {
        Self {
            amount,
            date,
            description: String::new(),
            kind,
            category,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }
}

/// Command to delete a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeleteTransactionCommand {
    pub transaction_id: Uuid,
}

impl DeleteTransactionCommand {
    pub fn new(transaction_id: Uuid) -> Self {
        Self { transaction_id }
    }
}

// =========================================================================
// Settings
// =========================================================================

/// Command to change the user's display currency
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateCurrencyCommand {
    pub currency: Currency,
}

impl UpdateCurrencyCommand {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }
}
