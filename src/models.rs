//! Persisted rows
//!
//! Rows are fetched as tuples and converted here so the text columns are
//! parsed back into domain types in one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{Currency, DomainError, TransactionType};

/// A user-defined category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub user_id: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// `(created_at, name, user_id, icon, type)`
pub type CategoryRow = (DateTime<Utc>, String, String, String, String);

impl TryFrom<CategoryRow> for Category {
    type Error = DomainError;

    fn try_from((created_at, name, user_id, icon, kind): CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at,
            name,
            user_id,
            icon,
            kind: kind.parse()?,
        })
    }
}

/// Categories are addressed by `name|type`, unique per user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryId {
    pub name: String,
    pub kind: TransactionType,
}

impl FromStr for CategoryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidCategoryId(s.to_string());

        let (name, kind) = s.split_once('|').ok_or_else(invalid)?;
        if name.is_empty() || kind.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            name: name.to_string(),
            kind: kind.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.name, self.kind)
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Category name at the time the transaction was recorded
    pub category: String,
    pub category_icon: String,
}

/// `(id, created_at, updated_at, amount, description, date, user_id, type, category, category_icon)`
pub type TransactionRow = (
    Uuid,
    DateTime<Utc>,
    DateTime<Utc>,
    Decimal,
    String,
    DateTime<Utc>,
    String,
    String,
    String,
    String,
);

/// Column list matching `TransactionRow`
pub const TRANSACTION_COLUMNS: &str =
    "id, created_at, updated_at, amount, description, date, user_id, type, category, category_icon";

impl TryFrom<TransactionRow> for Transaction {
    type Error = DomainError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let (
            id,
            created_at,
            updated_at,
            amount,
            description,
            date,
            user_id,
            kind,
            category,
            category_icon,
        ) = row;

        Ok(Self {
            id,
            created_at,
            updated_at,
            amount,
            description,
            date,
            user_id,
            kind: kind.parse()?,
            category,
            category_icon,
        })
    }
}

/// Per-user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: String,
    pub currency: Currency,
}

impl TryFrom<(String, String)> for UserSettings {
    type Error = DomainError;

    fn try_from((user_id, currency): (String, String)) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id,
            currency: currency.parse()?,
        })
    }
}
