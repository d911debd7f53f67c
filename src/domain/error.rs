//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Business rule violations and lookups that came back empty.
///
/// These are independent of the web layer; `AppError` decides which HTTP
/// status each one maps to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid amount (zero, negative, too precise or too large)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A date that could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Range is reversed or longer than allowed
    #[error("Date range must be between 0 and {max_days} days")]
    InvalidDateRange { max_days: i64 },

    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    /// Category identifiers have the form `name|type`
    #[error("Invalid category ID format: {0}")]
    InvalidCategoryId(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Unknown history timeframe, or month or year out of range
    #[error("Invalid history period: {0}")]
    InvalidPeriod(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// The resource exists but belongs to another user
    #[error("Resource belongs to another user")]
    NotOwner,
}

impl DomainError {
    pub fn category_not_found(name: &str, kind: impl std::fmt::Display) -> Self {
        Self::CategoryNotFound(format!("{}|{}", name, kind))
    }

    /// Check if this error was caused by malformed input
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidDate(_)
                | Self::InvalidDateRange { .. }
                | Self::InvalidTransactionType(_)
                | Self::InvalidCategoryId(_)
                | Self::UnsupportedCurrency(_)
                | Self::InvalidPeriod(_)
        )
    }

    /// Check if this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotFound(_) | Self::TransactionNotFound(_)
        )
    }
}

impl From<super::AmountError> for DomainError {
    fn from(err: super::AmountError) -> Self {
        Self::InvalidAmount(err.to_string())
    }
}
