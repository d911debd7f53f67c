//! History keys and deltas
//!
//! Every transaction contributes to one `month_history` row (per day) and
//! one `year_history` row (per month). Creating a transaction applies its
//! delta, deleting it applies the reversed delta.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use super::{Amount, TransactionType};

/// Calendar coordinates of a transaction in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryKey {
    pub year: i32,
    /// 1..=12
    pub month: i32,
    /// 1..=31
    pub day: i32,
}

impl HistoryKey {
    pub fn from_date(date: DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month() as i32,
            day: date.day() as i32,
        }
    }
}

/// Signed change to the income and expense sums of a history row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryDelta {
    pub income: Decimal,
    pub expense: Decimal,
}

impl HistoryDelta {
    /// Delta for recording a new transaction.
    pub fn record(kind: TransactionType, amount: &Amount) -> Self {
        match kind {
            TransactionType::Income => Self {
                income: amount.value(),
                expense: Decimal::ZERO,
            },
            TransactionType::Expense => Self {
                income: Decimal::ZERO,
                expense: amount.value(),
            },
        }
    }

    /// Delta for removing an existing transaction.
    pub fn reverse(kind: TransactionType, amount: &Amount) -> Self {
        Self::record(kind, amount).negate()
    }

    fn negate(self) -> Self {
        Self {
            income: -self.income,
            expense: -self.expense,
        }
    }
}
