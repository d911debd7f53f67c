//! Aggregation of stats rows
//!
//! Pure functions over rows already fetched from the database.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::{DomainError, TransactionType};

/// Income and expense totals over a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceStats {
    pub income: Decimal,
    pub expense: Decimal,
}

impl BalanceStats {
    /// Build from `(type, sum)` rows; a missing type counts as zero.
    pub fn from_totals(totals: impl IntoIterator<Item = (TransactionType, Decimal)>) -> Self {
        totals
            .into_iter()
            .fold(Self::default(), |mut stats, (kind, sum)| {
                stats.add(kind, sum);
                stats
            })
    }

    pub fn add(&mut self, kind: TransactionType, amount: Decimal) {
        match kind {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
    }
}

/// Total spent or earned per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: String,
    pub category_icon: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
}

/// One row per category, with the matching transaction total or zero.
///
/// Sums are matched on category name and type only, so transactions
/// recorded under an older icon still count towards their category.
pub fn merge_category_stats(
    categories: impl IntoIterator<Item = (String, String, TransactionType)>,
    sums: impl IntoIterator<Item = (String, TransactionType, Decimal)>,
) -> Vec<CategoryStat> {
    let mut totals: HashMap<(String, TransactionType), Decimal> = HashMap::new();
    for (name, kind, sum) in sums {
        *totals.entry((name, kind)).or_default() += sum;
    }

    categories
        .into_iter()
        .map(|(name, icon, kind)| {
            let amount = totals
                .get(&(name.clone(), kind))
                .copied()
                .unwrap_or_default();
            CategoryStat {
                category: name,
                category_icon: icon,
                kind,
                amount,
            }
        })
        .collect()
}

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStat {
    /// `M/YYYY`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Group transactions by their UTC month, oldest month first.
pub fn group_monthly(
    rows: impl IntoIterator<Item = (DateTime<Utc>, TransactionType, Decimal)>,
) -> Vec<MonthlyStat> {
    let mut months: BTreeMap<(i32, u32), BalanceStats> = BTreeMap::new();
    for (date, kind, amount) in rows {
        months
            .entry((date.year(), date.month()))
            .or_default()
            .add(kind, amount);
    }

    months
        .into_iter()
        .map(|((year, month), stats)| MonthlyStat {
            month: format!("{}/{}", month, year),
            income: stats.income,
            expense: stats.expense,
        })
        .collect()
}

// =========================================================================
// History
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryTimeframe {
    Month,
    Year,
}

/// The slice of history a caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPeriod {
    /// Every month of a year, from `year_history`
    Year { year: i32 },
    /// Every day of a month, from `month_history`
    Month { year: i32, month: u32 },
}

/// Calendar years a history query may ask for
const HISTORY_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

impl HistoryPeriod {
    pub fn new(
        timeframe: HistoryTimeframe,
        year: i32,
        month: Option<u32>,
    ) -> Result<Self, DomainError> {
        if !HISTORY_YEARS.contains(&year) {
            return Err(DomainError::InvalidPeriod(format!("year {} out of range", year)));
        }

        match timeframe {
            HistoryTimeframe::Year => Ok(Self::Year { year }),
            HistoryTimeframe::Month => {
                let month = month.ok_or_else(|| {
                    DomainError::InvalidPeriod("month is required for the month timeframe".into())
                })?;
                if !(1..=12).contains(&month) {
                    return Err(DomainError::InvalidPeriod(format!("month {} out of range", month)));
                }
                Ok(Self::Month { year, month })
            }
        }
    }
}

/// One bar of a history chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDataPoint {
    pub year: i32,
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Twelve points for `year`, zero where `year_history` has no row.
pub fn fill_year(
    year: i32,
    rows: impl IntoIterator<Item = (i32, Decimal, Decimal)>,
) -> Vec<HistoryDataPoint> {
    let found: HashMap<i32, (Decimal, Decimal)> = rows
        .into_iter()
        .map(|(month, income, expense)| (month, (income, expense)))
        .collect();

    (1..=12u32)
        .map(|month| {
            let (income, expense) = found.get(&(month as i32)).copied().unwrap_or_default();
            HistoryDataPoint {
                year,
                month,
                day: None,
                income,
                expense,
            }
        })
        .collect()
}

/// One point per day of the month, zero where `month_history` has no row.
pub fn fill_month(
    year: i32,
    month: u32,
    rows: impl IntoIterator<Item = (i32, Decimal, Decimal)>,
) -> Vec<HistoryDataPoint> {
    let found: HashMap<i32, (Decimal, Decimal)> = rows
        .into_iter()
        .map(|(day, income, expense)| (day, (income, expense)))
        .collect();

    (1..=days_in_month(year, month))
        .map(|day| {
            let (income, expense) = found.get(&(day as i32)).copied().unwrap_or_default();
            HistoryDataPoint {
                year,
                month,
                day: Some(day),
                income,
                expense,
            }
        })
        .collect()
}

/// Years with history, ascending; the current year when there are none.
pub fn history_years(years: impl IntoIterator<Item = i32>, current_year: i32) -> Vec<i32> {
    let mut years: Vec<i32> = years.into_iter().collect();
    years.sort_unstable();
    years.dedup();
    if years.is_empty() {
        years.push(current_year);
    }
    years
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        year.checked_add(1).map(|next_year| (next_year, 1))
    } else {
        Some((year, month + 1))
    };

    next.and_then(|(next_year, next_month)| NaiveDate::from_ymd_opt(next_year, next_month, 1))
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
