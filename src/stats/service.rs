//! Stats Service

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{DateRange, DomainError, TransactionType};
use crate::error::AppError;

use super::aggregate::{
    self, BalanceStats, CategoryStat, HistoryDataPoint, HistoryPeriod, MonthlyStat,
};

/// Read-only queries over transactions and the history tables
#[derive(Clone)]
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Income and expense totals within `range`
    pub async fn balance(&self, user_id: &str, range: &DateRange) -> Result<BalanceStats, AppError> {
        let rows: Vec<(String, Decimal)> = sqlx::query_as(
            r#"
            SELECT type, SUM(amount) FROM transactions
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            GROUP BY type
            "#,
        )
        .bind(user_id)
        .bind(range.from())
        .bind(range.to())
        .fetch_all(&self.pool)
        .await?;

        let totals = rows
            .into_iter()
            .map(|(kind, sum)| Ok((parse_kind(&kind)?, sum)))
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(BalanceStats::from_totals(totals))
    }

    /// Per-category totals within `range`, one row per category of the user
    pub async fn categories(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<CategoryStat>, AppError> {
        let categories: Vec<(String, String, String)> = sqlx::query_as(
            r#"
            SELECT name, icon, type FROM categories
            WHERE user_id = $1
            ORDER BY name ASC, type ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let sums: Vec<(String, String, Decimal)> = sqlx::query_as(
            r#"
            SELECT category, type, SUM(amount) FROM transactions
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            GROUP BY category, type
            "#,
        )
        .bind(user_id)
        .bind(range.from())
        .bind(range.to())
        .fetch_all(&self.pool)
        .await?;

        let categories = categories
            .into_iter()
            .map(|(name, icon, kind)| Ok((name, icon, parse_kind(&kind)?)))
            .collect::<Result<Vec<_>, AppError>>()?;
        let sums = sums
            .into_iter()
            .map(|(name, kind, sum)| Ok((name, parse_kind(&kind)?, sum)))
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(aggregate::merge_category_stats(categories, sums))
    }

    /// Totals per calendar month within `range`, oldest first
    pub async fn monthly(&self, user_id: &str, range: &DateRange) -> Result<Vec<MonthlyStat>, AppError> {
        let rows: Vec<(DateTime<Utc>, String, Decimal)> = sqlx::query_as(
            r#"
            SELECT date, type, amount FROM transactions
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.from())
        .bind(range.to())
        .fetch_all(&self.pool)
        .await?;

        let rows = rows
            .into_iter()
            .map(|(date, kind, amount)| Ok((date, parse_kind(&kind)?, amount)))
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(aggregate::group_monthly(rows))
    }

    /// Years that have history rows for the user
    pub async fn history_periods(&self, user_id: &str) -> Result<Vec<i32>, AppError> {
        let years: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT year FROM month_history
            WHERE user_id = $1
            ORDER BY year ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(aggregate::history_years(
            years.into_iter().map(|(year,)| year),
            Utc::now().year(),
        ))
    }

    /// Zero-filled history for a year (per month) or a month (per day)
    pub async fn history_data(
        &self,
        user_id: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<HistoryDataPoint>, AppError> {
        match period {
            HistoryPeriod::Year { year } => {
                let rows: Vec<(i32, Decimal, Decimal)> = sqlx::query_as(
                    r#"
                    SELECT month, income, expense FROM year_history
                    WHERE user_id = $1 AND year = $2
                    ORDER BY month ASC
                    "#,
                )
                .bind(user_id)
                .bind(year)
                .fetch_all(&self.pool)
                .await?;

                Ok(aggregate::fill_year(year, rows))
            }
            HistoryPeriod::Month { year, month } => {
                let rows: Vec<(i32, Decimal, Decimal)> = sqlx::query_as(
                    r#"
                    SELECT day, income, expense FROM month_history
                    WHERE user_id = $1 AND year = $2 AND month = $3
                    ORDER BY day ASC
                    "#,
                )
                .bind(user_id)
                .bind(year)
                .bind(month as i32)
                .fetch_all(&self.pool)
                .await?;

                Ok(aggregate::fill_month(year, month, rows))
            }
        }
    }
}

fn parse_kind(raw: &str) -> Result<TransactionType, AppError> {
    raw.parse()
        .map_err(|e: DomainError| AppError::Internal(e.to_string()))
}
