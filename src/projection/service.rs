//! History Projection
//!
//! Increment/decrement of the per-day and per-month aggregate rows.

use sqlx::{Postgres, Transaction};

use crate::domain::{HistoryDelta, HistoryKey};

/// Maintains `month_history` and `year_history` inside a caller-owned transaction
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryProjection;

impl HistoryProjection {
    pub fn new() -> Self {
        Self
    }

    /// Add a newly recorded transaction to both history tables
    pub async fn record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
        key: HistoryKey,
        delta: HistoryDelta,
    ) -> Result<(), ProjectionError> {
        self.upsert_month(tx, user_id, key, delta).await?;
        self.upsert_year(tx, user_id, key, delta).await?;

        tracing::debug!(
            user_id = %user_id,
            year = key.year,
            month = key.month,
            day = key.day,
            income = %delta.income,
            expense = %delta.expense,
            "History updated"
        );

        Ok(())
    }

    /// Remove a deleted transaction from both history tables
    ///
    /// `delta` is already reversed (see `HistoryDelta::reverse`) and is
    /// added to the existing rows as is; missing rows are not created.
    pub async fn revert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
        key: HistoryKey,
        delta: HistoryDelta,
    ) -> Result<(), ProjectionError> {
        let month_rows = sqlx::query(
            r#"
            UPDATE month_history
            SET income = income + $5, expense = expense + $6
            WHERE user_id = $1 AND day = $2 AND month = $3 AND year = $4
            "#,
        )
        .bind(user_id)
        .bind(key.day)
        .bind(key.month)
        .bind(key.year)
        .bind(delta.income)
        .bind(delta.expense)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        let year_rows = sqlx::query(
            r#"
            UPDATE year_history
            SET income = income + $4, expense = expense + $5
            WHERE user_id = $1 AND month = $2 AND year = $3
            "#,
        )
        .bind(user_id)
        .bind(key.month)
        .bind(key.year)
        .bind(delta.income)
        .bind(delta.expense)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        if month_rows == 0 || year_rows == 0 {
            tracing::warn!(
                user_id = %user_id,
                year = key.year,
                month = key.month,
                day = key.day,
                "History row missing while reverting transaction"
            );
        }

        Ok(())
    }

    async fn upsert_month(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
        key: HistoryKey,
        delta: HistoryDelta,
    ) -> Result<(), ProjectionError> {
        sqlx::query(
            r#"
            INSERT INTO month_history (user_id, day, month, year, income, expense)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (day, month, year, user_id) DO UPDATE
            SET income = month_history.income + EXCLUDED.income,
                expense = month_history.expense + EXCLUDED.expense
            "#,
        )
        .bind(user_id)
        .bind(key.day)
        .bind(key.month)
        .bind(key.year)
        .bind(delta.income)
        .bind(delta.expense)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_year(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: &str,
        key: HistoryKey,
        delta: HistoryDelta,
    ) -> Result<(), ProjectionError> {
        sqlx::query(
            r#"
            INSERT INTO year_history (user_id, month, year, income, expense)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (month, year, user_id) DO UPDATE
            SET income = year_history.income + EXCLUDED.income,
                expense = year_history.expense + EXCLUDED.expense
            "#,
        )
        .bind(user_id)
        .bind(key.month)
        .bind(key.year)
        .bind(delta.income)
        .bind(delta.expense)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// Projection errors
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ProjectionError> for crate::error::AppError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::Database(e) => crate::error::AppError::Database(e),
        }
    }
}
