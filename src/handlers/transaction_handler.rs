//! Transaction Handlers
//!
//! Recording and deleting a transaction touches three tables: the
//! transaction row itself, `month_history` and `year_history`. All three
//! writes share one database transaction, so either every aggregate moves
//! with the row or nothing is written.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Amount, DomainError, HistoryDelta, HistoryKey, RequestContext, TransactionType};
use crate::error::AppError;
use crate::models::{Transaction, TransactionRow, TRANSACTION_COLUMNS};
use crate::projection::HistoryProjection;

use super::{CreateTransactionCommand, DeleteTransactionCommand};

/// Handler for recording transactions
pub struct CreateTransactionHandler {
    projection: HistoryProjection,
    pool: PgPool,
}

impl CreateTransactionHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projection: HistoryProjection::new(),
            pool,
        }
    }

    /// Execute the create transaction command
    pub async fn execute(
        &self,
        command: CreateTransactionCommand,
        context: &RequestContext,
    ) -> Result<Transaction, AppError> {
        // The category must exist; its name and icon are copied onto the row
        let category: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT name, icon FROM categories
            WHERE user_id = $1 AND name = $2 AND type = $3
            "#,
        )
        .bind(&context.user_id)
        .bind(&command.category)
        .bind(command.kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let (category_name, category_icon) = category
            .ok_or_else(|| DomainError::category_not_found(&command.category, command.kind))?;

        let transaction_id = uuid::Uuid::new_v4();
        let key = HistoryKey::from_date(command.date);
        let delta = HistoryDelta::record(command.kind, &command.amount);

        let mut tx = self.pool.begin().await?;

        let row: TransactionRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO transactions (id, amount, description, date, user_id, type, category, category_icon)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(transaction_id)
        .bind(command.amount.value())
        .bind(&command.description)
        .bind(command.date)
        .bind(&context.user_id)
        .bind(command.kind.as_str())
        .bind(&category_name)
        .bind(&category_icon)
        .fetch_one(&mut *tx)
        .await?;

        self.projection
            .record(&mut tx, &context.user_id, key, delta)
            .await?;

        let transaction = Transaction::try_from(row)?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %transaction_id,
            user_id = %context.user_id,
            kind = %command.kind,
            amount = %command.amount,
            correlation_id = ?context.correlation_id,
            "Transaction recorded"
        );

        Ok(transaction)
    }
}

/// Handler for deleting transactions
pub struct DeleteTransactionHandler {
    projection: HistoryProjection,
    pool: PgPool,
}

impl DeleteTransactionHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projection: HistoryProjection::new(),
            pool,
        }
    }

    /// Execute the delete transaction command
    ///
    /// # Errors
    /// - `DomainError::TransactionNotFound` if no transaction has this ID
    /// - `DomainError::NotOwner` if it belongs to another user
    pub async fn execute(
        &self,
        command: DeleteTransactionCommand,
        context: &RequestContext,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so a concurrent delete cannot revert the history twice
        let existing: Option<(String, String, Decimal, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT user_id, type, amount, date FROM transactions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(command.transaction_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (owner, kind, amount, date) = existing
            .ok_or_else(|| DomainError::TransactionNotFound(command.transaction_id.to_string()))?;

        if owner != context.user_id {
            tracing::warn!(
                transaction_id = %command.transaction_id,
                user_id = %context.user_id,
                "Attempt to delete another user's transaction"
            );
            return Err(DomainError::NotOwner.into());
        }

        let kind: TransactionType = kind
            .parse()
            .map_err(|e: DomainError| AppError::Internal(e.to_string()))?;
        let amount = Amount::new(amount).map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(command.transaction_id)
            .execute(&mut *tx)
            .await?;

        self.projection
            .revert(
                &mut tx,
                &context.user_id,
                HistoryKey::from_date(date),
                HistoryDelta::reverse(kind, &amount),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %command.transaction_id,
            user_id = %context.user_id,
            correlation_id = ?context.correlation_id,
            "Transaction deleted"
        );

        Ok(())
    }
}
