//! Category Handlers
//!
//! Create and delete per-user categories. Deleting a category leaves the
//! transactions that reference it alone; they carry their own snapshot of
//! the name and icon.

use sqlx::PgPool;

use crate::domain::{DomainError, RequestContext};
use crate::error::AppError;
use crate::models::{Category, CategoryId, CategoryRow};

use super::{CreateCategoryCommand, DeleteCategoryCommand};

/// Handler for category creation
pub struct CreateCategoryHandler {
    pool: PgPool,
}

impl CreateCategoryHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the create category command
    pub async fn execute(
        &self,
        command: CreateCategoryCommand,
        context: &RequestContext,
    ) -> Result<Category, AppError> {
        let id = CategoryId {
            name: command.name.clone(),
            kind: command.kind,
        };

        let row: CategoryRow = sqlx::query_as(
            r#"
            INSERT INTO categories (name, user_id, icon, type)
            VALUES ($1, $2, $3, $4)
            RETURNING created_at, name, user_id, icon, type
            "#,
        )
        .bind(&command.name)
        .bind(&context.user_id)
        .bind(&command.icon)
        .bind(command.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::CategoryExists(id.to_string())
            }
            other => AppError::Database(other),
        })?;

        tracing::info!(
            user_id = %context.user_id,
            category = %id,
            correlation_id = ?context.correlation_id,
            "Category created"
        );

        Ok(Category::try_from(row)?)
    }
}

/// Handler for category deletion
pub struct DeleteCategoryHandler {
    pool: PgPool,
}

impl DeleteCategoryHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the delete category command
    pub async fn execute(
        &self,
        command: DeleteCategoryCommand,
        context: &RequestContext,
    ) -> Result<(), AppError> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE name = $1 AND user_id = $2 AND type = $3
            "#,
        )
        .bind(&command.id.name)
        .bind(&context.user_id)
        .bind(command.id.kind.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(DomainError::CategoryNotFound(command.id.to_string()).into());
        }

        tracing::info!(
            user_id = %context.user_id,
            category = %command.id,
            correlation_id = ?context.correlation_id,
            "Category deleted"
        );

        Ok(())
    }
}
