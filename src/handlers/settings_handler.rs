//! Settings Handler
//!
//! Users get a settings row the first time it is read.

use sqlx::PgPool;

use crate::domain::{Currency, RequestContext};
use crate::error::AppError;
use crate::models::UserSettings;

use super::UpdateCurrencyCommand;

/// Handler for reading and updating user settings
pub struct UserSettingsHandler {
    pool: PgPool,
    default_currency: Currency,
}

impl UserSettingsHandler {
    pub fn new(pool: PgPool, default_currency: Currency) -> Self {
        Self {
            pool,
            default_currency,
        }
    }

    /// Return the user's settings, creating them with the default currency
    pub async fn get_or_create(&self, context: &RequestContext) -> Result<UserSettings, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, currency)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(&context.user_id)
        .bind(self.default_currency.code())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            tracing::info!(
                user_id = %context.user_id,
                currency = %self.default_currency,
                "Created default user settings"
            );
        }

        let row: (String, String) =
            sqlx::query_as("SELECT user_id, currency FROM user_settings WHERE user_id = $1")
                .bind(&context.user_id)
                .fetch_one(&self.pool)
                .await?;

        UserSettings::try_from(row).map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Execute the update currency command
    pub async fn update_currency(
        &self,
        command: UpdateCurrencyCommand,
        context: &RequestContext,
    ) -> Result<UserSettings, AppError> {
        let row: (String, String) = sqlx::query_as(
            r#"
            INSERT INTO user_settings (user_id, currency)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET currency = EXCLUDED.currency
            RETURNING user_id, currency
            "#,
        )
        .bind(&context.user_id)
        .bind(command.currency.code())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            user_id = %context.user_id,
            currency = %command.currency,
            correlation_id = ?context.correlation_id,
            "Currency updated"
        );

        UserSettings::try_from(row).map_err(|e| AppError::Internal(e.to_string()))
    }
}
