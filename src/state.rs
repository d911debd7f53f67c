//! Shared application state

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::SessionVerifier;
use crate::config::Config;
use crate::domain::Currency;

/// Request-independent settings the handlers need
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub max_date_range_days: i64,
    pub default_currency: Currency,
    pub sign_in_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_date_range_days: 90,
            default_currency: Currency::default(),
            sign_in_url: "/sign-in".to_string(),
        }
    }
}

/// State handed to every route
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sessions: SessionVerifier,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new(pool: PgPool, sessions: SessionVerifier, settings: AppSettings) -> Self {
        Self {
            pool,
            sessions,
            settings,
        }
    }

    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::new(
            pool,
            SessionVerifier::new(&config.session_secret, config.session_issuer.as_deref()),
            AppSettings {
                max_date_range_days: config.max_date_range_days,
                default_currency: config.default_currency,
                sign_in_url: config.sign_in_url.clone(),
            },
        )
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for AppSettings {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}
