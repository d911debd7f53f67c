//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use crate::domain::Currency;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Secret the identity provider signs session tokens with
    pub session_secret: String,

    /// Expected `iss` claim of session tokens, if any
    pub session_issuer: Option<String>,

    /// Where browsers without a session are sent
    pub sign_in_url: String,

    /// Longest date range accepted by list and stats queries
    pub max_date_range_days: i64,

    /// Currency given to users without saved settings
    pub default_currency: Currency,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,

    /// Emit JSON log lines instead of the human readable format
    pub log_json: bool,

    /// Browser origin allowed to call the API
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10)?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_or("PORT", 3000)?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| ConfigError::MissingEnv("SESSION_SECRET"))?;
        if session_secret.is_empty() {
            return Err(ConfigError::InvalidValue("SESSION_SECRET"));
        }

        let session_issuer = env::var("SESSION_ISSUER").ok().filter(|s| !s.is_empty());

        let sign_in_url = env::var("SIGN_IN_URL").unwrap_or_else(|_| "/sign-in".to_string());

        let max_date_range_days: i64 = parse_or("MAX_DATE_RANGE_DAYS", 90)?;
        if max_date_range_days < 0 {
            return Err(ConfigError::InvalidValue("MAX_DATE_RANGE_DAYS"));
        }

        let default_currency = match env::var("DEFAULT_CURRENCY") {
            Ok(code) => code
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEFAULT_CURRENCY"))?,
            Err(_) => Currency::default(),
        };

        let run_migrations = parse_or("RUN_MIGRATIONS", true)?;

        let log_json = env::var("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            session_secret,
            session_issuer,
            sign_in_url,
            max_date_range_days,
            default_currency,
            run_migrations,
            log_json,
            cors_allowed_origin,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        let value: u16 = parse_or("FINANCE_TRACKER_TEST_UNSET_VARIABLE", 3000).unwrap();
        assert_eq!(value, 3000);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        env::set_var("FINANCE_TRACKER_TEST_BAD_PORT", "eighty");
        let result: Result<u16, _> = parse_or("FINANCE_TRACKER_TEST_BAD_PORT", 3000);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("FINANCE_TRACKER_TEST_BAD_PORT"))
        ));
    }

    #[test]
    fn test_parse_or_reads_bool() {
        env::set_var("FINANCE_TRACKER_TEST_FLAG", "false");
        let value: bool = parse_or("FINANCE_TRACKER_TEST_FLAG", true).unwrap();
        assert!(!value);
    }
}
