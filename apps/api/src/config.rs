//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first, if present.

use std::env;
use std::str::FromStr;

use bakehouse_core::invoice::InvoiceLayout;
use bakehouse_core::Percentage;
use tracing::warn;

const DEV_JWT_SECRET: &str = "bakehouse-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Secret shared with the identity provider that signs session tokens
    pub jwt_secret: String,

    /// Lifetime of tokens issued by [`crate::auth::JwtManager::issue_token`]
    pub jwt_access_lifetime_secs: i64,

    /// Markup a fresh draft starts with
    pub default_markup: Percentage,

    /// Table rows per invoice page
    pub invoice_rows_per_page: usize,

    /// Offset from UTC that invoice dates are printed in
    pub invoice_utc_offset_minutes: i32,

    /// Allow any origin (browser frontends on other ports)
    pub cors_allow_any: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let layout = InvoiceLayout::default();
        ApiConfig {
            port: 3001,
            database_path: "./bakehouse.db".to_string(),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_access_lifetime_secs: 604_800, // 7 days
            default_markup: bakehouse_core::DEFAULT_MARKUP,
            invoice_rows_per_page: layout.rows_per_page,
            invoice_utc_offset_minutes: layout.utc_offset_minutes,
            cors_allow_any: true,
        }
    }
}

impl ApiConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case outside local development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ => {
                // In production, this MUST be set via environment variable
                warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let markup_percent: f64 = parse_or(&lookup, "DEFAULT_MARKUP_PERCENT", 50.0)?;
        let default_markup = bakehouse_core::validation::parse_percentage("DEFAULT_MARKUP_PERCENT", markup_percent)
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_MARKUP_PERCENT".to_string()))?;

        let config = ApiConfig {
            port: parse_or(&lookup, "BAKEHOUSE_PORT", defaults.port)?,
            database_path: lookup("BAKEHOUSE_DB_PATH").unwrap_or(defaults.database_path),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            jwt_secret,
            jwt_access_lifetime_secs: parse_or(
                &lookup,
                "JWT_ACCESS_LIFETIME_SECS",
                defaults.jwt_access_lifetime_secs,
            )?,
            default_markup,
            invoice_rows_per_page: parse_or(&lookup, "INVOICE_ROWS_PER_PAGE", defaults.invoice_rows_per_page)?,
            invoice_utc_offset_minutes: parse_or(
                &lookup,
                "INVOICE_UTC_OFFSET_MINUTES",
                defaults.invoice_utc_offset_minutes,
            )?,
            cors_allow_any: parse_or(&lookup, "CORS_ALLOW_ANY", defaults.cors_allow_any)?,
        };

        if config.invoice_rows_per_page == 0 {
            return Err(ConfigError::InvalidValue("INVOICE_ROWS_PER_PAGE".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Invoice pagination and date settings.
    pub fn invoice_layout(&self) -> InvoiceLayout {
        InvoiceLayout {
            rows_per_page: self.invoice_rows_per_page,
            utc_offset_minutes: self.invoice_utc_offset_minutes,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
