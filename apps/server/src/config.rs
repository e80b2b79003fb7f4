//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Maximum connections in the SQLite pool
    pub db_max_connections: u32,

    /// How many times a read is attempted when the database reports a
    /// transient failure (busy, pool exhausted)
    pub retry_max_attempts: u32,

    /// Delay between retry attempts in milliseconds
    pub retry_delay_ms: u64,

    /// Base URL of the RENIEC document-lookup API
    pub reniec_api_url: String,

    /// Bearer token for the RENIEC API. When unset, document lookups are
    /// answered from the local client table only.
    pub reniec_api_token: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/caja.db".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            retry_max_attempts: env::var("RETRY_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RETRY_MAX_ATTEMPTS".to_string()))?,

            retry_delay_ms: env::var("RETRY_DELAY_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RETRY_DELAY_MS".to_string()))?,

            reniec_api_url: env::var("RENIEC_API_URL")
                .unwrap_or_else(|_| "https://api.apis.net.pe/v2".to_string()),

            reniec_api_token: env::var("RENIEC_API_TOKEN").ok(),
        };

        // Zero attempts would skip every query outright
        if config.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue("RETRY_MAX_ATTEMPTS".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
