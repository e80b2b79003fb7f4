//! Shared application state.
//!
//! The database handle is built once in `main` and injected here, so tests
//! can stand up the exact same router over an in-memory database.

use std::time::Duration;

use caja_db::Database;

use crate::config::ServerConfig;
use crate::reniec::ReniecClient;
use crate::retry::RetryPolicy;

/// State shared by every handler.
///
/// Cloned per request by the router; every field is a cheap Arc-backed
/// handle.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool and repository access
    pub db: Database,
    /// Retry policy for repository calls
    pub retry: RetryPolicy,
    /// External identity lookup
    pub reniec: ReniecClient,
}

impl AppState {
    /// Builds the state from loaded configuration and an opened database.
    pub fn new(config: &ServerConfig, db: Database) -> Self {
        Self {
            db,
            retry: RetryPolicy::new(
                config.retry_max_attempts,
                Duration::from_millis(config.retry_delay_ms),
            ),
            reniec: ReniecClient::new(
                config.reniec_api_url.clone(),
                config.reniec_api_token.clone(),
            ),
        }
    }
}
