//! RENIEC document lookup client.
//!
//! Fallback for client searches by national identity document: when the
//! document is not in the local client table, the handler asks the RENIEC
//! API (api.apis.net.pe) and passes its JSON straight through to the
//! frontend.
//!
//! ## Outcomes
//! ```text
//! Ok(Some(json))  person found upstream
//! Ok(None)        upstream says 404, upstream returned null, or no token
//! Err(..)         transport failure or upstream 5xx
//! ```
//!
//! Without a configured token the lookup is local-only and every call here
//! answers `Ok(None)`.

use reqwest::header;
use serde_json::Value;

use crate::error::ApiError;

const RENIEC_REFERER: &str = "https://apis.net.pe/consulta-dni-api";

/// Client for the RENIEC identity API.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ReniecClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ReniecClient {
    /// Creates a client against the given API base URL.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token,
        }
    }

    /// Looks up a person by national identity document number.
    pub async fn lookup_document(&self, documento: &str) -> Result<Option<Value>, ApiError> {
        let token = match &self.token {
            Some(token) => token,
            None => {
                tracing::debug!("no RENIEC token configured, skipping external lookup");
                return Ok(None);
            }
        };

        let url = format!("{}/reniec/dni", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("numero", documento)])
            .header(header::REFERER, RENIEC_REFERER)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::ExternalApi(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ApiError::ExternalApi(format!(
                "RENIEC answered {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::ExternalApi(e.to_string()))?;

        // The API represents "no such person" as a null body on some plans
        if body.is_null() {
            return Ok(None);
        }

        Ok(Some(body))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
