//! Error types for the HTTP API.
//!
//! ## Transport Mapping
//! ```text
//! ApiError::Validation          → 400 {"error": ...}
//! ApiError::InvalidCredentials  → 401 {"error": "Credenciales incorrectas"}
//! ApiError::NotFound            → 404 {"message": ...}
//! ApiError::NotFoundError       → 404 {"error": ...}
//! ApiError::ExternalApi         → 500 {"error": "Error interno del servidor."}
//! ApiError::Database            → 404/409/400/500 depending on the DbError
//! ApiError::Internal            → 500 {"error": "Error interno del servidor"}
//! ```
//!
//! The desktop frontend matches on body keys, so the split between
//! `{"message"}` and `{"error"}` not-found bodies is load-bearing: entity
//! routes answer with `message`, the report and totals routes with `error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use caja_core::ValidationError;
use caja_db::DbError;
use serde_json::json;

/// Fixed body text for failures the client cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

/// HTTP API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request input failed business validation.
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password on login.
    #[error("Credenciales incorrectas")]
    InvalidCredentials,

    /// Missing entity on a route whose 404 body is `{"message": ...}`.
    #[error("{0}")]
    NotFound(String),

    /// Missing entity on a route whose 404 body is `{"error": ...}`.
    #[error("{0}")]
    NotFoundError(String),

    /// The external identity API call failed.
    #[error("External lookup failed: {0}")]
    ExternalApi(String),

    /// Database failure, already past the retry policy.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Anything else that should never surface verbatim.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }

            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Credenciales incorrectas" })),
            )
                .into_response(),

            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": msg }))).into_response()
            }

            ApiError::NotFoundError(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }

            ApiError::ExternalApi(detail) => {
                tracing::error!(%detail, "external identity lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Error interno del servidor." })),
                )
                    .into_response()
            }

            ApiError::Database(err) => database_response(err),

            ApiError::Internal(detail) => {
                tracing::error!(%detail, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

/// Maps database errors onto HTTP responses.
///
/// Deterministic client mistakes (duplicates, dangling foreign keys) come
/// back as 4xx with their own text. Everything else collapses into the fixed
/// 500 body once the detail has been logged; infrastructure strings never
/// reach the client.
fn database_response(err: DbError) -> Response {
    match err {
        DbError::NotFound { .. } => {
            (StatusCode::NOT_FOUND, Json(json!({ "message": err.to_string() }))).into_response()
        }

        DbError::UniqueViolation { .. } => {
            (StatusCode::CONFLICT, Json(json!({ "error": err.to_string() }))).into_response()
        }

        DbError::ForeignKeyViolation { .. } => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() }))).into_response()
        }

        err => {
            tracing::error!(error = %err, "request failed against the database");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
            )
                .into_response()
        }
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body_shapes() {
        let response = ApiError::NotFound("Producto no encontrado".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Producto no encontrado");

        let response = ApiError::NotFoundError(
            "No se encontraron ventas con este número de documento".into(),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "No se encontraron ventas con este número de documento"
        );
    }

    #[tokio::test]
    async fn test_transient_database_error_collapses_to_fixed_body() {
        let response = ApiError::Database(DbError::PoolExhausted).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Error interno del servidor");
    }

    #[tokio::test]
    async fn test_invalid_credentials_is_401() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Credenciales incorrectas");
    }

    #[tokio::test]
    async fn test_validation_error_is_400() {
        let err: ApiError = caja_core::validation::validate_quantity(0)
            .unwrap_err()
            .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "cantidad_producto must be positive");
    }
}
