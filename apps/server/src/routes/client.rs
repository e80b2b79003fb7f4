//! Client routes (`/client`).
//!
//! The search route is deliberately single-attempt: the front desk fires a
//! query per keystroke, and a stale result beats one that arrives after the
//! retry delay. Everything else goes through the retry policy like the rest
//! of the API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use caja_core::validation::{validate_required_text, validate_search_query};
use caja_core::{Client, ClientUpdate, NewClient};
use caja_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_clients))
        .route("/addclient", post(add_client))
        .route("/allclients", get(all_clients))
        .route("/:id", put(update_client))
        .route("/apicliente/:documento", get(lookup_by_document))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

async fn search_clients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Client>>> {
    let term = validate_search_query(&params.query)?;

    let clients = state.db.clients().search(&term).await?;

    Ok(Json(clients))
}

async fn add_client(
    State(state): State<AppState>,
    Json(payload): Json<NewClient>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let name = validate_required_text("name", &payload.name)?;

    let repo = state.db.clients();
    let client = state
        .retry
        .run("add client", || {
            repo.create(&name, payload.document.as_deref(), payload.phone.as_deref())
        })
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

async fn all_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    let repo = state.db.clients();
    let clients = state.retry.run("list clients", || repo.list_all()).await?;

    Ok(Json(clients))
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<ClientUpdate>,
) -> ApiResult<Json<Client>> {
    let repo = state.db.clients();
    let client = state
        .retry
        .run("update client", || repo.update(id, &changes))
        .await
        .map_err(client_not_found)?;

    Ok(Json(client))
}

/// Identity lookup: local client table first, then the RENIEC API.
///
/// A local hit returns the stored client row; an upstream hit passes the
/// RENIEC JSON through untouched, so the two response shapes differ and the
/// frontend is expected to cope.
async fn lookup_by_document(
    State(state): State<AppState>,
    Path(documento): Path<String>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.clients();
    if let Some(client) = repo.find_by_document(&documento).await? {
        let row = serde_json::to_value(client).map_err(|e| ApiError::Internal(e.to_string()))?;
        return Ok(Json(row));
    }

    match state.reniec.lookup_document(&documento).await? {
        Some(person) => Ok(Json(person)),
        None => Err(ApiError::NotFound("Cliente no encontrado.".to_string())),
    }
}

fn client_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { .. } => ApiError::NotFound("Cliente no encontrado".to_string()),
        err => ApiError::Database(err),
    }
}
