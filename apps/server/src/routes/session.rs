//! Root-level session routes.
//!
//! Three routes the desktop frontend calls outside any entity prefix:
//! the `/user` listing alias, login, and the session keep-alive ping.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use caja_core::KEEP_ALIVE_CLIENT_ID;

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::routes::user::all_users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", get(all_users))
        .route("/validate-user", post(validate_user))
        .route("/keep-alive", get(keep_alive))
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

/// Login. The stored hash never leaves the server; the response carries
/// exactly the three fields the frontend session keeps.
async fn validate_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.users();
    let credentials = state
        .retry
        .run("validate user", || {
            repo.find_credentials(&payload.username)
        })
        .await?;

    // Same 401 whether the username is unknown or the password wrong
    let user = match credentials {
        Some(user) if auth::verify_password(&payload.password, &user.password) => user,
        _ => return Err(ApiError::InvalidCredentials),
    };

    Ok(Json(json!({
        "username": user.username,
        "role": user.role,
        "id": user.id,
    })))
}

/// Session liveness ping. Answers with the walk-in client's name, which the
/// frontend shows in the status bar as proof the backend and database are
/// both reachable.
async fn keep_alive(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let repo = state.db.clients();
    let client = state
        .retry
        .run("keep alive", || repo.get_by_id(KEEP_ALIVE_CLIENT_ID))
        .await?;

    match client {
        Some(client) => Ok(Json(json!({ "clientName": client.name }))),
        None => Err(ApiError::NotFound("Cliente no encontrado.".to_string())),
    }
}
