//! User routes (`/user`).
//!
//! Passwords never travel past this module: `adduser` and the update route
//! hash them before the repository sees anything, and the row types that
//! come back carry no password column at all.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use caja_core::validation::validate_required_text;
use caja_core::{NewUser, RecordState, User, UserUpdate};
use caja_db::DbError;

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/adduser", post(add_user))
        .route("/allusers", get(all_users))
        .route("/:id", put(update_user))
        .route("/:id/activate", put(activate_user))
        .route("/:id/disable", put(disable_user))
}

async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let username = validate_required_text("username", &payload.username)?;
    validate_required_text("password", &payload.password)?;
    let role = validate_required_text("role", payload.role.as_deref().unwrap_or(""))?;

    let password_hash = auth::hash_password(&payload.password)?;

    let repo = state.db.users();
    let user = state
        .retry
        .run("add user", || {
            repo.create(&username, &password_hash, &role)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// Also served at the root as GET /user
pub(crate) async fn all_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let repo = state.db.users();
    let users = state.retry.run("list users", || repo.list_all()).await?;

    Ok(Json(users))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    // An absent or blank password means "keep the current one"
    let password_hash = match changes.password.as_deref() {
        Some(password) if !password.trim().is_empty() => Some(auth::hash_password(password)?),
        _ => None,
    };

    let repo = state.db.users();
    let user = state
        .retry
        .run("update user", || {
            repo.update(
                id,
                changes.username.as_deref(),
                password_hash.as_deref(),
                changes.role.as_deref(),
            )
        })
        .await
        .map_err(user_not_found)?;

    Ok(Json(user))
}

async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.users();
    state
        .retry
        .run("activate user", || repo.set_state(id, RecordState::Active))
        .await
        .map_err(user_not_found)?;

    Ok(Json(json!({ "message": "Usuario activado correctamente" })))
}

async fn disable_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.users();
    state
        .retry
        .run("disable user", || repo.set_state(id, RecordState::Disable))
        .await
        .map_err(user_not_found)?;

    Ok(Json(json!({ "message": "Usuario desactivado correctamente" })))
}

fn user_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { .. } => ApiError::NotFound("Usuario no encontrado".to_string()),
        err => ApiError::Database(err),
    }
}
