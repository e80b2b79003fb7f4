//! Branch routes (`/branch`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use caja_core::validation::validate_required_text;
use caja_core::{Branch, BranchState, BranchUpdate, NewBranch};
use caja_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addbranch", post(add_branch))
        .route("/allbranches", get(all_branches))
        .route("/:id", put(update_branch))
        .route("/:id/disable", put(disable_branch))
        .route("/:id/activate", put(activate_branch))
}

async fn add_branch(
    State(state): State<AppState>,
    Json(payload): Json<NewBranch>,
) -> ApiResult<(StatusCode, Json<Branch>)> {
    let name = validate_required_text("name", &payload.name)?;

    let repo = state.db.branches();
    let branch = state
        .retry
        .run("add branch", || {
            repo.create(
                &name,
                payload.location.as_deref(),
                payload.manager.as_deref(),
                payload.phone.as_deref(),
            )
        })
        .await?;

    Ok((StatusCode::CREATED, Json(branch)))
}

async fn all_branches(State(state): State<AppState>) -> ApiResult<Json<Vec<Branch>>> {
    let repo = state.db.branches();
    let branches = state.retry.run("list branches", || repo.list_all()).await?;

    Ok(Json(branches))
}

async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<BranchUpdate>,
) -> ApiResult<Json<Branch>> {
    let repo = state.db.branches();
    let branch = state
        .retry
        .run("update branch", || repo.update(id, &changes))
        .await
        .map_err(branch_not_found)?;

    Ok(Json(branch))
}

async fn disable_branch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.branches();
    state
        .retry
        .run("disable branch", || {
            repo.set_state(id, BranchState::Disabled)
        })
        .await
        .map_err(branch_not_found)?;

    // The frontend matches this exact text, English head and all
    Ok(Json(json!({ "message": "Branch desactivado correctamente" })))
}

async fn activate_branch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.branches();
    state
        .retry
        .run("activate branch", || repo.set_state(id, BranchState::Active))
        .await
        .map_err(branch_not_found)?;

    Ok(Json(json!({ "message": "Sucursal activada correctamente" })))
}

fn branch_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { .. } => ApiError::NotFound("Sucursal no encontrada".to_string()),
        err => ApiError::Database(err),
    }
}
