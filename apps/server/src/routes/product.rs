//! Product routes (`/product`).
//!
//! A product only exists in relation to branches: creation seeds the first
//! inventory row (price set, stock 0) in the same transaction, and the
//! pricing, stock, and availability routes all address the
//! (product, branch) pairing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use caja_core::validation::{validate_price, validate_required_text};
use caja_core::{NewProduct, PricingUpdate, ProductListing, ProductUpdate, RecordState};
use caja_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addproduct", post(add_product))
        .route("/allproducts", get(all_products))
        .route("/:id", put(update_product))
        .route("/:product_id/branch/:branch_id", put(update_pricing))
        .route(
            "/:product_id/branch/:branch_id/disable",
            put(disable_in_branch),
        )
        .route(
            "/:product_id/branch/:branch_id/activate",
            put(activate_in_branch),
        )
}

async fn add_product(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<ProductListing>)> {
    let name = validate_required_text("name", &payload.name)?;
    validate_price(payload.price)?;

    let repo = state.db.products();
    let listing = state
        .retry
        .run("add product", || {
            repo.create_with_branch(
                &name,
                payload.description.as_deref(),
                payload.code.as_deref(),
                payload.branch_id,
                payload.price,
            )
        })
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}

async fn all_products(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductListing>>> {
    let repo = state.db.products();
    let products = state.retry.run("list products", || repo.list_all()).await?;

    Ok(Json(products))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<ProductUpdate>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.products();
    state
        .retry
        .run("update product", || repo.update(id, &changes))
        .await
        .map_err(product_not_found)?;

    Ok(Json(json!({ "message": "Producto actualizado correctamente" })))
}

async fn update_pricing(
    State(state): State<AppState>,
    Path((product_id, branch_id)): Path<(i64, i64)>,
    Json(changes): Json<PricingUpdate>,
) -> ApiResult<Json<Value>> {
    if let Some(price) = changes.price {
        validate_price(price)?;
    }

    let repo = state.db.products();
    state
        .retry
        .run("update product pricing", || {
            repo.update_pricing(product_id, branch_id, &changes)
        })
        .await
        .map_err(pairing_not_found)?;

    Ok(Json(json!({
        "message": "Datos de la sucursal del producto actualizados correctamente"
    })))
}

async fn disable_in_branch(
    State(state): State<AppState>,
    Path((product_id, branch_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.products();
    state
        .retry
        .run("disable product in branch", || {
            repo.set_branch_state(product_id, branch_id, RecordState::Disable)
        })
        .await
        .map_err(pairing_not_found)?;

    Ok(Json(json!({
        "message": "Producto desactivado correctamente en la sucursal"
    })))
}

async fn activate_in_branch(
    State(state): State<AppState>,
    Path((product_id, branch_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Value>> {
    let repo = state.db.products();
    state
        .retry
        .run("activate product in branch", || {
            repo.set_branch_state(product_id, branch_id, RecordState::Active)
        })
        .await
        .map_err(pairing_not_found)?;

    Ok(Json(json!({
        "message": "Producto activado correctamente en la sucursal"
    })))
}

fn product_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { .. } => ApiError::NotFound("Producto no encontrado".to_string()),
        err => ApiError::Database(err),
    }
}

fn pairing_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { .. } => {
            ApiError::NotFound("Producto o sucursal no encontrados".to_string())
        }
        err => ApiError::Database(err),
    }
}
