//! Sale routes (`/sale`).
//!
//! Registering a sale and reversing one (see `report.rs`) are the only
//! writes that touch two tables; both happen inside repository transactions
//! so stock and sale lines never drift apart.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use caja_core::document::{format_document_number, parse_document_number};
use caja_core::timestamp::{normalize_sale_timestamp, DATE_FORMAT};
use caja_core::validation::validate_quantity;
use caja_core::{
    Client, DailySaleSummary, NewSale, SaleDetailLine, SalePayload, SalePrintLine, ValidationError,
};
use caja_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/detallesVenta/:numero_documento", get(sale_details))
        .route("/imprimirIndividual/:numero_documento", get(print_sale))
        .route("/ventas-del-dia", get(today_sales))
        .route("/total-ventas", get(today_total))
        .route("/primercliente", get(first_client))
        .route("/registrar-venta", post(register_sale))
        .route("/last-document-number", get(next_document_number))
}

/// Today in the `YYYY-MM-DD` form the sale table's date prefix uses.
fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

async fn sale_details(
    State(state): State<AppState>,
    Path(numero_documento): Path<String>,
) -> ApiResult<Json<Vec<SaleDetailLine>>> {
    let document_number = parse_document_number(&numero_documento)?;

    let repo = state.db.sales();
    let lines = state
        .retry
        .run("sale details", || repo.details(document_number))
        .await?;

    if lines.is_empty() {
        return Err(ApiError::NotFound(
            "Detalles de venta no encontrados".to_string(),
        ));
    }

    Ok(Json(lines))
}

async fn print_sale(
    State(state): State<AppState>,
    Path(numero_documento): Path<String>,
) -> ApiResult<Json<Vec<SalePrintLine>>> {
    let document_number = parse_document_number(&numero_documento)?;

    let repo = state.db.sales();
    let lines = state
        .retry
        .run("print sale", || repo.print_lines(document_number))
        .await
        .map_err(|err| match err {
            DbError::NotFound { .. } => ApiError::NotFound("Venta no encontrada".to_string()),
            err => ApiError::Database(err),
        })?;

    Ok(Json(lines))
}

/// Today's sales, one row per receipt. An empty day is an empty array, not
/// an error; the dashboard polls this.
async fn today_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<DailySaleSummary>>> {
    let date = today();

    let repo = state.db.sales();
    let summaries = state
        .retry
        .run("today's sales", || repo.daily_summaries(&date))
        .await?;

    Ok(Json(summaries))
}

async fn today_total(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let date = today();

    let repo = state.db.sales();
    let total = state
        .retry
        .run("today's total", || repo.total_for_day(&date))
        .await?;

    match total {
        Some(total) => Ok(Json(json!({ "total_ventas": total }))),
        None => Err(ApiError::NotFoundError(
            "No se encontraron ventas para la fecha especificada".to_string(),
        )),
    }
}

async fn first_client(State(state): State<AppState>) -> ApiResult<Json<Client>> {
    let repo = state.db.clients();
    let client = state.retry.run("first client", || repo.first()).await?;

    match client {
        Some(client) => Ok(Json(client)),
        None => Err(ApiError::NotFound(
            "No se encontró ningún cliente.".to_string(),
        )),
    }
}

async fn register_sale(
    State(state): State<AppState>,
    Json(payload): Json<SalePayload>,
) -> ApiResult<Json<Value>> {
    validate_quantity(payload.cantidad_producto)?;

    if payload.document_number < 1 {
        return Err(ValidationError::MustBePositive {
            field: "document_number".to_string(),
        }
        .into());
    }

    if !payload.total.is_finite() || payload.total < 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "total".to_string(),
            reason: "must be a non-negative number".to_string(),
        }
        .into());
    }

    let date = normalize_sale_timestamp(&payload.date)?;

    let sale = NewSale {
        client_id: payload.client_id,
        user_id: payload.user_id,
        branch_id: payload.branch_id,
        product_id: payload.product_id,
        document_number: payload.document_number,
        quantity: payload.cantidad_producto,
        total: payload.total,
        date,
        payment_method: payload.payment_method,
    };

    let repo = state.db.sales();
    state
        .retry
        .run("register sale", || repo.register(&sale))
        .await
        .map_err(|err| match err {
            // No inventory row for this (product, branch): nothing was written
            DbError::NotFound { .. } => {
                ApiError::NotFound("Producto o sucursal no encontrados".to_string())
            }
            err => ApiError::Database(err),
        })?;

    Ok(Json(json!({ "message": "Venta registrada exitosamente" })))
}

/// Allocates the next document number and returns it padded.
///
/// Allocation happens in the database, so two tills asking at the same time
/// always receive different numbers. A number fetched and never used leaves
/// a gap, which is harmless.
async fn next_document_number(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let repo = state.db.sales();
    let number = state
        .retry
        .run("allocate document number", || repo.next_document_number())
        .await?;

    Ok(Json(
        json!({ "document_number": format_document_number(number) }),
    ))
}
