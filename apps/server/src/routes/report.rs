//! Report routes (`/report`).
//!
//! The day report here takes an explicit `fecha` query parameter; the
//! today-only variant lives under `/sale/ventas-del-dia`. Unlike that one,
//! an empty day on this route is a 404 with the legacy `{"error": ...}`
//! body, because the report screen distinguishes "no sales" from "empty
//! table".

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use caja_core::document::parse_document_number;
use caja_core::timestamp::validate_report_date;
use caja_core::{DailySaleSummary, ValidationError};
use caja_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/eliminar_venta/:numero_documento", delete(reverse_sale))
        .route("/ventas-del-dia", get(sales_of_day))
}

/// Deletes every line of a receipt and restores the stock each line took.
async fn reverse_sale(
    State(state): State<AppState>,
    Path(numero_documento): Path<String>,
) -> ApiResult<Json<Value>> {
    let document_number = parse_document_number(&numero_documento)?;

    let repo = state.db.sales();
    let lines = state
        .retry
        .run("reverse sale", || repo.reverse(document_number))
        .await
        .map_err(|err| match err {
            DbError::NotFound { .. } => ApiError::NotFoundError(
                "No se encontraron ventas con este número de documento".to_string(),
            ),
            err => ApiError::Database(err),
        })?;

    tracing::info!(document_number, lines, "sale reversed");

    Ok(Json(json!({ "message": "Venta eliminada exitosamente" })))
}

#[derive(Debug, Deserialize)]
struct ReportParams {
    fecha: Option<String>,
}

async fn sales_of_day(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Json<Vec<DailySaleSummary>>> {
    let fecha = params.fecha.ok_or_else(|| ValidationError::Required {
        field: "fecha".to_string(),
    })?;
    let date = validate_report_date(&fecha)?;

    let repo = state.db.sales();
    let summaries = state
        .retry
        .run("sales of day", || repo.daily_summaries(&date))
        .await?;

    if summaries.is_empty() {
        return Err(ApiError::NotFoundError(
            "No se encontraron ventas para la fecha especificada".to_string(),
        ));
    }

    Ok(Json(summaries))
}
