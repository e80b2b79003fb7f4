//! HTTP route handlers.
//!
//! One module per URL prefix, plus `session` for the root-level login and
//! session-liveness routes.
//!
//! ```text
//! /branch/...    branch.rs     stores
//! /user/...      user.rs       cashiers and admins
//! /client/...    client.rs     customers, search, external lookup
//! /product/...   product.rs    catalog and per-branch pricing
//! /sale/...      sale.rs       register, receipts, day totals
//! /report/...    report.rs     day reports, sale reversal
//! /user /validate-user /keep-alive    session.rs
//! ```

pub mod branch;
pub mod client;
pub mod product;
pub mod report;
pub mod sale;
pub mod session;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Assembles the full API surface.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(session::router())
        .nest("/branch", branch::router())
        .nest("/user", user::router())
        .nest("/client", client::router())
        .nest("/product", product::router())
        .nest("/sale", sale::router())
        .nest("/report", report::router())
}
