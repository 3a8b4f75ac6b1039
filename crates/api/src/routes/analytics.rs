//! Analytics routes: read-side reports over committed transactions.
//!
//! Every route here is admin-only; day-to-day bookkeeping roles get the
//! transaction and catalog endpoints instead.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::error;

use super::{app_error, internal_error};
use crate::{AppState, middleware::AuthUser};
use khata_db::repositories::report::{ReportError, ReportRepository};
use khata_shared::AppError;

/// Creates the analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(summary))
        .route("/analytics/monthly", get(monthly))
        .route("/analytics/inventory", get(inventory))
        .route("/analytics/dues", get(sale_dues))
        .route("/analytics/purchase-dues", get(purchase_dues))
        .route("/analytics/return-dues", get(return_dues))
}

/// Rejects non-admin callers.
fn require_admin(auth: &AuthUser) -> Result<(), Response> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(app_error(&AppError::Forbidden(
            "Analytics requires the admin role".to_string(),
        )))
    }
}

/// Maps a report repository error to a response.
fn report_error(err: ReportError) -> Response {
    match err {
        ReportError::Database(e) => {
            error!(error = %e, "Database error in report generation");
            internal_error()
        }
    }
}

/// GET /analytics/summary - Overall business summary.
async fn summary(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(rejection) = require_admin(&auth) {
        return rejection;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo.summary(auth.workspace_id()).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => report_error(e),
    }
}

/// GET /analytics/monthly - Month-by-month breakdown.
async fn monthly(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(rejection) = require_admin(&auth) {
        return rejection;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo.monthly(auth.workspace_id()).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => report_error(e),
    }
}

/// GET /analytics/inventory - Per-item availability with low-stock flags.
async fn inventory(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(rejection) = require_admin(&auth) {
        return rejection;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo.inventory(auth.workspace_id()).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => report_error(e),
    }
}

/// GET /analytics/dues - Sales with outstanding balances, oldest first.
async fn sale_dues(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(rejection) = require_admin(&auth) {
        return rejection;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo.sale_dues(auth.workspace_id()).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => report_error(e),
    }
}

/// GET /analytics/purchase-dues - Purchases with outstanding balances,
/// oldest first.
async fn purchase_dues(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(rejection) = require_admin(&auth) {
        return rejection;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo.purchase_dues(auth.workspace_id()).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => report_error(e),
    }
}

/// GET /analytics/return-dues - Returned sales with outstanding refunds,
/// oldest first.
async fn return_dues(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(rejection) = require_admin(&auth) {
        return rejection;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo.return_dues(auth.workspace_id()).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => report_error(e),
    }
}
