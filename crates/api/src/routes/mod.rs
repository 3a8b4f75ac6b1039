//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use khata_shared::AppError;

pub mod analytics;
pub mod auth;
pub mod health;
pub mod items;
pub mod products;
pub mod purchases;
pub mod sales;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(purchases::routes())
        .merge(sales::routes())
        .merge(items::routes())
        .merge(products::routes())
        .merge(analytics::routes())
        .merge(auth::protected_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Builds a JSON error response in the standard shape.
pub(crate) fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Builds a JSON error response from an app-level error.
pub(crate) fn app_error(err: &AppError) -> Response {
    let (status, code) = err.respond_with();
    domain_error(status, code, &err.to_string())
}

/// Builds a JSON error response from a domain error's code and status.
pub(crate) fn domain_error(status_code: u16, code: &str, message: &str) -> Response {
    let status =
        StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_error(status, code, message)
}

/// Builds the opaque 500 response for storage failures.
pub(crate) fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred",
    )
}
