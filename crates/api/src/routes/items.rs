//! Item catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use super::{domain_error, internal_error};
use crate::{AppState, middleware::AuthUser};
use khata_core::stock::StockLevel;
use khata_db::repositories::item::{ItemError, ItemRepository, UpdateItemInput};

/// Creates the item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/{id}", patch(update_item))
}

/// One catalog item with its derived stock level.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    /// Item ID.
    pub id: Uuid,
    /// Item name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Total quantity acquired.
    pub acquired: Decimal,
    /// Total quantity consumed.
    pub consumed: Decimal,
    /// Available quantity.
    pub available: Decimal,
    /// Low-stock alert threshold.
    pub low_stock_threshold: Decimal,
    /// Whether the item is flagged low stock.
    pub low_stock: bool,
}

/// Request body for updating an item.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// New unit of measure.
    pub unit: Option<String>,
    /// New low-stock threshold (zero disables).
    pub low_stock_threshold: Option<Decimal>,
}

/// Maps an item repository error to a response.
fn item_error(err: ItemError) -> Response {
    match err {
        ItemError::NotFound(id) => {
            domain_error(404, "NOT_FOUND", &format!("Item not found: {id}"))
        }
        ItemError::Database(e) => {
            error!(error = %e, "Database error in item operation");
            internal_error()
        }
    }
}

/// GET /items - The catalog with derived availability.
async fn list_items(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ItemRepository::new((*state.db).clone());

    match repo.list_with_stock(auth.workspace_id()).await {
        Ok(views) => {
            let rows: Vec<ItemResponse> = views
                .into_iter()
                .map(|view| {
                    let level = StockLevel::new(view.acquired, view.consumed);
                    ItemResponse {
                        id: view.id,
                        name: view.name,
                        unit: view.unit,
                        acquired: view.acquired,
                        consumed: view.consumed,
                        available: level.available(),
                        low_stock_threshold: view.low_stock_threshold,
                        low_stock: level.is_low(view.low_stock_threshold),
                    }
                })
                .collect();
            Json(rows).into_response()
        }
        Err(e) => item_error(e),
    }
}

/// PATCH /items/{id} - Update unit or low-stock threshold.
async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    let repo = ItemRepository::new((*state.db).clone());

    let input = UpdateItemInput {
        unit: payload.unit,
        low_stock_threshold: payload.low_stock_threshold,
    };

    match repo.update(auth.workspace_id(), id, input).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => item_error(e),
    }
}
