//! Product routes: stock-tracked finished goods with recipes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::{domain_error, internal_error};
use crate::{AppState, middleware::AuthUser};
use khata_db::repositories::product::{
    CreateProductInput, IngredientInput, ProductError, ProductRepository, ProductWithRecipe,
};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products", post(create_product))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/restock", post(restock_product))
}

/// One recipe line in a product request.
#[derive(Debug, Deserialize)]
pub struct IngredientRequest {
    /// Ingredient item name (must be pre-registered via a purchase).
    pub item: String,
    /// Quantity consumed per unit of product built.
    pub qty_per_unit: Decimal,
}

/// Request body for defining a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Product name (unique per workspace).
    pub name: String,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Selling price per unit.
    pub unit_price: Decimal,
    /// Units to build immediately; consumes ingredients. Defaults to zero.
    #[serde(default)]
    pub units: Decimal,
    /// Recipe lines; may be empty for bought-in goods.
    #[serde(default)]
    pub ingredients: Vec<IngredientRequest>,
}

/// Request body for building more units.
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    /// Units to build; consumes the recipe's ingredients.
    pub units: Decimal,
}

/// One recipe line in a product response.
#[derive(Debug, Serialize)]
pub struct RecipeLineResponse {
    /// Ingredient item ID.
    pub item_id: Uuid,
    /// Ingredient item name.
    pub item: String,
    /// Quantity consumed per unit built.
    pub qty_per_unit: Decimal,
}

/// A product with its recipe.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product ID.
    pub id: Uuid,
    /// Product name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Selling price per unit.
    pub unit_price: Decimal,
    /// Units currently in stock.
    pub stock_qty: Decimal,
    /// Units built over the product's lifetime.
    pub units_built: Decimal,
    /// Recipe lines.
    pub ingredients: Vec<RecipeLineResponse>,
}

impl From<ProductWithRecipe> for ProductResponse {
    fn from(value: ProductWithRecipe) -> Self {
        Self {
            id: value.product.id,
            name: value.product.name,
            unit: value.product.unit,
            unit_price: value.product.unit_price,
            stock_qty: value.product.stock_qty,
            units_built: value.product.units_built,
            ingredients: value
                .ingredients
                .into_iter()
                .map(|line| RecipeLineResponse {
                    item_id: line.item_id,
                    item: line.item_name,
                    qty_per_unit: line.qty_per_unit,
                })
                .collect(),
        }
    }
}

/// Maps a product repository error to a response.
fn product_error(err: ProductError) -> Response {
    match err {
        ProductError::Stock(e) => {
            domain_error(e.http_status_code(), e.error_code(), &e.to_string())
        }
        ProductError::NameTaken(name) => domain_error(
            409,
            "NAME_TAKEN",
            &format!("Product name already exists: {name}"),
        ),
        ProductError::NotFound(id) => {
            domain_error(404, "NOT_FOUND", &format!("Product not found: {id}"))
        }
        ProductError::Database(e) => {
            error!(error = %e, "Database error in product operation");
            internal_error()
        }
    }
}

/// GET /products - List products with their recipes.
async fn list_products(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.list(auth.workspace_id()).await {
        Ok(rows) => Json(
            rows.into_iter()
                .map(ProductResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => product_error(e),
    }
}

/// POST /products - Define a product, consuming ingredients for the
/// initial build.
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    let input = CreateProductInput {
        workspace_id: auth.workspace_id(),
        name: payload.name,
        unit: payload.unit,
        unit_price: payload.unit_price,
        units: payload.units,
        ingredients: payload
            .ingredients
            .into_iter()
            .map(|line| IngredientInput {
                item: line.item,
                qty_per_unit: line.qty_per_unit,
            })
            .collect(),
    };

    match repo.define(input).await {
        Ok(product) => {
            (StatusCode::CREATED, Json(ProductResponse::from(product))).into_response()
        }
        Err(e) => product_error(e),
    }
}

/// GET /products/{id} - Fetch one product.
async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.find(auth.workspace_id(), id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => product_error(e),
    }
}

/// POST /products/{id}/restock - Build more units, consuming the recipe.
async fn restock_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RestockRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.restock(auth.workspace_id(), id, payload.units).await {
        Ok(product) => Json(json!({
            "id": product.id,
            "name": product.name,
            "stock_qty": product.stock_qty,
            "units_built": product.units_built,
        }))
        .into_response(),
        Err(e) => product_error(e),
    }
}
