//! Sale routes, including returns and return paybacks.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::purchases::{ListQuery, RecordPaymentRequest, payment_error};
use super::{domain_error, internal_error};
use crate::{AppState, middleware::AuthUser};
use khata_db::repositories::payment::{PaymentKind, PaymentRepository, RecordPaymentInput};
use khata_db::repositories::purchase::DateRange;
use khata_db::repositories::sale::{
    CreateSaleInput, ProcessReturnInput, SaleError, SaleRepository, UpdateSaleInput,
};

/// Creates the sale routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales))
        .route("/sales", post(create_sale))
        .route("/sales/{id}", get(get_sale))
        .route("/sales/{id}", patch(update_sale))
        .route("/sales/{id}", delete(delete_sale))
        .route("/sales/{id}/payments", get(list_payments))
        .route("/sales/{id}/payments", post(record_payment))
        .route("/sales/{id}/return", post(process_return))
        .route("/sales/{id}/return-payments", post(record_return_payback))
}

/// Request body for creating a sale.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    /// Transaction date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer: String,
    /// Raw item name to sell (exactly one of `item`/`product_id`).
    pub item: Option<String>,
    /// Stock-tracked product to sell.
    pub product_id: Option<Uuid>,
    /// Quantity sold.
    pub qty: Decimal,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Optional payment collected at creation.
    pub initial_payment: Option<Decimal>,
    /// Note for the initial payment record.
    pub payment_note: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request body for updating a sale. Omitted fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateSaleRequest {
    /// New quantity; recomputes the total.
    pub qty: Option<Decimal>,
    /// New unit price; recomputes the total.
    pub unit_price: Option<Decimal>,
    /// New notes (empty clears).
    pub notes: Option<String>,
}

/// Request body for processing a return.
#[derive(Debug, Deserialize)]
pub struct ProcessReturnRequest {
    /// Date of the return.
    pub date: NaiveDate,
    /// Goods value collected back from the customer.
    pub collected_amount: Decimal,
    /// Money owed back; falls back to `collected_amount` when omitted.
    #[serde(default)]
    pub owe_amount: Decimal,
}

/// Request body for a return payback.
#[derive(Debug, Deserialize)]
pub struct ReturnPaybackRequest {
    /// Payback amount; capped at the outstanding refund.
    pub amount: Decimal,
}

/// Maps a sale repository error to a response.
fn sale_error(err: SaleError) -> Response {
    match err {
        SaleError::Ledger(e) => domain_error(e.http_status_code(), e.error_code(), &e.to_string()),
        SaleError::Stock(e) => domain_error(e.http_status_code(), e.error_code(), &e.to_string()),
        SaleError::Refund(e) => domain_error(e.http_status_code(), e.error_code(), &e.to_string()),
        SaleError::NotFound(id) => {
            domain_error(404, "NOT_FOUND", &format!("Sale not found: {id}"))
        }
        SaleError::ProductNotFound(id) => {
            domain_error(404, "NOT_FOUND", &format!("Product not found: {id}"))
        }
        SaleError::AmbiguousTarget => domain_error(
            400,
            "AMBIGUOUS_TARGET",
            "Sale must reference exactly one of item or product",
        ),
        SaleError::Database(e) => {
            error!(error = %e, "Database error in sale operation");
            internal_error()
        }
    }
}

/// GET /sales - List sales with optional date filters.
async fn list_sales(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());
    let range = DateRange {
        from: query.from,
        to: query.to,
    };

    match repo.list(auth.workspace_id(), range).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => sale_error(e),
    }
}

/// POST /sales - Create a sale, consuming stock.
async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSaleRequest>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    let input = CreateSaleInput {
        workspace_id: auth.workspace_id(),
        date: payload.date,
        customer: payload.customer,
        item: payload.item,
        product_id: payload.product_id,
        qty: payload.qty,
        unit: payload.unit,
        unit_price: payload.unit_price,
        initial_payment: payload.initial_payment,
        payment_note: payload.payment_note,
        notes: payload.notes,
    };

    match repo.create(input).await {
        Ok(sale) => (StatusCode::CREATED, Json(sale)).into_response(),
        Err(e) => sale_error(e),
    }
}

/// GET /sales/{id} - Fetch one sale.
async fn get_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.find(auth.workspace_id(), id).await {
        Ok(sale) => Json(sale).into_response(),
        Err(e) => sale_error(e),
    }
}

/// PATCH /sales/{id} - Update quantity, unit price, or notes.
async fn update_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSaleRequest>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    let input = UpdateSaleInput {
        qty: payload.qty,
        unit_price: payload.unit_price,
        notes: payload.notes,
    };

    match repo.update(auth.workspace_id(), id, input).await {
        Ok(sale) => Json(sale).into_response(),
        Err(e) => sale_error(e),
    }
}

/// DELETE /sales/{id} - Delete a sale, restoring the stock it consumed.
async fn delete_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.delete(auth.workspace_id(), id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => sale_error(e),
    }
}

/// GET /sales/{id}/payments - The sale's payment ledger.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let sale_repo = SaleRepository::new((*state.db).clone());
    if let Err(e) = sale_repo.find(auth.workspace_id(), id).await {
        return sale_error(e);
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_for(auth.workspace_id(), PaymentKind::Sale, id).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => payment_error(e),
    }
}

/// POST /sales/{id}/payments - Record a payment from the customer.
async fn record_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    let input = RecordPaymentInput {
        amount: payload.amount,
        date: payload.date,
        note: payload.note,
    };

    match repo
        .record(auth.workspace_id(), PaymentKind::Sale, id, input)
        .await
    {
        Ok(recorded) => (
            StatusCode::CREATED,
            Json(json!({
                "payment": recorded.payment,
                "paid_amount": recorded.new_paid,
                "due_amount": recorded.new_due,
                "payment_status": recorded.new_status.as_str(),
            })),
        )
            .into_response(),
        Err(e) => payment_error(e),
    }
}

/// POST /sales/{id}/return - Process a return, opening the refund ledger.
async fn process_return(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProcessReturnRequest>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    let input = ProcessReturnInput {
        date: payload.date,
        collected: payload.collected_amount,
        owed: payload.owe_amount,
    };

    match repo.process_return(auth.workspace_id(), id, input).await {
        Ok(sale) => Json(sale).into_response(),
        Err(e) => sale_error(e),
    }
}

/// POST /sales/{id}/return-payments - Pay back part of the refund owed.
async fn record_return_payback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReturnPaybackRequest>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo
        .record_return_payback(auth.workspace_id(), id, payload.amount)
        .await
    {
        Ok(sale) => Json(sale).into_response(),
        Err(e) => sale_error(e),
    }
}
