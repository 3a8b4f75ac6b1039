//! Purchase routes.

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

use super::{domain_error, internal_error};
use crate::{AppState, middleware::AuthUser};
use khata_db::repositories::payment::{
    PaymentError, PaymentKind, PaymentRepository, RecordPaymentInput,
};
use khata_db::repositories::purchase::{
    CreatePurchaseInput, DateRange, PurchaseError, PurchaseRepository, UpdatePurchaseInput,
};

/// Creates the purchase routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(list_purchases))
        .route("/purchases", post(create_purchase))
        .route("/purchases/{id}", get(get_purchase))
        .route("/purchases/{id}", patch(update_purchase))
        .route("/purchases/{id}", delete(delete_purchase))
        .route("/purchases/{id}/payments", get(list_payments))
        .route("/purchases/{id}/payments", post(record_payment))
}

/// Query parameters for listing purchases.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Inclusive start date (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Inclusive end date (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Request body for creating a purchase.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    /// Transaction date.
    pub date: NaiveDate,
    /// Supplier name.
    pub supplier: String,
    /// Item name.
    pub item: String,
    /// Quantity acquired.
    pub qty: Decimal,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Cost per unit.
    pub unit_cost: Decimal,
    /// Optional payment made at creation.
    pub initial_payment: Option<Decimal>,
    /// Note for the initial payment record.
    pub payment_note: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request body for updating a purchase. Omitted fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseRequest {
    /// New quantity; recomputes the total.
    pub qty: Option<Decimal>,
    /// New unit cost; recomputes the total.
    pub unit_cost: Option<Decimal>,
    /// New notes (empty clears).
    pub notes: Option<String>,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// Requested amount.
    pub amount: Decimal,
    /// Payment date.
    pub date: NaiveDate,
    /// Free-text note.
    pub note: Option<String>,
}

/// Maps a purchase repository error to a response.
fn purchase_error(err: PurchaseError) -> Response {
    match err {
        PurchaseError::Ledger(e) => domain_error(e.http_status_code(), e.error_code(), &e.to_string()),
        PurchaseError::Stock(e) => domain_error(e.http_status_code(), e.error_code(), &e.to_string()),
        PurchaseError::NotFound(id) => domain_error(
            404,
            "NOT_FOUND",
            &format!("Purchase not found: {id}"),
        ),
        PurchaseError::Database(e) => {
            error!(error = %e, "Database error in purchase operation");
            internal_error()
        }
    }
}

/// Maps a payment repository error to a response.
pub(crate) fn payment_error(err: PaymentError) -> Response {
    match err {
        PaymentError::Ledger(e) => domain_error(e.http_status_code(), e.error_code(), &e.to_string()),
        PaymentError::NotFound(id) => domain_error(
            404,
            "NOT_FOUND",
            &format!("Transaction not found: {id}"),
        ),
        PaymentError::Database(e) => {
            error!(error = %e, "Database error in payment operation");
            internal_error()
        }
    }
}

/// GET /purchases - List purchases with optional date filters.
async fn list_purchases(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());
    let range = DateRange {
        from: query.from,
        to: query.to,
    };

    match repo.list(auth.workspace_id(), range).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => purchase_error(e),
    }
}

/// POST /purchases - Create a purchase.
async fn create_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePurchaseRequest>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());

    let input = CreatePurchaseInput {
        workspace_id: auth.workspace_id(),
        date: payload.date,
        supplier: payload.supplier,
        item: payload.item,
        qty: payload.qty,
        unit: payload.unit,
        unit_cost: payload.unit_cost,
        initial_payment: payload.initial_payment,
        payment_note: payload.payment_note,
        notes: payload.notes,
    };

    match repo.create(input).await {
        Ok(purchase) => (StatusCode::CREATED, Json(purchase)).into_response(),
        Err(e) => purchase_error(e),
    }
}

/// GET /purchases/{id} - Fetch one purchase.
async fn get_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());

    match repo.find(auth.workspace_id(), id).await {
        Ok(purchase) => Json(purchase).into_response(),
        Err(e) => purchase_error(e),
    }
}

/// PATCH /purchases/{id} - Update quantity, unit cost, or notes.
async fn update_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseRequest>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());

    let input = UpdatePurchaseInput {
        qty: payload.qty,
        unit_cost: payload.unit_cost,
        notes: payload.notes,
    };

    match repo.update(auth.workspace_id(), id, input).await {
        Ok(purchase) => Json(purchase).into_response(),
        Err(e) => purchase_error(e),
    }
}

/// DELETE /purchases/{id} - Delete a purchase and its payments.
async fn delete_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());

    match repo.delete(auth.workspace_id(), id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => purchase_error(e),
    }
}

/// GET /purchases/{id}/payments - The purchase's payment ledger.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let purchase_repo = PurchaseRepository::new((*state.db).clone());
    if let Err(e) = purchase_repo.find(auth.workspace_id(), id).await {
        return purchase_error(e);
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo
        .list_for(auth.workspace_id(), PaymentKind::Purchase, id)
        .await
    {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => payment_error(e),
    }
}

/// POST /purchases/{id}/payments - Record a payment to the supplier.
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
        .record(auth.workspace_id(), PaymentKind::Purchase, id, input)
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
