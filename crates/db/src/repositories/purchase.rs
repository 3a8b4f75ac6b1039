//! Purchase repository: source-of-supply transactions.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::item::{find_or_create_item, item_dependents, stock_level};
use crate::entities::{items, payments, purchases};
use khata_core::ledger::{EntryInput, LedgerError, LedgerService};
use khata_core::stock::{StockError, StockService};

/// Error types for purchase operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    /// Ledger validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Stock accounting rejected the operation.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Purchase not found.
    #[error("Purchase not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a purchase.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInput {
    /// Workspace scope.
    pub workspace_id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Supplier name.
    pub supplier: String,
    /// Item name; registered in the catalog on first purchase.
    pub item: String,
    /// Quantity acquired.
    pub qty: Decimal,
    /// Unit of measure (defaults to "units").
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

/// Optional date-range filter for listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    /// Inclusive start date.
    pub from: Option<NaiveDate>,
    /// Inclusive end date.
    pub to: Option<NaiveDate>,
}

/// Input for updating a purchase. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePurchaseInput {
    /// New quantity; recomputes the total and re-checks availability.
    pub qty: Option<Decimal>,
    /// New unit cost; recomputes the total.
    pub unit_cost: Option<Decimal>,
    /// New notes (empty clears).
    pub notes: Option<String>,
}

/// Purchase repository.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a purchase, registering the item if needed and recording an
    /// optional initial payment, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::Ledger` for invalid amounts.
    pub async fn create(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<purchases::Model, PurchaseError> {
        let opened = LedgerService::open_entry(&EntryInput {
            qty: input.qty,
            unit_amount: input.unit_cost,
            initial_payment: input.initial_payment,
            date: input.date,
            payment_note: input.payment_note,
        })?;

        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let item = find_or_create_item(
            &txn,
            input.workspace_id,
            &input.item,
            input.unit.as_deref(),
        )
        .await?;

        let purchase = purchases::ActiveModel {
            id: Set(Uuid::now_v7()),
            workspace_id: Set(input.workspace_id),
            date: Set(input.date),
            supplier: Set(input.supplier),
            item_id: Set(item.id),
            qty: Set(input.qty),
            unit: Set(input.unit.unwrap_or_else(|| item.unit.clone())),
            unit_cost: Set(input.unit_cost),
            total: Set(opened.total),
            paid_amount: Set(opened.paid_amount),
            due_amount: Set(opened.due_amount),
            payment_status: Set(opened.status.as_str().to_string()),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Some(draft) = opened.initial_payment {
            payments::ActiveModel {
                id: Set(Uuid::now_v7()),
                workspace_id: Set(input.workspace_id),
                kind: Set("purchase".to_string()),
                transaction_id: Set(purchase.id),
                amount: Set(draft.amount),
                date: Set(draft.date),
                note: Set(Some(draft.note)),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        debug!(purchase_id = %purchase.id, item = %item.name, total = %purchase.total, "Purchase created");

        Ok(purchase)
    }

    /// Lists the workspace's purchases, newest date first.
    pub async fn list(
        &self,
        workspace_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<purchases::Model>, PurchaseError> {
        let mut query = purchases::Entity::find()
            .filter(purchases::Column::WorkspaceId.eq(workspace_id));

        if let Some(from) = range.from {
            query = query.filter(purchases::Column::Date.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(purchases::Column::Date.lte(to));
        }

        Ok(query
            .order_by_desc(purchases::Column::Date)
            .order_by_desc(purchases::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds a purchase by ID within the workspace.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::NotFound` if no such purchase exists.
    pub async fn find(
        &self,
        workspace_id: Uuid,
        id: Uuid,
    ) -> Result<purchases::Model, PurchaseError> {
        purchases::Entity::find_by_id(id)
            .filter(purchases::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(PurchaseError::NotFound(id))
    }

    /// Updates a purchase. A quantity or unit-cost change recomputes the
    /// contract total, capping the already-paid amount at the new total;
    /// shrinking the quantity is rejected when stock acquired by this
    /// purchase has already been consumed elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::NotFound` if no such purchase exists and
    /// `PurchaseError::Stock` with `ResourceInUse` when dependent records
    /// block a quantity reduction.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        input: UpdatePurchaseInput,
    ) -> Result<purchases::Model, PurchaseError> {
        let txn = self.db.begin().await?;

        let purchase = purchases::Entity::find_by_id(id)
            .filter(purchases::Column::WorkspaceId.eq(workspace_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchaseError::NotFound(id))?;

        let new_qty = input.qty.unwrap_or(purchase.qty);
        let new_unit_cost = input.unit_cost.unwrap_or(purchase.unit_cost);
        let repricing = new_qty != purchase.qty || new_unit_cost != purchase.unit_cost;

        if repricing && new_qty < purchase.qty {
            // Shrinking the acquisition must not strand stock that is
            // already consumed; same check as deleting the surplus.
            let item = items::Entity::find_by_id(purchase.item_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(PurchaseError::NotFound(id))?;

            let level = stock_level(&txn, item.id).await?;
            let dependents = item_dependents(&txn, item.id).await?;
            StockService::ensure_source_removable(
                &format!("purchase of {}", item.name),
                purchase.qty - new_qty,
                level.available(),
                dependents,
            )?;
        }

        let mut active: purchases::ActiveModel = purchase.clone().into();
        if repricing {
            let repriced =
                LedgerService::reprice_entry(new_qty, new_unit_cost, purchase.paid_amount)?;
            active.qty = Set(new_qty);
            active.unit_cost = Set(new_unit_cost);
            active.total = Set(repriced.total);
            active.paid_amount = Set(repriced.paid_amount);
            active.due_amount = Set(repriced.due_amount);
            active.payment_status = Set(repriced.status.as_str().to_string());
        }
        if let Some(notes) = input.notes {
            active.notes = Set((!notes.is_empty()).then_some(notes));
        }
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }

    /// Deletes a purchase and its payments.
    ///
    /// A purchase is a source of supply: removing it subtracts its quantity
    /// from the item's acquisition history, so the removal is rejected when
    /// stock acquired by it has already been consumed elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::Stock` with `ResourceInUse` when dependent
    /// records still consume the acquired stock.
    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> Result<(), PurchaseError> {
        let txn = self.db.begin().await?;

        let purchase = purchases::Entity::find_by_id(id)
            .filter(purchases::Column::WorkspaceId.eq(workspace_id))
            .one(&txn)
            .await?
            .ok_or(PurchaseError::NotFound(id))?;

        // Lock the item row: the availability check must be serialized with
        // concurrent sales and builds consuming the same item.
        let item = items::Entity::find_by_id(purchase.item_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PurchaseError::NotFound(id))?;

        let level = stock_level(&txn, item.id).await?;
        let dependents = item_dependents(&txn, item.id).await?;
        StockService::ensure_source_removable(
            &format!("purchase of {}", item.name),
            purchase.qty,
            level.available(),
            dependents,
        )?;

        payments::Entity::delete_many()
            .filter(payments::Column::Kind.eq("purchase"))
            .filter(payments::Column::TransactionId.eq(purchase.id))
            .exec(&txn)
            .await?;

        purchases::Entity::delete_by_id(purchase.id).exec(&txn).await?;

        txn.commit().await?;

        debug!(purchase_id = %id, item = %item.name, "Purchase deleted");

        Ok(())
    }
}
