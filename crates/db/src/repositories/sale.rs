//! Sale repository: stock-consuming transactions, returns, and paybacks.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::item::{find_item_by_name, stock_level};
use super::purchase::DateRange;
use crate::entities::{items, payments, products, sales};
use khata_core::ledger::{EntryInput, LedgerError, LedgerService};
use khata_core::refund::{RefundError, RefundService, ReturnState};
use khata_core::stock::{StockError, StockService};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Ledger validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Stock accounting rejected the operation.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Return/refund handling rejected the operation.
    #[error(transparent)]
    Refund(#[from] RefundError),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    NotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// A sale must consume from exactly one stock source.
    #[error("Sale must reference exactly one of item or product")]
    AmbiguousTarget,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// Workspace scope.
    pub workspace_id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer: String,
    /// Raw item name to sell (pre-registered via a purchase).
    pub item: Option<String>,
    /// Stock-tracked product to sell.
    pub product_id: Option<Uuid>,
    /// Quantity sold.
    pub qty: Decimal,
    /// Unit of measure (defaults to the stock source's unit).
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

/// Input for updating a sale. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateSaleInput {
    /// New quantity; recomputes the total and re-checks availability.
    pub qty: Option<Decimal>,
    /// New unit price; recomputes the total.
    pub unit_price: Option<Decimal>,
    /// New notes (empty clears).
    pub notes: Option<String>,
}

/// Input for processing a sale return.
#[derive(Debug, Clone, Copy)]
pub struct ProcessReturnInput {
    /// Date of the return.
    pub date: NaiveDate,
    /// Goods value collected back from the customer.
    pub collected: Decimal,
    /// Money owed back; falls back to `collected` when zero.
    pub owed: Decimal,
}

/// Sale repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a sale, debiting stock from the referenced item or product
    /// in the same transaction as the availability check.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::Stock` with `InsufficientStock` when the stock
    /// source cannot cover the quantity, and `UnknownItem` when the item
    /// was never registered by a purchase.
    pub async fn create(&self, input: CreateSaleInput) -> Result<sales::Model, SaleError> {
        let opened = LedgerService::open_entry(&EntryInput {
            qty: input.qty,
            unit_amount: input.unit_price,
            initial_payment: input.initial_payment,
            date: input.date,
            payment_note: input.payment_note.clone(),
        })?;

        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        // Resolve the stock source under a row lock, check availability,
        // and apply the debit before the sale row exists. Two concurrent
        // sales of the same source serialize on the lock.
        let (item_id, product_id, source_unit) = match (&input.item, input.product_id) {
            (Some(item_name), None) => {
                let item = find_item_by_name(&txn, input.workspace_id, item_name)
                    .await?
                    .ok_or_else(|| StockError::UnknownItem(item_name.clone()))?;
                let item = items::Entity::find_by_id(item.id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or_else(|| StockError::UnknownItem(item_name.clone()))?;

                let level = stock_level(&txn, item.id).await?;
                StockService::reserve(&item.name, input.qty, level.available())?;

                (Some(item.id), None, item.unit)
            }
            (None, Some(product_id)) => {
                let product = products::Entity::find_by_id(product_id)
                    .filter(products::Column::WorkspaceId.eq(input.workspace_id))
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(SaleError::ProductNotFound(product_id))?;

                StockService::reserve(&product.name, input.qty, product.stock_qty)?;

                let new_stock = product.stock_qty - input.qty;
                let unit = product.unit.clone();
                let mut active: products::ActiveModel = product.into();
                active.stock_qty = Set(new_stock);
                active.updated_at = Set(now);
                active.update(&txn).await?;

                (None, Some(product_id), unit)
            }
            _ => return Err(SaleError::AmbiguousTarget),
        };

        let sale = sales::ActiveModel {
            id: Set(Uuid::now_v7()),
            workspace_id: Set(input.workspace_id),
            date: Set(input.date),
            customer: Set(input.customer),
            item_id: Set(item_id),
            product_id: Set(product_id),
            qty: Set(input.qty),
            unit: Set(input.unit.unwrap_or(source_unit)),
            unit_price: Set(input.unit_price),
            total: Set(opened.total),
            paid_amount: Set(opened.paid_amount),
            due_amount: Set(opened.due_amount),
            payment_status: Set(opened.status.as_str().to_string()),
            is_return: Set(false),
            return_date: Set(None),
            return_collected: Set(None),
            return_owed: Set(Decimal::ZERO),
            return_paid_back: Set(Decimal::ZERO),
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
                kind: Set("sale".to_string()),
                transaction_id: Set(sale.id),
                amount: Set(draft.amount),
                date: Set(draft.date),
                note: Set(Some(draft.note)),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        debug!(sale_id = %sale.id, total = %sale.total, "Sale created");

        Ok(sale)
    }

    /// Lists the workspace's sales, newest date first.
    pub async fn list(
        &self,
        workspace_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<sales::Model>, SaleError> {
        let mut query =
            sales::Entity::find().filter(sales::Column::WorkspaceId.eq(workspace_id));

        if let Some(from) = range.from {
            query = query.filter(sales::Column::Date.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(sales::Column::Date.lte(to));
        }

        Ok(query
            .order_by_desc(sales::Column::Date)
            .order_by_desc(sales::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds a sale by ID within the workspace.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::NotFound` if no such sale exists.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> Result<sales::Model, SaleError> {
        sales::Entity::find_by_id(id)
            .filter(sales::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(SaleError::NotFound(id))
    }

    /// Updates a sale. A quantity or unit-price change recomputes the
    /// contract total, capping the already-collected amount at the new
    /// total; a quantity increase must pass the availability check for the
    /// extra units, and the stock delta is applied in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::NotFound` if no such sale exists,
    /// `SaleError::Stock` with `InsufficientStock` when the extra quantity
    /// cannot be covered, and `SaleError::Refund` with `AlreadyReturned`
    /// when repricing a returned sale (its stock already went back).
    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        input: UpdateSaleInput,
    ) -> Result<sales::Model, SaleError> {
        let txn = self.db.begin().await?;

        let sale = Self::find_locked(&txn, workspace_id, id).await?;

        let new_qty = input.qty.unwrap_or(sale.qty);
        let new_unit_price = input.unit_price.unwrap_or(sale.unit_price);
        let repricing = new_qty != sale.qty || new_unit_price != sale.unit_price;

        if repricing {
            if sale.is_return {
                return Err(RefundError::AlreadyReturned.into());
            }

            if let Some(item_id) = sale.item_id {
                if new_qty > sale.qty {
                    let item = items::Entity::find_by_id(item_id)
                        .lock_exclusive()
                        .one(&txn)
                        .await?
                        .ok_or(SaleError::NotFound(id))?;

                    let level = stock_level(&txn, item.id).await?;
                    StockService::reserve(&item.name, new_qty - sale.qty, level.available())?;
                }
                // The consumption sum is derived from sale rows, so the
                // updated quantity takes effect with the row itself.
            }

            if let Some(product_id) = sale.product_id {
                let product = products::Entity::find_by_id(product_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(SaleError::ProductNotFound(product_id))?;

                let new_stock = if new_qty > sale.qty {
                    let delta = new_qty - sale.qty;
                    StockService::reserve(&product.name, delta, product.stock_qty)?;
                    product.stock_qty - delta
                } else {
                    StockService::release(product.stock_qty, sale.qty - new_qty)
                };

                let mut active: products::ActiveModel = product.into();
                active.stock_qty = Set(new_stock);
                active.updated_at = Set(Utc::now().fixed_offset());
                active.update(&txn).await?;
            }
        }

        let mut active: sales::ActiveModel = sale.clone().into();
        if repricing {
            let repriced =
                LedgerService::reprice_entry(new_qty, new_unit_price, sale.paid_amount)?;
            active.qty = Set(new_qty);
            active.unit_price = Set(new_unit_price);
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

    /// Deletes a sale and its payments, restoring the stock it consumed.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::NotFound` if no such sale exists.
    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> Result<(), SaleError> {
        let txn = self.db.begin().await?;

        let sale = Self::find_locked(&txn, workspace_id, id).await?;

        // A returned sale already gave its stock back.
        if !sale.is_return {
            if let Some(product_id) = sale.product_id {
                Self::release_product_stock(&txn, product_id, sale.qty).await?;
            }
            // Item-backed consumption is derived from sale rows, so deleting
            // the row restores availability by itself.
        }

        payments::Entity::delete_many()
            .filter(payments::Column::Kind.eq("sale"))
            .filter(payments::Column::TransactionId.eq(sale.id))
            .exec(&txn)
            .await?;

        sales::Entity::delete_by_id(sale.id).exec(&txn).await?;

        txn.commit().await?;

        Ok(())
    }

    /// Processes a return: releases the sold stock and opens the refund
    /// ledger. The forward payment fields are untouched.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::Refund` with `AlreadyReturned` on a second
    /// return attempt.
    pub async fn process_return(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        input: ProcessReturnInput,
    ) -> Result<sales::Model, SaleError> {
        let txn = self.db.begin().await?;

        let sale = Self::find_locked(&txn, workspace_id, id).await?;

        let state = ReturnState {
            is_return: sale.is_return,
            return_owed: sale.return_owed,
            return_paid_back: sale.return_paid_back,
        };
        let outcome = RefundService::process_return(&state, input.date, input.collected, input.owed)?;

        if let Some(product_id) = sale.product_id {
            Self::release_product_stock(&txn, product_id, sale.qty).await?;
        }

        let mut active: sales::ActiveModel = sale.into();
        active.is_return = Set(true);
        active.return_date = Set(Some(outcome.return_date));
        active.return_collected = Set(Some(outcome.return_collected));
        active.return_owed = Set(outcome.return_owed);
        active.return_paid_back = Set(outcome.return_paid_back);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        debug!(sale_id = %id, return_owed = %updated.return_owed, "Sale returned");

        Ok(updated)
    }

    /// Records a payback against a returned sale's refund ledger, capped at
    /// the outstanding amount.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::Refund` with `NotReturned` when the sale has no
    /// refund ledger.
    pub async fn record_return_payback(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        amount: Decimal,
    ) -> Result<sales::Model, SaleError> {
        let txn = self.db.begin().await?;

        let sale = Self::find_locked(&txn, workspace_id, id).await?;

        let state = ReturnState {
            is_return: sale.is_return,
            return_owed: sale.return_owed,
            return_paid_back: sale.return_paid_back,
        };
        let application = RefundService::record_payback(&state, amount)?;

        let mut active: sales::ActiveModel = sale.into();
        active.return_paid_back = Set(application.new_paid_back);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }

    /// Loads a sale under an exclusive row lock.
    async fn find_locked(
        txn: &DatabaseTransaction,
        workspace_id: Uuid,
        id: Uuid,
    ) -> Result<sales::Model, SaleError> {
        sales::Entity::find_by_id(id)
            .filter(sales::Column::WorkspaceId.eq(workspace_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(SaleError::NotFound(id))
    }

    /// Returns product stock under an exclusive row lock.
    async fn release_product_stock(
        txn: &DatabaseTransaction,
        product_id: Uuid,
        qty: Decimal,
    ) -> Result<(), SaleError> {
        let product = products::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(SaleError::ProductNotFound(product_id))?;

        let new_stock = StockService::release(product.stock_qty, qty);
        let mut active: products::ActiveModel = product.into();
        active.stock_qty = Set(new_stock);
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(txn).await?;

        Ok(())
    }
}
