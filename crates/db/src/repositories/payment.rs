//! Payment repository: the append-only payment ledger.
//!
//! Recording a payment is a read-check-write on the parent transaction's
//! due balance, so the parent row is locked for the duration: two
//! concurrent payments against the same transaction serialize instead of
//! losing an update.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{payments, purchases, sales};
use khata_core::ledger::{LedgerAmounts, LedgerError, LedgerService, PaymentStatus};

/// Which ledger a payment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    /// Payment made to a supplier against a purchase.
    Purchase,
    /// Payment collected from a customer against a sale.
    Sale,
}

impl PaymentKind {
    /// Canonical string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        }
    }
}

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Ledger validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The parent transaction was not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Requested amount; the applied amount is capped at the due.
    pub amount: Decimal,
    /// Payment date.
    pub date: NaiveDate,
    /// Free-text note.
    pub note: Option<String>,
}

/// A recorded payment with the parent transaction's updated amounts.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The appended payment record.
    pub payment: payments::Model,
    /// Paid amount after the application.
    pub new_paid: Decimal,
    /// Due amount after the application.
    pub new_due: Decimal,
    /// Status after the application.
    pub new_status: PaymentStatus,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment against a purchase or sale.
    ///
    /// The appended record carries the applied (capped) amount, keeping the
    /// ledger in reconciliation with the transaction's `paid_amount`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Ledger` with `AlreadySettled` when nothing is
    /// due, and `PaymentError::NotFound` for an unknown transaction.
    pub async fn record(
        &self,
        workspace_id: Uuid,
        kind: PaymentKind,
        transaction_id: Uuid,
        input: RecordPaymentInput,
    ) -> Result<RecordedPayment, PaymentError> {
        let txn = self.db.begin().await?;

        let application = match kind {
            PaymentKind::Purchase => {
                let row = purchases::Entity::find_by_id(transaction_id)
                    .filter(purchases::Column::WorkspaceId.eq(workspace_id))
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(PaymentError::NotFound(transaction_id))?;

                let application = LedgerService::record_payment(
                    LedgerAmounts::new(row.total, row.paid_amount),
                    input.amount,
                    input.date,
                    input.note,
                )?;

                let mut active: purchases::ActiveModel = row.into();
                active.paid_amount = Set(application.new_paid);
                active.due_amount = Set(application.new_due);
                active.payment_status = Set(application.new_status.as_str().to_string());
                active.updated_at = Set(Utc::now().fixed_offset());
                active.update(&txn).await?;

                application
            }
            PaymentKind::Sale => {
                let row = sales::Entity::find_by_id(transaction_id)
                    .filter(sales::Column::WorkspaceId.eq(workspace_id))
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(PaymentError::NotFound(transaction_id))?;

                let application = LedgerService::record_payment(
                    LedgerAmounts::new(row.total, row.paid_amount),
                    input.amount,
                    input.date,
                    input.note,
                )?;

                let mut active: sales::ActiveModel = row.into();
                active.paid_amount = Set(application.new_paid);
                active.due_amount = Set(application.new_due);
                active.payment_status = Set(application.new_status.as_str().to_string());
                active.updated_at = Set(Utc::now().fixed_offset());
                active.update(&txn).await?;

                application
            }
        };

        let note = (!application.draft.note.is_empty()).then(|| application.draft.note.clone());
        let payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            workspace_id: Set(workspace_id),
            kind: Set(kind.as_str().to_string()),
            transaction_id: Set(transaction_id),
            amount: Set(application.draft.amount),
            date: Set(application.draft.date),
            note: Set(note),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(RecordedPayment {
            payment,
            new_paid: application.new_paid,
            new_due: application.new_due,
            new_status: application.new_status,
        })
    }

    /// Lists a transaction's payments, oldest first.
    pub async fn list_for(
        &self,
        workspace_id: Uuid,
        kind: PaymentKind,
        transaction_id: Uuid,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        Ok(payments::Entity::find()
            .filter(payments::Column::WorkspaceId.eq(workspace_id))
            .filter(payments::Column::Kind.eq(kind.as_str()))
            .filter(payments::Column::TransactionId.eq(transaction_id))
            .order_by_asc(payments::Column::Date)
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_kind_matches_schema_check() {
        // The kind column has a CHECK constraint on these two strings.
        assert_eq!(PaymentKind::Purchase.as_str(), "purchase");
        assert_eq!(PaymentKind::Sale.as_str(), "sale");
    }
}
