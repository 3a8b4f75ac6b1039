//! Payment ledger migration.
//!
//! Adds the paid/due/status columns to purchases and sales and creates the
//! append-only payments table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(LEDGER_COLUMNS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS payments;
            ALTER TABLE purchases
                DROP COLUMN IF EXISTS paid_amount,
                DROP COLUMN IF EXISTS due_amount,
                DROP COLUMN IF EXISTS payment_status;
            ALTER TABLE sales
                DROP COLUMN IF EXISTS paid_amount,
                DROP COLUMN IF EXISTS due_amount,
                DROP COLUMN IF EXISTS payment_status;
            ",
        )
        .await?;
        Ok(())
    }
}

const LEDGER_COLUMNS_SQL: &str = r"
ALTER TABLE purchases
    ADD COLUMN paid_amount    NUMERIC NOT NULL DEFAULT 0 CHECK (paid_amount >= 0),
    ADD COLUMN due_amount     NUMERIC NOT NULL DEFAULT 0 CHECK (due_amount >= 0),
    ADD COLUMN payment_status TEXT NOT NULL DEFAULT 'unpaid'
        CHECK (payment_status IN ('unpaid', 'partial', 'paid'));

ALTER TABLE sales
    ADD COLUMN paid_amount    NUMERIC NOT NULL DEFAULT 0 CHECK (paid_amount >= 0),
    ADD COLUMN due_amount     NUMERIC NOT NULL DEFAULT 0 CHECK (due_amount >= 0),
    ADD COLUMN payment_status TEXT NOT NULL DEFAULT 'unpaid'
        CHECK (payment_status IN ('unpaid', 'partial', 'paid'));

-- Backfill: pre-ledger rows are treated as fully unpaid.
UPDATE purchases SET due_amount = total;
UPDATE sales SET due_amount = total;
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id             UUID PRIMARY KEY,
    workspace_id   UUID NOT NULL REFERENCES workspaces(id),
    kind           TEXT NOT NULL CHECK (kind IN ('purchase', 'sale')),
    transaction_id UUID NOT NULL,
    amount         NUMERIC NOT NULL CHECK (amount > 0),
    date           DATE NOT NULL,
    note           TEXT,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payments_workspace ON payments(workspace_id);
CREATE INDEX idx_payments_transaction ON payments(kind, transaction_id);
";
