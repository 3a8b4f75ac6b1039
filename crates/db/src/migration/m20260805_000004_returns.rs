//! Sale returns migration.
//!
//! Adds the refund ledger to sales: the one-way return flag plus the
//! owed/paid-back amounts, decoupled from the forward payment columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(RETURNS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            ALTER TABLE sales
                DROP COLUMN IF EXISTS is_return,
                DROP COLUMN IF EXISTS return_date,
                DROP COLUMN IF EXISTS return_collected,
                DROP COLUMN IF EXISTS return_owed,
                DROP COLUMN IF EXISTS return_paid_back;
            ",
        )
        .await?;
        Ok(())
    }
}

const RETURNS_SQL: &str = r"
ALTER TABLE sales
    ADD COLUMN is_return        BOOLEAN NOT NULL DEFAULT false,
    ADD COLUMN return_date      DATE,
    ADD COLUMN return_collected NUMERIC,
    ADD COLUMN return_owed      NUMERIC NOT NULL DEFAULT 0 CHECK (return_owed >= 0),
    ADD COLUMN return_paid_back NUMERIC NOT NULL DEFAULT 0 CHECK (return_paid_back >= 0);
";
