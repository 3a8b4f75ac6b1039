//! Initial database migration.
//!
//! Creates workspaces, users, the raw item catalog, and the base purchase
//! and sale tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(WORKSPACES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ITEMS_SQL).await?;
        db.execute_unprepared(PURCHASES_SQL).await?;
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS sales, purchases, items, users, workspaces CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const WORKSPACES_SQL: &str = r"
CREATE TABLE workspaces (
    id         UUID PRIMARY KEY,
    name       TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id            UUID PRIMARY KEY,
    workspace_id  UUID NOT NULL REFERENCES workspaces(id),
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL CHECK (role IN ('admin', 'member')),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ITEMS_SQL: &str = r"
CREATE TABLE items (
    id                  UUID PRIMARY KEY,
    workspace_id        UUID NOT NULL REFERENCES workspaces(id),
    name                TEXT NOT NULL,
    unit                TEXT NOT NULL DEFAULT 'units',
    low_stock_threshold NUMERIC NOT NULL DEFAULT 0,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (workspace_id, name)
);
";

const PURCHASES_SQL: &str = r"
CREATE TABLE purchases (
    id           UUID PRIMARY KEY,
    workspace_id UUID NOT NULL REFERENCES workspaces(id),
    date         DATE NOT NULL,
    supplier     TEXT NOT NULL,
    item_id      UUID NOT NULL REFERENCES items(id),
    qty          NUMERIC NOT NULL CHECK (qty > 0),
    unit         TEXT NOT NULL DEFAULT 'units',
    unit_cost    NUMERIC NOT NULL CHECK (unit_cost >= 0),
    total        NUMERIC NOT NULL,
    notes        TEXT,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id           UUID PRIMARY KEY,
    workspace_id UUID NOT NULL REFERENCES workspaces(id),
    date         DATE NOT NULL,
    customer     TEXT NOT NULL,
    item_id      UUID NOT NULL REFERENCES items(id),
    qty          NUMERIC NOT NULL CHECK (qty > 0),
    unit         TEXT NOT NULL DEFAULT 'units',
    unit_price   NUMERIC NOT NULL CHECK (unit_price >= 0),
    total        NUMERIC NOT NULL,
    notes        TEXT,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_users_workspace ON users(workspace_id);
CREATE INDEX idx_items_workspace ON items(workspace_id);
CREATE INDEX idx_purchases_workspace ON purchases(workspace_id);
CREATE INDEX idx_purchases_item ON purchases(item_id);
CREATE INDEX idx_purchases_date ON purchases(workspace_id, date);
CREATE INDEX idx_sales_workspace ON sales(workspace_id);
CREATE INDEX idx_sales_item ON sales(item_id);
CREATE INDEX idx_sales_date ON sales(workspace_id, date);
";
