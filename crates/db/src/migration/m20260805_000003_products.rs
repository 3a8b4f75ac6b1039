//! Products migration.
//!
//! Adds stock-tracked products with recipe lines, and lets sales reference
//! a product instead of a raw item (exactly one of the two).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(SALES_TARGET_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            ALTER TABLE sales
                DROP CONSTRAINT IF EXISTS sales_single_target,
                DROP COLUMN IF EXISTS product_id;
            ALTER TABLE sales ALTER COLUMN item_id SET NOT NULL;
            DROP TABLE IF EXISTS product_ingredients, products CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id           UUID PRIMARY KEY,
    workspace_id UUID NOT NULL REFERENCES workspaces(id),
    name         TEXT NOT NULL,
    unit         TEXT NOT NULL DEFAULT 'units',
    unit_price   NUMERIC NOT NULL CHECK (unit_price >= 0),
    stock_qty    NUMERIC NOT NULL DEFAULT 0 CHECK (stock_qty >= 0),
    units_built  NUMERIC NOT NULL DEFAULT 0 CHECK (units_built >= 0),
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (workspace_id, name)
);

CREATE TABLE product_ingredients (
    id           UUID PRIMARY KEY,
    product_id   UUID NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    item_id      UUID NOT NULL REFERENCES items(id),
    qty_per_unit NUMERIC NOT NULL CHECK (qty_per_unit > 0),
    UNIQUE (product_id, item_id)
);

CREATE INDEX idx_products_workspace ON products(workspace_id);
CREATE INDEX idx_product_ingredients_item ON product_ingredients(item_id);
";

const SALES_TARGET_SQL: &str = r"
ALTER TABLE sales ALTER COLUMN item_id DROP NOT NULL;
ALTER TABLE sales ADD COLUMN product_id UUID REFERENCES products(id);
ALTER TABLE sales ADD CONSTRAINT sales_single_target
    CHECK ((item_id IS NULL) <> (product_id IS NULL));
CREATE INDEX idx_sales_product ON sales(product_id);
";
