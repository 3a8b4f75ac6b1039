//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. The list is explicit and
//! ordered; each step is applied and verified individually. The sequence
//! follows the schema generations of the application: base tables, then the
//! payment ledger, then products with recipes, then sale returns.

pub use sea_orm_migration::prelude::*;

mod m20260805_000001_initial;
mod m20260805_000002_payment_ledger;
mod m20260805_000003_products;
mod m20260805_000004_returns;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260805_000001_initial::Migration),
            Box::new(m20260805_000002_payment_ledger::Migration),
            Box::new(m20260805_000003_products::Migration),
            Box::new(m20260805_000004_returns::Migration),
        ]
    }
}
