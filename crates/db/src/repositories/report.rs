//! Report repository: loads workspace rows and feeds the aggregation engine.
//!
//! All aggregation logic lives in `khata_core::reports`; this repository
//! only maps database rows to the report input views. It reads committed
//! data and never mutates.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::item::workspace_stock_views;
use crate::entities::{items, products, purchases, sales};
use khata_core::reports::{
    DueRow, InventoryRow, MonthlyRow, PurchaseView, ReportService, ReturnDueRow, SaleView,
    SummaryReport,
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates the workspace's business summary.
    pub async fn summary(&self, workspace_id: Uuid) -> Result<SummaryReport, ReportError> {
        let (purchases, sales) = self.load_views(workspace_id).await?;
        Ok(ReportService::summary(&purchases, &sales))
    }

    /// Generates the workspace's month-by-month breakdown.
    pub async fn monthly(&self, workspace_id: Uuid) -> Result<Vec<MonthlyRow>, ReportError> {
        let (purchases, sales) = self.load_views(workspace_id).await?;
        Ok(ReportService::monthly(&purchases, &sales))
    }

    /// Generates the workspace's inventory report.
    pub async fn inventory(&self, workspace_id: Uuid) -> Result<Vec<InventoryRow>, ReportError> {
        let views = workspace_stock_views(&self.db, workspace_id).await?;
        Ok(ReportService::inventory(&views))
    }

    /// Sales with outstanding balances, oldest first.
    pub async fn sale_dues(&self, workspace_id: Uuid) -> Result<Vec<DueRow>, ReportError> {
        let (_, sales) = self.load_views(workspace_id).await?;
        Ok(ReportService::sale_dues(&sales))
    }

    /// Purchases with outstanding balances, oldest first.
    pub async fn purchase_dues(&self, workspace_id: Uuid) -> Result<Vec<DueRow>, ReportError> {
        let (purchases, _) = self.load_views(workspace_id).await?;
        Ok(ReportService::purchase_dues(&purchases))
    }

    /// Returned sales with outstanding refunds, oldest first.
    pub async fn return_dues(&self, workspace_id: Uuid) -> Result<Vec<ReturnDueRow>, ReportError> {
        let (_, sales) = self.load_views(workspace_id).await?;
        Ok(ReportService::return_dues(&sales))
    }

    /// Loads the workspace's transactions as report views, resolving item
    /// and product names.
    async fn load_views(
        &self,
        workspace_id: Uuid,
    ) -> Result<(Vec<PurchaseView>, Vec<SaleView>), ReportError> {
        let item_names: HashMap<Uuid, String> = items::Entity::find()
            .filter(items::Column::WorkspaceId.eq(workspace_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect();

        let product_names: HashMap<Uuid, String> = products::Entity::find()
            .filter(products::Column::WorkspaceId.eq(workspace_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let resolve = |item_id: Option<Uuid>, product_id: Option<Uuid>| -> String {
            item_id
                .and_then(|id| item_names.get(&id).cloned())
                .or_else(|| product_id.and_then(|id| product_names.get(&id).cloned()))
                .unwrap_or_else(|| "(unknown)".to_string())
        };

        let purchase_views = purchases::Entity::find()
            .filter(purchases::Column::WorkspaceId.eq(workspace_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| PurchaseView {
                id: p.id,
                date: p.date,
                supplier: p.supplier,
                item: resolve(Some(p.item_id), None),
                total: p.total,
                paid_amount: p.paid_amount,
                due_amount: p.due_amount,
            })
            .collect();

        let sale_views = sales::Entity::find()
            .filter(sales::Column::WorkspaceId.eq(workspace_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| SaleView {
                id: s.id,
                date: s.date,
                customer: s.customer,
                item: resolve(s.item_id, s.product_id),
                total: s.total,
                paid_amount: s.paid_amount,
                due_amount: s.due_amount,
                is_return: s.is_return,
                return_owed: s.return_owed,
                return_paid_back: s.return_paid_back,
            })
            .collect();

        Ok((purchase_views, sale_views))
    }
}
