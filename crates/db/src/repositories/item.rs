//! Item repository: raw material catalog and availability derivation.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{items, product_ingredients, products, purchases, sales};
use khata_core::reports::ItemStockView;
use khata_core::stock::StockLevel;

/// Error types for item operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    /// Item not found.
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for updating an item's catalog settings.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
    /// New unit of measure.
    pub unit: Option<String>,
    /// New low-stock alert threshold (zero disables).
    pub low_stock_threshold: Option<Decimal>,
}

/// Item repository.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    /// Creates a new item repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the workspace's items with their derived stock levels.
    pub async fn list_with_stock(
        &self,
        workspace_id: Uuid,
    ) -> Result<Vec<ItemStockView>, ItemError> {
        Ok(workspace_stock_views(&self.db, workspace_id).await?)
    }

    /// Finds an item by ID within the workspace.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if no such item exists.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> Result<items::Model, ItemError> {
        items::Entity::find_by_id(id)
            .filter(items::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    /// Updates an item's unit and/or low-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if no such item exists.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        input: UpdateItemInput,
    ) -> Result<items::Model, ItemError> {
        let item = self.find(workspace_id, id).await?;

        let mut active: items::ActiveModel = item.into();
        if let Some(unit) = input.unit {
            active.unit = Set(unit);
        }
        if let Some(threshold) = input.low_stock_threshold {
            active.low_stock_threshold = Set(threshold);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        Ok(active.update(&self.db).await?)
    }
}

/// Finds an item by name, registering it if this is its first purchase.
///
/// Purchases are the source of supply: they may introduce a catalog entry.
/// Sales and recipes must reference an existing one.
pub(crate) async fn find_or_create_item<C: ConnectionTrait>(
    conn: &C,
    workspace_id: Uuid,
    name: &str,
    unit: Option<&str>,
) -> Result<items::Model, DbErr> {
    if let Some(item) = find_item_by_name(conn, workspace_id, name).await? {
        return Ok(item);
    }

    let now = Utc::now().fixed_offset();
    items::ActiveModel {
        id: Set(Uuid::now_v7()),
        workspace_id: Set(workspace_id),
        name: Set(name.to_string()),
        unit: Set(unit.unwrap_or("units").to_string()),
        low_stock_threshold: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Finds an item by name within the workspace.
pub(crate) async fn find_item_by_name<C: ConnectionTrait>(
    conn: &C,
    workspace_id: Uuid,
    name: &str,
) -> Result<Option<items::Model>, DbErr> {
    items::Entity::find()
        .filter(items::Column::WorkspaceId.eq(workspace_id))
        .filter(items::Column::Name.eq(name))
        .one(conn)
        .await
}

/// Derives the stock level of one item from its acquisition and consumption
/// history. Call inside the same transaction that holds the item's row lock
/// when the result gates a write.
pub(crate) async fn stock_level<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
) -> Result<StockLevel, DbErr> {
    let acquired: Decimal = purchases::Entity::find()
        .filter(purchases::Column::ItemId.eq(item_id))
        .all(conn)
        .await?
        .iter()
        .map(|p| p.qty)
        .sum();

    // Returned sales no longer consume; that is how their stock comes back.
    let sold: Decimal = sales::Entity::find()
        .filter(sales::Column::ItemId.eq(item_id))
        .filter(sales::Column::IsReturn.eq(false))
        .all(conn)
        .await?
        .iter()
        .map(|s| s.qty)
        .sum();

    let mut consumed = sold;
    let recipe_usage = product_ingredients::Entity::find()
        .filter(product_ingredients::Column::ItemId.eq(item_id))
        .find_also_related(products::Entity)
        .all(conn)
        .await?;
    for (line, product) in recipe_usage {
        if let Some(product) = product {
            consumed += line.qty_per_unit * product.units_built;
        }
    }

    Ok(StockLevel::new(acquired, consumed))
}

/// Names the records that depend on an item's acquired stock, for
/// `ResourceInUse` messages.
pub(crate) async fn item_dependents<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
) -> Result<Vec<String>, DbErr> {
    let mut dependents = Vec::new();

    let recipe_usage = product_ingredients::Entity::find()
        .filter(product_ingredients::Column::ItemId.eq(item_id))
        .find_also_related(products::Entity)
        .all(conn)
        .await?;
    for (_, product) in recipe_usage {
        if let Some(product) = product {
            dependents.push(format!("product: {}", product.name));
        }
    }

    let sale_count = sales::Entity::find()
        .filter(sales::Column::ItemId.eq(item_id))
        .filter(sales::Column::IsReturn.eq(false))
        .count(conn)
        .await?;
    if sale_count > 0 {
        dependents.push(format!("{sale_count} sale(s) of the item"));
    }

    Ok(dependents)
}

/// Builds the stock view for every item in the workspace with bulk queries.
pub(crate) async fn workspace_stock_views<C: ConnectionTrait>(
    conn: &C,
    workspace_id: Uuid,
) -> Result<Vec<ItemStockView>, DbErr> {
    use std::collections::HashMap;

    let items = items::Entity::find()
        .filter(items::Column::WorkspaceId.eq(workspace_id))
        .order_by_asc(items::Column::Name)
        .all(conn)
        .await?;

    let mut acquired: HashMap<Uuid, Decimal> = HashMap::new();
    for purchase in purchases::Entity::find()
        .filter(purchases::Column::WorkspaceId.eq(workspace_id))
        .all(conn)
        .await?
    {
        *acquired.entry(purchase.item_id).or_default() += purchase.qty;
    }

    let mut consumed: HashMap<Uuid, Decimal> = HashMap::new();
    for sale in sales::Entity::find()
        .filter(sales::Column::WorkspaceId.eq(workspace_id))
        .filter(sales::Column::IsReturn.eq(false))
        .all(conn)
        .await?
    {
        if let Some(item_id) = sale.item_id {
            *consumed.entry(item_id).or_default() += sale.qty;
        }
    }

    let product_list = products::Entity::find()
        .filter(products::Column::WorkspaceId.eq(workspace_id))
        .all(conn)
        .await?;
    let built: HashMap<Uuid, Decimal> = product_list
        .iter()
        .map(|p| (p.id, p.units_built))
        .collect();
    if !product_list.is_empty() {
        let product_ids: Vec<Uuid> = product_list.iter().map(|p| p.id).collect();
        for line in product_ingredients::Entity::find()
            .filter(product_ingredients::Column::ProductId.is_in(product_ids))
            .all(conn)
            .await?
        {
            let units = built.get(&line.product_id).copied().unwrap_or_default();
            *consumed.entry(line.item_id).or_default() += line.qty_per_unit * units;
        }
    }

    Ok(items
        .into_iter()
        .map(|item| ItemStockView {
            id: item.id,
            acquired: acquired.get(&item.id).copied().unwrap_or_default(),
            consumed: consumed.get(&item.id).copied().unwrap_or_default(),
            name: item.name,
            unit: item.unit,
            low_stock_threshold: item.low_stock_threshold,
        })
        .collect())
}
