//! Product repository: stock-tracked finished goods with recipes.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::item::{find_item_by_name, stock_level};
use crate::entities::{items, product_ingredients, products};
use khata_core::stock::{StockError, StockService};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Stock accounting rejected the operation.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// The product name is already taken in the workspace.
    #[error("Product name already exists: {0}")]
    NameTaken(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One recipe line of a product definition.
#[derive(Debug, Clone)]
pub struct IngredientInput {
    /// Ingredient item name (must be pre-registered via a purchase).
    pub item: String,
    /// Quantity consumed per unit of product built.
    pub qty_per_unit: Decimal,
}

/// Input for defining a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Workspace scope.
    pub workspace_id: Uuid,
    /// Product name (unique per workspace).
    pub name: String,
    /// Unit of measure (defaults to "units").
    pub unit: Option<String>,
    /// Selling price per unit.
    pub unit_price: Decimal,
    /// Units to build immediately; consumes ingredients. May be zero.
    pub units: Decimal,
    /// Recipe lines; may be empty for bought-in goods.
    pub ingredients: Vec<IngredientInput>,
}

/// A recipe line with its resolved item name.
#[derive(Debug, Clone)]
pub struct RecipeLine {
    /// Ingredient item ID.
    pub item_id: Uuid,
    /// Ingredient item name.
    pub item_name: String,
    /// Quantity consumed per unit built.
    pub qty_per_unit: Decimal,
}

/// A product with its recipe.
#[derive(Debug, Clone)]
pub struct ProductWithRecipe {
    /// The product row.
    pub product: products::Model,
    /// Its recipe lines.
    pub ingredients: Vec<RecipeLine>,
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Defines a product, consuming ingredients for the initial build in
    /// the same transaction as the availability checks.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NameTaken` for a duplicate name,
    /// `ProductError::Stock` with `UnknownItem` for an unregistered
    /// ingredient or `InsufficientStock` when an ingredient cannot cover
    /// the build.
    pub async fn define(
        &self,
        input: CreateProductInput,
    ) -> Result<ProductWithRecipe, ProductError> {
        if input.units < Decimal::ZERO {
            return Err(StockError::NonPositiveQuantity(input.units).into());
        }
        for line in &input.ingredients {
            if line.qty_per_unit <= Decimal::ZERO {
                return Err(StockError::NonPositiveQuantity(line.qty_per_unit).into());
            }
        }

        let existing = products::Entity::find()
            .filter(products::Column::WorkspaceId.eq(input.workspace_id))
            .filter(products::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ProductError::NameTaken(input.name));
        }

        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        // Lock ingredient items in name order so overlapping recipes cannot
        // deadlock, and check the build against each availability.
        let mut recipe = input.ingredients;
        recipe.sort_by(|a, b| a.item.cmp(&b.item));

        let mut resolved: Vec<(items::Model, Decimal)> = Vec::with_capacity(recipe.len());
        for line in &recipe {
            let item = find_item_by_name(&txn, input.workspace_id, &line.item)
                .await?
                .ok_or_else(|| StockError::UnknownItem(line.item.clone()))?;
            let item = items::Entity::find_by_id(item.id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| StockError::UnknownItem(line.item.clone()))?;

            if input.units > Decimal::ZERO {
                let level = stock_level(&txn, item.id).await?;
                StockService::reserve(
                    &item.name,
                    line.qty_per_unit * input.units,
                    level.available(),
                )?;
            }

            resolved.push((item, line.qty_per_unit));
        }

        let product = products::ActiveModel {
            id: Set(Uuid::now_v7()),
            workspace_id: Set(input.workspace_id),
            name: Set(input.name),
            unit: Set(input.unit.unwrap_or_else(|| "units".to_string())),
            unit_price: Set(input.unit_price),
            stock_qty: Set(input.units),
            units_built: Set(input.units),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut ingredients = Vec::with_capacity(resolved.len());
        for (item, qty_per_unit) in resolved {
            product_ingredients::ActiveModel {
                id: Set(Uuid::now_v7()),
                product_id: Set(product.id),
                item_id: Set(item.id),
                qty_per_unit: Set(qty_per_unit),
            }
            .insert(&txn)
            .await?;
            ingredients.push(RecipeLine {
                item_id: item.id,
                item_name: item.name,
                qty_per_unit,
            });
        }

        txn.commit().await?;

        Ok(ProductWithRecipe {
            product,
            ingredients,
        })
    }

    /// Builds more units of an existing product, consuming its recipe.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Stock` with `InsufficientStock` when an
    /// ingredient cannot cover the build.
    pub async fn restock(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        units: Decimal,
    ) -> Result<products::Model, ProductError> {
        if units <= Decimal::ZERO {
            return Err(StockError::NonPositiveQuantity(units).into());
        }

        let txn = self.db.begin().await?;

        let product = products::Entity::find_by_id(id)
            .filter(products::Column::WorkspaceId.eq(workspace_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let recipe = Self::recipe_lines(&txn, product.id).await?;
        for line in &recipe {
            let item = items::Entity::find_by_id(line.item_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| StockError::UnknownItem(line.item_name.clone()))?;

            let level = stock_level(&txn, item.id).await?;
            StockService::reserve(&item.name, line.qty_per_unit * units, level.available())?;
        }

        let new_stock = product.stock_qty + units;
        let new_built = product.units_built + units;
        let mut active: products::ActiveModel = product.into();
        active.stock_qty = Set(new_stock);
        active.units_built = Set(new_built);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }

    /// Lists the workspace's products with their recipes.
    pub async fn list(&self, workspace_id: Uuid) -> Result<Vec<ProductWithRecipe>, ProductError> {
        let product_list = products::Entity::find()
            .filter(products::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(product_list.len());
        for product in product_list {
            let ingredients = Self::recipe_lines(&self.db, product.id).await?;
            result.push(ProductWithRecipe {
                product,
                ingredients,
            });
        }
        Ok(result)
    }

    /// Finds a product by ID within the workspace.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no such product exists.
    pub async fn find(
        &self,
        workspace_id: Uuid,
        id: Uuid,
    ) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .filter(products::Column::WorkspaceId.eq(workspace_id))
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Loads a product's recipe lines with item names, in item-name order.
    async fn recipe_lines<C: sea_orm::ConnectionTrait>(
        conn: &C,
        product_id: Uuid,
    ) -> Result<Vec<RecipeLine>, DbErr> {
        let lines = product_ingredients::Entity::find()
            .filter(product_ingredients::Column::ProductId.eq(product_id))
            .find_also_related(items::Entity)
            .all(conn)
            .await?;

        let mut recipe: Vec<RecipeLine> = lines
            .into_iter()
            .filter_map(|(line, item)| {
                item.map(|item| RecipeLine {
                    item_id: line.item_id,
                    item_name: item.name,
                    qty_per_unit: line.qty_per_unit,
                })
            })
            .collect();
        recipe.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(recipe)
    }
}
