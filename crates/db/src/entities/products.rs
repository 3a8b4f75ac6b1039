//! `SeaORM` entity for the products table (finished goods with tracked stock).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
    /// Currently sellable units.
    pub stock_qty: Decimal,
    /// Cumulative units ever built; the basis for ingredient consumption.
    pub units_built: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_ingredients::Entity")]
    ProductIngredients,
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::product_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductIngredients.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
