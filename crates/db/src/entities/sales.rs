//! `SeaORM` entity for the sales table.
//!
//! A sale consumes stock from exactly one of `item_id` (raw material sold
//! as-is) or `product_id` (stock-tracked finished good); a CHECK constraint
//! in the schema enforces the exclusivity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub date: Date,
    pub customer: String,
    pub item_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub qty: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
    pub payment_status: String,
    pub is_return: bool,
    pub return_date: Option<Date>,
    pub return_collected: Option<Decimal>,
    pub return_owed: Decimal,
    pub return_paid_back: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id"
    )]
    Items,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
