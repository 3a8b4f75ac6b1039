//! `SeaORM` entity definitions.

pub mod items;
pub mod payments;
pub mod product_ingredients;
pub mod products;
pub mod purchases;
pub mod sales;
pub mod users;
pub mod workspaces;
