//! Database seeder for Khata development and testing.
//!
//! Seeds a demo workspace with an admin user, a few purchases and sales
//! with partial payments, and a product with a recipe, so every report has
//! something to show. All IDs are fixed, and the seeder skips itself when
//! the workspace already exists, so re-running is safe.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use khata_core::auth::hash_password;
use khata_db::entities::{
    items, payments, product_ingredients, products, purchases, sales, users, workspaces,
};

/// Demo workspace ID (consistent for all seeds).
const WORKSPACE_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo admin user ID.
const USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo admin password.
const PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = khata_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    if workspaces::Entity::find_by_id(workspace_id())
        .one(&db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("Demo workspace already exists, nothing to do.");
        return;
    }

    println!("Seeding demo workspace...");
    seed_workspace(&db).await;

    println!("Seeding admin user...");
    seed_admin(&db).await;

    println!("Seeding purchases...");
    seed_purchases(&db).await;

    println!("Seeding product...");
    seed_product(&db).await;

    println!("Seeding sales...");
    seed_sales(&db).await;

    println!("Seeding complete! Log in as demo@khata.dev / {PASSWORD}");
}

fn workspace_id() -> Uuid {
    Uuid::parse_str(WORKSPACE_ID).unwrap()
}

fn user_id() -> Uuid {
    Uuid::parse_str(USER_ID).unwrap()
}

fn fixed_id(tail: u32) -> Uuid {
    Uuid::parse_str(&format!("00000000-0000-0000-0000-0000000000{tail:02x}")).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_workspace(db: &DatabaseConnection) {
    let workspace = workspaces::ActiveModel {
        id: Set(workspace_id()),
        name: Set("Demo Bakery".to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    };

    workspace
        .insert(db)
        .await
        .expect("Failed to insert demo workspace");
    println!("  Created workspace: Demo Bakery");
}

async fn seed_admin(db: &DatabaseConnection) {
    let now = Utc::now().fixed_offset();
    let user = users::ActiveModel {
        id: Set(user_id()),
        workspace_id: Set(workspace_id()),
        name: Set("Demo Admin".to_string()),
        email: Set("demo@khata.dev".to_string()),
        password_hash: Set(hash_password(PASSWORD).expect("Failed to hash demo password")),
        role: Set("admin".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user.insert(db).await.expect("Failed to insert demo user");
    println!("  Created admin: demo@khata.dev");
}

/// Two purchases registering the flour and sugar items: one partially paid,
/// one settled at creation.
async fn seed_purchases(db: &DatabaseConnection) {
    let now = Utc::now().fixed_offset();

    for (id, name, unit) in [(0x11, "flour", "kg"), (0x12, "sugar", "kg")] {
        items::ActiveModel {
            id: Set(fixed_id(id)),
            workspace_id: Set(workspace_id()),
            name: Set(name.to_string()),
            unit: Set(unit.to_string()),
            low_stock_threshold: Set(Decimal::from(5)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to insert item");
    }

    // flour: 50 kg at 2.00, paid 60 of 100
    purchases::ActiveModel {
        id: Set(fixed_id(0x21)),
        workspace_id: Set(workspace_id()),
        date: Set(date(2026, 6, 3)),
        supplier: Set("Mill & Co".to_string()),
        item_id: Set(fixed_id(0x11)),
        qty: Set(Decimal::from(50)),
        unit: Set("kg".to_string()),
        unit_cost: Set(Decimal::from(2)),
        total: Set(Decimal::from(100)),
        paid_amount: Set(Decimal::from(60)),
        due_amount: Set(Decimal::from(40)),
        payment_status: Set("partial".to_string()),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert purchase");
    seed_payment(db, 0x51, "purchase", 0x21, 60, date(2026, 6, 3)).await;

    // sugar: 20 kg at 3.00, settled at creation
    purchases::ActiveModel {
        id: Set(fixed_id(0x22)),
        workspace_id: Set(workspace_id()),
        date: Set(date(2026, 6, 10)),
        supplier: Set("Sweet Supply".to_string()),
        item_id: Set(fixed_id(0x12)),
        qty: Set(Decimal::from(20)),
        unit: Set("kg".to_string()),
        unit_cost: Set(Decimal::from(3)),
        total: Set(Decimal::from(60)),
        paid_amount: Set(Decimal::from(60)),
        due_amount: Set(Decimal::ZERO),
        payment_status: Set("paid".to_string()),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert purchase");
    seed_payment(db, 0x52, "purchase", 0x22, 60, date(2026, 6, 10)).await;

    println!("  Created 2 purchases (flour, sugar)");
}

/// A cookie-box product: 10 boxes built, consuming 2 kg flour and 1 kg
/// sugar per box; 4 boxes later sold.
async fn seed_product(db: &DatabaseConnection) {
    let now = Utc::now().fixed_offset();

    products::ActiveModel {
        id: Set(fixed_id(0x31)),
        workspace_id: Set(workspace_id()),
        name: Set("Cookie box".to_string()),
        unit: Set("boxes".to_string()),
        unit_price: Set(Decimal::from(15)),
        stock_qty: Set(Decimal::from(6)),
        units_built: Set(Decimal::from(10)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert product");

    for (id, item, qty_per_unit) in [(0x32, 0x11, 2), (0x33, 0x12, 1)] {
        product_ingredients::ActiveModel {
            id: Set(fixed_id(id)),
            product_id: Set(fixed_id(0x31)),
            item_id: Set(fixed_id(item)),
            qty_per_unit: Set(Decimal::from(qty_per_unit)),
        }
        .insert(db)
        .await
        .expect("Failed to insert recipe line");
    }

    println!("  Created product: Cookie box (10 built, recipe of 2)");
}

/// One partially-paid sale of flour and one settled sale of the product.
async fn seed_sales(db: &DatabaseConnection) {
    let now = Utc::now().fixed_offset();

    // 10 kg flour at 3.50, paid 20 of 35
    sales::ActiveModel {
        id: Set(fixed_id(0x41)),
        workspace_id: Set(workspace_id()),
        date: Set(date(2026, 7, 5)),
        customer: Set("Corner Cafe".to_string()),
        item_id: Set(Some(fixed_id(0x11))),
        product_id: Set(None),
        qty: Set(Decimal::from(10)),
        unit: Set("kg".to_string()),
        unit_price: Set(Decimal::new(350, 2)),
        total: Set(Decimal::from(35)),
        paid_amount: Set(Decimal::from(20)),
        due_amount: Set(Decimal::from(15)),
        payment_status: Set("partial".to_string()),
        is_return: Set(false),
        return_date: Set(None),
        return_collected: Set(None),
        return_owed: Set(Decimal::ZERO),
        return_paid_back: Set(Decimal::ZERO),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert sale");
    seed_payment(db, 0x53, "sale", 0x41, 20, date(2026, 7, 5)).await;

    // 4 cookie boxes at 15.00, settled at creation
    sales::ActiveModel {
        id: Set(fixed_id(0x42)),
        workspace_id: Set(workspace_id()),
        date: Set(date(2026, 7, 12)),
        customer: Set("Daily Mart".to_string()),
        item_id: Set(None),
        product_id: Set(Some(fixed_id(0x31))),
        qty: Set(Decimal::from(4)),
        unit: Set("boxes".to_string()),
        unit_price: Set(Decimal::from(15)),
        total: Set(Decimal::from(60)),
        paid_amount: Set(Decimal::from(60)),
        due_amount: Set(Decimal::ZERO),
        payment_status: Set("paid".to_string()),
        is_return: Set(false),
        return_date: Set(None),
        return_collected: Set(None),
        return_owed: Set(Decimal::ZERO),
        return_paid_back: Set(Decimal::ZERO),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert sale");
    seed_payment(db, 0x54, "sale", 0x42, 60, date(2026, 7, 12)).await;

    println!("  Created 2 sales (flour, cookie boxes)");
}

async fn seed_payment(
    db: &DatabaseConnection,
    id: u32,
    kind: &str,
    transaction: u32,
    amount: i64,
    on: NaiveDate,
) {
    payments::ActiveModel {
        id: Set(fixed_id(id)),
        workspace_id: Set(workspace_id()),
        kind: Set(kind.to_string()),
        transaction_id: Set(fixed_id(transaction)),
        amount: Set(Decimal::from(amount)),
        date: Set(on),
        note: Set(Some("Initial payment".to_string())),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await
    .expect("Failed to insert payment");
}
