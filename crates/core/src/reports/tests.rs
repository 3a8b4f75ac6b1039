//! Scenario tests for the report service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::service::ReportService;
use super::types::{ItemStockView, PurchaseView, SaleView};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn purchase(
    date: NaiveDate,
    supplier: &str,
    item: &str,
    total: Decimal,
    paid: Decimal,
) -> PurchaseView {
    PurchaseView {
        id: Uuid::now_v7(),
        date,
        supplier: supplier.to_string(),
        item: item.to_string(),
        total,
        paid_amount: paid,
        due_amount: total - paid,
    }
}

fn sale(date: NaiveDate, customer: &str, item: &str, total: Decimal, paid: Decimal) -> SaleView {
    SaleView {
        id: Uuid::now_v7(),
        date,
        customer: customer.to_string(),
        item: item.to_string(),
        total,
        paid_amount: paid,
        due_amount: total - paid,
        is_return: false,
        return_owed: Decimal::ZERO,
        return_paid_back: Decimal::ZERO,
    }
}

#[test]
fn test_summary_totals_and_profit() {
    let purchases = vec![
        purchase(day(2026, 1, 5), "Mills Co", "flour", dec!(50), dec!(50)),
        purchase(day(2026, 1, 20), "Mills Co", "sugar", dec!(30), dec!(10)),
    ];
    let sales = vec![
        sale(day(2026, 1, 25), "Corner Cafe", "bread", dec!(40), dec!(25)),
        sale(day(2026, 2, 1), "Bakers Inc", "bread", dec!(60), dec!(60)),
    ];

    let summary = ReportService::summary(&purchases, &sales);

    assert_eq!(summary.purchase_total, dec!(80));
    assert_eq!(summary.purchase_paid, dec!(60));
    assert_eq!(summary.purchase_due, dec!(20));
    assert_eq!(summary.sale_total, dec!(100));
    assert_eq!(summary.sale_collected, dec!(85));
    assert_eq!(summary.sale_due, dec!(15));
    // Cash basis: collected 85 minus paid out 60.
    assert_eq!(summary.profit, dec!(25));
    assert_eq!(summary.purchase_count, 2);
    assert_eq!(summary.sale_count, 2);
}

#[test]
fn test_summary_excludes_returned_sales() {
    let mut returned = sale(day(2026, 1, 10), "Corner Cafe", "bread", dec!(40), dec!(40));
    returned.is_return = true;
    returned.return_owed = dec!(40);

    let sales = vec![
        returned,
        sale(day(2026, 1, 12), "Bakers Inc", "bread", dec!(60), dec!(20)),
    ];

    let summary = ReportService::summary(&[], &sales);

    assert_eq!(summary.sale_total, dec!(60));
    assert_eq!(summary.sale_collected, dec!(20));
    assert_eq!(summary.sale_count, 1);
    assert_eq!(summary.top_customer.unwrap().name, "Bakers Inc");
}

#[test]
fn test_summary_top_entries() {
    let purchases = vec![
        purchase(day(2026, 1, 1), "Mills Co", "flour", dec!(100), dec!(0)),
        purchase(day(2026, 1, 2), "Grain Bros", "flour", dec!(70), dec!(0)),
        purchase(day(2026, 1, 3), "Grain Bros", "sugar", dec!(50), dec!(0)),
    ];
    let sales = vec![
        sale(day(2026, 1, 4), "Corner Cafe", "bread", dec!(30), dec!(0)),
        sale(day(2026, 1, 5), "Corner Cafe", "cake", dec!(45), dec!(0)),
        sale(day(2026, 1, 6), "Bakers Inc", "cake", dec!(20), dec!(0)),
    ];

    let summary = ReportService::summary(&purchases, &sales);

    // Grain Bros: 120 vs Mills Co: 100.
    assert_eq!(summary.top_supplier.unwrap().name, "Grain Bros");
    // Corner Cafe: 75 vs Bakers Inc: 20.
    assert_eq!(summary.top_customer.unwrap().name, "Corner Cafe");
    // cake: 65 vs bread: 30.
    let top_product = summary.top_product.unwrap();
    assert_eq!(top_product.name, "cake");
    assert_eq!(top_product.total, dec!(65));
}

#[test]
fn test_summary_top_ties_keep_first_encountered() {
    let purchases = vec![
        purchase(day(2026, 1, 1), "Mills Co", "flour", dec!(50), dec!(0)),
        purchase(day(2026, 1, 2), "Grain Bros", "flour", dec!(50), dec!(0)),
    ];

    let summary = ReportService::summary(&purchases, &[]);
    assert_eq!(summary.top_supplier.unwrap().name, "Mills Co");
}

#[test]
fn test_empty_summary() {
    let summary = ReportService::summary(&[], &[]);
    assert_eq!(summary.purchase_total, dec!(0));
    assert_eq!(summary.profit, dec!(0));
    assert!(summary.top_supplier.is_none());
    assert!(summary.top_customer.is_none());
    assert!(summary.top_product.is_none());
}

#[test]
fn test_monthly_buckets_and_zero_defaults() {
    let purchases = vec![
        purchase(day(2026, 1, 5), "Mills Co", "flour", dec!(50), dec!(40)),
        purchase(day(2026, 3, 5), "Mills Co", "flour", dec!(20), dec!(20)),
    ];
    let sales = vec![
        sale(day(2026, 1, 25), "Corner Cafe", "bread", dec!(80), dec!(60)),
        sale(day(2026, 2, 10), "Corner Cafe", "bread", dec!(30), dec!(30)),
    ];

    let rows = ReportService::monthly(&purchases, &sales);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].month, "2026-01");
    assert_eq!(rows[0].purchases, dec!(50));
    assert_eq!(rows[0].sales, dec!(80));
    assert_eq!(rows[0].profit, dec!(20)); // 60 collected - 40 paid

    // February has no purchases: the missing side defaults to zero.
    assert_eq!(rows[1].month, "2026-02");
    assert_eq!(rows[1].purchases, dec!(0));
    assert_eq!(rows[1].profit, dec!(30));

    // March has no sales.
    assert_eq!(rows[2].month, "2026-03");
    assert_eq!(rows[2].sales, dec!(0));
    assert_eq!(rows[2].profit, dec!(-20));
}

#[test]
fn test_monthly_excludes_returns() {
    let mut returned = sale(day(2026, 1, 10), "Corner Cafe", "bread", dec!(40), dec!(40));
    returned.is_return = true;

    let rows = ReportService::monthly(&[], &[returned]);
    assert!(rows.is_empty());
}

#[test]
fn test_inventory_low_stock_flags() {
    let items = vec![
        ItemStockView {
            id: Uuid::now_v7(),
            name: "flour".to_string(),
            unit: "kg".to_string(),
            acquired: dec!(10),
            consumed: dec!(9),
            low_stock_threshold: dec!(2),
        },
        ItemStockView {
            id: Uuid::now_v7(),
            name: "sugar".to_string(),
            unit: "kg".to_string(),
            acquired: dec!(10),
            consumed: dec!(2),
            low_stock_threshold: dec!(2),
        },
        ItemStockView {
            id: Uuid::now_v7(),
            name: "salt".to_string(),
            unit: "kg".to_string(),
            acquired: dec!(1),
            consumed: dec!(1),
            low_stock_threshold: dec!(0),
        },
    ];

    let rows = ReportService::inventory(&items);

    assert_eq!(rows[0].available, dec!(1));
    assert!(rows[0].low_stock);
    assert_eq!(rows[1].available, dec!(8));
    assert!(!rows[1].low_stock);
    // Zero threshold disables the alert even at zero availability.
    assert_eq!(rows[2].available, dec!(0));
    assert!(!rows[2].low_stock);
}

#[test]
fn test_dues_filtered_and_oldest_first() {
    let sales = vec![
        sale(day(2026, 2, 10), "Bakers Inc", "bread", dec!(60), dec!(30)),
        sale(day(2026, 1, 5), "Corner Cafe", "bread", dec!(40), dec!(10)),
        sale(day(2026, 1, 20), "Corner Cafe", "cake", dec!(25), dec!(25)),
    ];

    let rows = ReportService::sale_dues(&sales);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].counterparty, "Corner Cafe");
    assert_eq!(rows[0].due_amount, dec!(30));
    assert_eq!(rows[1].counterparty, "Bakers Inc");
}

#[test]
fn test_purchase_dues() {
    let purchases = vec![
        purchase(day(2026, 1, 5), "Mills Co", "flour", dec!(50), dec!(50)),
        purchase(day(2026, 1, 2), "Grain Bros", "sugar", dec!(30), dec!(5)),
    ];

    let rows = ReportService::purchase_dues(&purchases);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].counterparty, "Grain Bros");
    assert_eq!(rows[0].due_amount, dec!(25));
}

#[test]
fn test_return_dues() {
    let mut settled = sale(day(2026, 1, 5), "Corner Cafe", "bread", dec!(40), dec!(40));
    settled.is_return = true;
    settled.return_owed = dec!(40);
    settled.return_paid_back = dec!(40);

    let mut outstanding = sale(day(2026, 1, 2), "Bakers Inc", "cake", dec!(60), dec!(60));
    outstanding.is_return = true;
    outstanding.return_owed = dec!(60);
    outstanding.return_paid_back = dec!(10);

    let rows = ReportService::return_dues(&[settled, outstanding]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].customer, "Bakers Inc");
    assert_eq!(rows[0].outstanding, dec!(50));
}
