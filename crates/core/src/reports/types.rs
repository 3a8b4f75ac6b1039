//! Report input views and output rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Purchase fields the aggregation engine reads.
#[derive(Debug, Clone)]
pub struct PurchaseView {
    /// Purchase ID.
    pub id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Supplier name.
    pub supplier: String,
    /// Item name.
    pub item: String,
    /// Contract total.
    pub total: Decimal,
    /// Amount paid so far.
    pub paid_amount: Decimal,
    /// Outstanding balance.
    pub due_amount: Decimal,
}

/// Sale fields the aggregation engine reads.
#[derive(Debug, Clone)]
pub struct SaleView {
    /// Sale ID.
    pub id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer: String,
    /// Item or product name sold.
    pub item: String,
    /// Contract total.
    pub total: Decimal,
    /// Amount collected so far.
    pub paid_amount: Decimal,
    /// Outstanding balance.
    pub due_amount: Decimal,
    /// Whether the sale has been returned.
    pub is_return: bool,
    /// Refund owed to the customer (meaningful when returned).
    pub return_owed: Decimal,
    /// Refund paid back so far.
    pub return_paid_back: Decimal,
}

/// Stock fields the aggregation engine reads per item.
#[derive(Debug, Clone)]
pub struct ItemStockView {
    /// Item ID.
    pub id: Uuid,
    /// Item name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Total quantity acquired.
    pub acquired: Decimal,
    /// Total quantity consumed.
    pub consumed: Decimal,
    /// Low-stock alert threshold (zero disables).
    pub low_stock_threshold: Decimal,
}

/// A top counterparty or product, by summed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopEntry {
    /// Counterparty or product name.
    pub name: String,
    /// Summed transaction total.
    pub total: Decimal,
}

/// Overall business summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    /// Total purchase value.
    pub purchase_total: Decimal,
    /// Total paid on purchases.
    pub purchase_paid: Decimal,
    /// Total outstanding on purchases.
    pub purchase_due: Decimal,
    /// Total sale value, excluding returned sales.
    pub sale_total: Decimal,
    /// Total collected on sales, excluding returned sales.
    pub sale_collected: Decimal,
    /// Total outstanding on sales, excluding returned sales.
    pub sale_due: Decimal,
    /// Cash-basis profit: collected minus purchase paid.
    pub profit: Decimal,
    /// Number of purchases.
    pub purchase_count: usize,
    /// Number of non-returned sales.
    pub sale_count: usize,
    /// Supplier with the highest purchase value.
    pub top_supplier: Option<TopEntry>,
    /// Customer with the highest sale value.
    pub top_customer: Option<TopEntry>,
    /// Product/item with the highest sale value.
    pub top_product: Option<TopEntry>,
}

/// One calendar month of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRow {
    /// Month bucket, `YYYY-MM`.
    pub month: String,
    /// Purchase value in the month.
    pub purchases: Decimal,
    /// Purchase amount paid in the month (by transaction date).
    pub purchase_paid: Decimal,
    /// Sale value in the month, excluding returns.
    pub sales: Decimal,
    /// Amount collected in the month, excluding returns.
    pub collected: Decimal,
    /// Cash-basis profit for the month.
    pub profit: Decimal,
}

/// One inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    /// Item ID.
    pub id: Uuid,
    /// Item name.
    pub item: String,
    /// Unit of measure.
    pub unit: String,
    /// Available quantity (acquired minus consumed).
    pub available: Decimal,
    /// Configured low-stock threshold.
    pub low_stock_threshold: Decimal,
    /// Whether the line is flagged low stock.
    pub low_stock: bool,
}

/// One outstanding balance, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueRow {
    /// Transaction ID.
    pub id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Counterparty (supplier or customer).
    pub counterparty: String,
    /// Contract total.
    pub total: Decimal,
    /// Outstanding balance.
    pub due_amount: Decimal,
}

/// One outstanding refund, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnDueRow {
    /// Sale ID.
    pub id: Uuid,
    /// Sale date.
    pub date: NaiveDate,
    /// Customer owed the refund.
    pub customer: String,
    /// Refund owed.
    pub return_owed: Decimal,
    /// Refund paid back so far.
    pub return_paid_back: Decimal,
    /// Outstanding refund balance.
    pub outstanding: Decimal,
}
