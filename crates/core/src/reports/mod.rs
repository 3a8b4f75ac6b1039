//! Read-side aggregation over committed transactions.
//!
//! The report service never mutates anything: repositories load the
//! workspace's rows and hand them over as plain views.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::{
    DueRow, InventoryRow, ItemStockView, MonthlyRow, PurchaseView, ReturnDueRow, SaleView,
    SummaryReport, TopEntry,
};
