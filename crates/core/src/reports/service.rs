//! Report generation service.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::{
    DueRow, InventoryRow, ItemStockView, MonthlyRow, PurchaseView, ReturnDueRow, SaleView,
    SummaryReport, TopEntry,
};
use crate::stock::StockLevel;

/// Service for generating reports. Pure read-side, no mutation.
pub struct ReportService;

impl ReportService {
    /// Generates the overall business summary.
    ///
    /// Returned sales are excluded from every sale aggregate. Profit is
    /// cash-basis: what was collected minus what was paid out. Top entries
    /// break ties by first-encountered in descending-total order, which is
    /// deterministic for a given input ordering.
    #[must_use]
    pub fn summary(purchases: &[PurchaseView], sales: &[SaleView]) -> SummaryReport {
        let purchase_total: Decimal = purchases.iter().map(|p| p.total).sum();
        let purchase_paid: Decimal = purchases.iter().map(|p| p.paid_amount).sum();
        let purchase_due: Decimal = purchases.iter().map(|p| p.due_amount).sum();

        let live_sales: Vec<&SaleView> = sales.iter().filter(|s| !s.is_return).collect();
        let sale_total: Decimal = live_sales.iter().map(|s| s.total).sum();
        let sale_collected: Decimal = live_sales.iter().map(|s| s.paid_amount).sum();
        let sale_due: Decimal = live_sales.iter().map(|s| s.due_amount).sum();

        let top_supplier = Self::top_by_total(purchases.iter().map(|p| (&p.supplier, p.total)));
        let top_customer = Self::top_by_total(live_sales.iter().map(|s| (&s.customer, s.total)));
        let top_product = Self::top_by_total(live_sales.iter().map(|s| (&s.item, s.total)));

        SummaryReport {
            purchase_total,
            purchase_paid,
            purchase_due,
            sale_total,
            sale_collected,
            sale_due,
            profit: sale_collected - purchase_paid,
            purchase_count: purchases.len(),
            sale_count: live_sales.len(),
            top_supplier,
            top_customer,
            top_product,
        }
    }

    /// Generates the month-by-month breakdown.
    ///
    /// Transactions are bucketed by the `YYYY-MM` of their transaction date
    /// (not their creation timestamp). A month present on only one side gets
    /// zero for the other. Rows come out in ascending month order.
    #[must_use]
    pub fn monthly(purchases: &[PurchaseView], sales: &[SaleView]) -> Vec<MonthlyRow> {
        let mut months: BTreeMap<String, MonthlyRow> = BTreeMap::new();

        fn entry<'a>(
            months: &'a mut BTreeMap<String, MonthlyRow>,
            month: String,
        ) -> &'a mut MonthlyRow {
            months.entry(month.clone()).or_insert_with(move || MonthlyRow {
                month,
                purchases: Decimal::ZERO,
                purchase_paid: Decimal::ZERO,
                sales: Decimal::ZERO,
                collected: Decimal::ZERO,
                profit: Decimal::ZERO,
            })
        }

        for purchase in purchases {
            let row = entry(&mut months, purchase.date.format("%Y-%m").to_string());
            row.purchases += purchase.total;
            row.purchase_paid += purchase.paid_amount;
        }

        for sale in sales.iter().filter(|s| !s.is_return) {
            let row = entry(&mut months, sale.date.format("%Y-%m").to_string());
            row.sales += sale.total;
            row.collected += sale.paid_amount;
        }

        months
            .into_values()
            .map(|mut row| {
                row.profit = row.collected - row.purchase_paid;
                row
            })
            .collect()
    }

    /// Generates the inventory report with low-stock flags.
    #[must_use]
    pub fn inventory(items: &[ItemStockView]) -> Vec<InventoryRow> {
        items
            .iter()
            .map(|item| {
                let level = StockLevel::new(item.acquired, item.consumed);
                InventoryRow {
                    id: item.id,
                    item: item.name.clone(),
                    unit: item.unit.clone(),
                    available: level.available(),
                    low_stock_threshold: item.low_stock_threshold,
                    low_stock: level.is_low(item.low_stock_threshold),
                }
            })
            .collect()
    }

    /// Sales with an outstanding balance, oldest first.
    #[must_use]
    pub fn sale_dues(sales: &[SaleView]) -> Vec<DueRow> {
        let mut rows: Vec<DueRow> = sales
            .iter()
            .filter(|s| s.due_amount > Decimal::ZERO)
            .map(|s| DueRow {
                id: s.id,
                date: s.date,
                counterparty: s.customer.clone(),
                total: s.total,
                due_amount: s.due_amount,
            })
            .collect();
        rows.sort_by_key(|r| r.date);
        rows
    }

    /// Purchases with an outstanding balance, oldest first.
    #[must_use]
    pub fn purchase_dues(purchases: &[PurchaseView]) -> Vec<DueRow> {
        let mut rows: Vec<DueRow> = purchases
            .iter()
            .filter(|p| p.due_amount > Decimal::ZERO)
            .map(|p| DueRow {
                id: p.id,
                date: p.date,
                counterparty: p.supplier.clone(),
                total: p.total,
                due_amount: p.due_amount,
            })
            .collect();
        rows.sort_by_key(|r| r.date);
        rows
    }

    /// Returned sales with an outstanding refund, oldest first.
    #[must_use]
    pub fn return_dues(sales: &[SaleView]) -> Vec<ReturnDueRow> {
        let mut rows: Vec<ReturnDueRow> = sales
            .iter()
            .filter(|s| s.is_return && s.return_owed > s.return_paid_back)
            .map(|s| ReturnDueRow {
                id: s.id,
                date: s.date,
                customer: s.customer.clone(),
                return_owed: s.return_owed,
                return_paid_back: s.return_paid_back,
                outstanding: s.return_owed - s.return_paid_back,
            })
            .collect();
        rows.sort_by_key(|r| r.date);
        rows
    }

    /// Accumulates totals per name and picks the strict maximum, keeping the
    /// first name encountered on ties.
    fn top_by_total<'a>(pairs: impl Iterator<Item = (&'a String, Decimal)>) -> Option<TopEntry> {
        let mut totals: Vec<(String, Decimal)> = Vec::new();

        for (name, total) in pairs {
            match totals.iter_mut().find(|(n, _)| n == name) {
                Some((_, sum)) => *sum += total,
                None => totals.push((name.clone(), total)),
            }
        }

        let mut best: Option<TopEntry> = None;
        for (name, total) in totals {
            let better = best.as_ref().is_none_or(|b| total > b.total);
            if better {
                best = Some(TopEntry { name, total });
            }
        }
        best
    }
}
