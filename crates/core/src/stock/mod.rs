//! Stock availability accounting.
//!
//! Two availability models coexist:
//! - Raw items: `available = acquired - consumed`, derived from purchase
//!   and consumption history, never stored.
//! - Products: a directly tracked `stock_qty`, debited on sale and credited
//!   on sale deletion or return.
//!
//! Reservation checks have no side effect; the caller applies the debit in
//! the same atomic unit that persists the consuming record.

pub mod error;
pub mod service;

#[cfg(test)]
mod props;

pub use error::StockError;
pub use service::{StockLevel, StockService};
