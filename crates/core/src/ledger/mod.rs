//! Billable transaction ledger logic.
//!
//! A purchase and a sale share the same monetary shape: a contract `total`
//! computed once at creation, a running `paid_amount`, a derived
//! `due_amount`, and a derived payment status. This module implements:
//! - Opening a billable entry (total, capped initial payment)
//! - Recording incremental payments against the outstanding due
//! - Status derivation from `(paid_amount, total)`

pub mod entry;
pub mod error;
pub mod payment;
pub mod types;

#[cfg(test)]
mod props;

pub use entry::{EntryInput, LedgerService, OpenedEntry};
pub use error::LedgerError;
pub use payment::PaymentApplication;
pub use types::{LedgerAmounts, PaymentDraft, PaymentStatus};
