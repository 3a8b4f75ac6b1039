//! Sale returns and the refund-owed ledger.
//!
//! A returned sale keeps its forward payment history (`paid_amount`,
//! `due_amount`) untouched and gains a separate refund ledger tracking what
//! is owed back to the customer and what has been paid back so far.

pub mod error;
pub mod service;

pub use error::RefundError;
pub use service::{PaybackApplication, RefundService, ReturnOutcome, ReturnState};
