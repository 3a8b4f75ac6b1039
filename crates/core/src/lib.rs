//! Core business logic for Khata.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Billable transaction amounts and payment recording
//! - `stock` - Availability accounting for raw items and product stock
//! - `refund` - Sale returns and the refund-owed ledger
//! - `reports` - Read-side aggregation (summary, monthly, inventory, dues)
//! - `auth` - Password hashing

pub mod auth;
pub mod ledger;
pub mod refund;
pub mod reports;
pub mod stock;
