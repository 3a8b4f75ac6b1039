//! Property-based tests for the billable ledger.
//!
//! - Money conservation: `paid + due == total` after every operation
//! - Bounds: `0 <= paid <= total`
//! - Status derivation is a pure function of `(paid, total)`
//! - Payment records always reconcile with the paid amount

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::{EntryInput, LedgerService};
use super::types::{LedgerAmounts, PaymentStatus};

/// Strategy for positive quantities (0.01 to 1,000.00).
fn positive_qty() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy for non-negative unit amounts (0.00 to 10,000.00).
fn unit_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy for non-negative payment requests (0.00 to 100,000.00).
fn payment_request() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Opening an entry conserves money and respects bounds.
    #[test]
    fn prop_open_entry_conserves_money(
        qty in positive_qty(),
        unit in unit_amount(),
        initial in proptest::option::of(payment_request()),
    ) {
        let opened = LedgerService::open_entry(&EntryInput {
            qty,
            unit_amount: unit,
            initial_payment: initial,
            date: date(),
            payment_note: None,
        }).unwrap();

        prop_assert_eq!(opened.total, qty * unit);
        prop_assert_eq!(opened.paid_amount + opened.due_amount, opened.total);
        prop_assert!(opened.paid_amount >= Decimal::ZERO);
        prop_assert!(opened.paid_amount <= opened.total);
        prop_assert!(opened.due_amount >= Decimal::ZERO);
    }

    /// The initial payment draft, when present, equals the paid amount.
    #[test]
    fn prop_initial_draft_matches_paid(
        qty in positive_qty(),
        unit in unit_amount(),
        initial in payment_request(),
    ) {
        let opened = LedgerService::open_entry(&EntryInput {
            qty,
            unit_amount: unit,
            initial_payment: Some(initial),
            date: date(),
            payment_note: None,
        }).unwrap();

        match opened.initial_payment {
            Some(draft) => prop_assert_eq!(draft.amount, opened.paid_amount),
            None => prop_assert_eq!(opened.paid_amount, Decimal::ZERO),
        }
    }

    /// A sequence of payments keeps every invariant and the payment records
    /// sum to exactly the paid amount.
    #[test]
    fn prop_payment_sequence_invariants(
        qty in positive_qty(),
        unit in unit_amount(),
        requests in proptest::collection::vec(payment_request(), 1..8),
    ) {
        let opened = LedgerService::open_entry(&EntryInput {
            qty,
            unit_amount: unit,
            initial_payment: None,
            date: date(),
            payment_note: None,
        }).unwrap();

        let mut amounts = LedgerAmounts::new(opened.total, opened.paid_amount);
        let mut ledger_sum = Decimal::ZERO;

        for request in requests {
            match LedgerService::record_payment(amounts, request, date(), None) {
                Ok(app) => {
                    prop_assert!(app.applied <= request);
                    prop_assert_eq!(app.new_paid + app.new_due, amounts.total);
                    prop_assert!(app.new_paid >= Decimal::ZERO);
                    prop_assert!(app.new_paid <= amounts.total);
                    // Status derivation is idempotent over the new amounts.
                    prop_assert_eq!(
                        app.new_status,
                        PaymentStatus::from_amounts(app.new_paid, amounts.total)
                    );
                    ledger_sum += app.draft.amount;
                    amounts = LedgerAmounts::new(amounts.total, app.new_paid);
                }
                Err(_) => {
                    // Only a settled transaction rejects a positive payment.
                    prop_assert!(amounts.is_settled());
                }
            }
        }

        prop_assert_eq!(ledger_sum, amounts.paid_amount);
    }

    /// Requesting more than the due settles the transaction exactly.
    #[test]
    fn prop_overpayment_settles_exactly(
        qty in positive_qty(),
        unit in unit_amount(),
        excess in payment_request(),
    ) {
        let total = qty * unit;
        prop_assume!(total > Decimal::ZERO);

        let amounts = LedgerAmounts::new(total, Decimal::ZERO);
        let app = LedgerService::record_payment(amounts, total + excess, date(), None).unwrap();

        prop_assert_eq!(app.applied, total);
        prop_assert_eq!(app.new_due, Decimal::ZERO);
        prop_assert_eq!(app.new_status, PaymentStatus::Paid);
        prop_assert_eq!(app.draft.amount, total);
    }
}
