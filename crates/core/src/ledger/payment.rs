//! Recording incremental payments against a billable entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::entry::LedgerService;
use super::error::LedgerError;
use super::types::{LedgerAmounts, PaymentDraft, PaymentStatus};

/// Result of applying a payment to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentApplication {
    /// Amount actually applied (the requested amount capped at the due).
    pub applied: Decimal,
    /// Paid amount after the application.
    pub new_paid: Decimal,
    /// Due amount after the application, never negative.
    pub new_due: Decimal,
    /// Status after the application.
    pub new_status: PaymentStatus,
    /// Payment record to append; its amount equals `applied`.
    pub draft: PaymentDraft,
}

impl LedgerService {
    /// Applies a payment to a transaction's amounts.
    ///
    /// The requested amount is capped at the outstanding due, so a payment
    /// can settle a transaction but never overpay it. The returned draft
    /// carries the applied (capped) amount, keeping the payment ledger in
    /// reconciliation with `paid_amount`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AlreadySettled` if nothing is due, and
    /// `LedgerError::NonPositivePayment` if `amount <= 0`.
    pub fn record_payment(
        amounts: LedgerAmounts,
        amount: Decimal,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<PaymentApplication, LedgerError> {
        let due = amounts.due_amount();
        if due <= Decimal::ZERO {
            return Err(LedgerError::AlreadySettled);
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositivePayment(amount));
        }

        let applied = amount.min(due);
        let new_paid = amounts.paid_amount + applied;
        let new_due = (amounts.total - new_paid).max(Decimal::ZERO);
        let new_status = PaymentStatus::from_amounts(new_paid, amounts.total);

        Ok(PaymentApplication {
            applied,
            new_paid,
            new_due,
            new_status,
            draft: PaymentDraft {
                amount: applied,
                date,
                note: note.unwrap_or_default(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()
    }

    #[test]
    fn test_partial_payment() {
        let app =
            LedgerService::record_payment(LedgerAmounts::new(dec!(50), dec!(0)), dec!(20), date(), None)
                .unwrap();

        assert_eq!(app.applied, dec!(20));
        assert_eq!(app.new_paid, dec!(20));
        assert_eq!(app.new_due, dec!(30));
        assert_eq!(app.new_status, PaymentStatus::Partial);
        assert_eq!(app.draft.amount, dec!(20));
    }

    #[test]
    fn test_overpayment_capped_at_due() {
        // due=15, request 100 -> applied=15, settled
        let app = LedgerService::record_payment(
            LedgerAmounts::new(dec!(40), dec!(25)),
            dec!(100),
            date(),
            None,
        )
        .unwrap();

        assert_eq!(app.applied, dec!(15));
        assert_eq!(app.new_paid, dec!(40));
        assert_eq!(app.new_due, dec!(0));
        assert_eq!(app.new_status, PaymentStatus::Paid);
        // The recorded amount is what reduced the due, not the request.
        assert_eq!(app.draft.amount, dec!(15));
    }

    #[test]
    fn test_exact_settlement() {
        let app = LedgerService::record_payment(
            LedgerAmounts::new(dec!(30), dec!(10)),
            dec!(20),
            date(),
            Some("bank transfer".to_string()),
        )
        .unwrap();

        assert_eq!(app.new_due, dec!(0));
        assert_eq!(app.new_status, PaymentStatus::Paid);
        assert_eq!(app.draft.note, "bank transfer");
    }

    #[test]
    fn test_settled_transaction_rejects_payment() {
        let result = LedgerService::record_payment(
            LedgerAmounts::new(dec!(40), dec!(40)),
            dec!(5),
            date(),
            None,
        );
        assert_eq!(result, Err(LedgerError::AlreadySettled));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let amounts = LedgerAmounts::new(dec!(40), dec!(0));
        assert_eq!(
            LedgerService::record_payment(amounts, dec!(0), date(), None),
            Err(LedgerError::NonPositivePayment(dec!(0)))
        );
        assert_eq!(
            LedgerService::record_payment(amounts, dec!(-3), date(), None),
            Err(LedgerError::NonPositivePayment(dec!(-3)))
        );
    }

    #[test]
    fn test_conservation_across_sequence() {
        let mut amounts = LedgerAmounts::new(dec!(100), dec!(0));
        let mut recorded = Decimal::ZERO;

        for request in [dec!(10), dec!(35.50), dec!(200)] {
            let app = LedgerService::record_payment(amounts, request, date(), None).unwrap();
            recorded += app.draft.amount;
            amounts = LedgerAmounts::new(amounts.total, app.new_paid);
            assert_eq!(app.new_paid + app.new_due, amounts.total);
        }

        assert_eq!(amounts.paid_amount, dec!(100));
        assert_eq!(recorded, dec!(100));
        assert!(amounts.is_settled());
    }
}
