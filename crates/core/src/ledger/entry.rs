//! Opening a billable ledger entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{PaymentDraft, PaymentStatus};

/// Default note attached to a payment recorded at transaction creation.
const INITIAL_PAYMENT_NOTE: &str = "Initial payment";

/// Input for opening a billable entry (purchase or sale).
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// Quantity being bought or sold. Must be positive.
    pub qty: Decimal,
    /// Unit cost (purchase) or unit price (sale). Must not be negative.
    pub unit_amount: Decimal,
    /// Optional payment made at creation time.
    pub initial_payment: Option<Decimal>,
    /// Transaction date; also dates the initial payment.
    pub date: NaiveDate,
    /// Note for the initial payment record, if any.
    pub payment_note: Option<String>,
}

/// The resolved monetary state of a freshly opened entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedEntry {
    /// Contract total (`qty * unit_amount`).
    pub total: Decimal,
    /// Paid amount after applying the (capped) initial payment.
    pub paid_amount: Decimal,
    /// Outstanding balance.
    pub due_amount: Decimal,
    /// Derived payment status.
    pub status: PaymentStatus,
    /// Payment record to append, when an initial payment was applied.
    pub initial_payment: Option<PaymentDraft>,
}

/// Stateless service for billable ledger computations.
pub struct LedgerService;

impl LedgerService {
    /// Opens a billable entry: validates the inputs, computes the total,
    /// and applies an optional initial payment.
    ///
    /// An initial payment larger than the total is capped at the total
    /// rather than rejected: callers read "paid more than the bill" as
    /// "fully paid". The draft in the result carries the capped amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NonPositiveQuantity` if `qty <= 0`,
    /// `LedgerError::NegativeUnitAmount` if `unit_amount < 0`, and
    /// `LedgerError::NegativePayment` if the initial payment is negative.
    pub fn open_entry(input: &EntryInput) -> Result<OpenedEntry, LedgerError> {
        if input.qty <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveQuantity(input.qty));
        }
        if input.unit_amount < Decimal::ZERO {
            return Err(LedgerError::NegativeUnitAmount(input.unit_amount));
        }

        let initial = input.initial_payment.unwrap_or(Decimal::ZERO);
        if initial < Decimal::ZERO {
            return Err(LedgerError::NegativePayment(initial));
        }

        let total = input.qty * input.unit_amount;
        let effective = initial.min(total);
        let due = total - effective;

        let draft = (effective > Decimal::ZERO).then(|| PaymentDraft {
            amount: effective,
            date: input.date,
            note: input
                .payment_note
                .clone()
                .unwrap_or_else(|| INITIAL_PAYMENT_NOTE.to_string()),
        });

        Ok(OpenedEntry {
            total,
            paid_amount: effective,
            due_amount: due,
            status: PaymentStatus::from_amounts(effective, total),
            initial_payment: draft,
        })
    }

    /// Recomputes the contract total after a quantity or unit amount edit,
    /// re-capping the already-paid amount at the new total.
    ///
    /// Editing a transaction's quantity can shrink the total below what was
    /// already collected; the surplus is forgiven rather than turned into a
    /// negative due.
    ///
    /// # Errors
    ///
    /// Same validation as [`LedgerService::open_entry`].
    pub fn reprice_entry(
        qty: Decimal,
        unit_amount: Decimal,
        paid_amount: Decimal,
    ) -> Result<OpenedEntry, LedgerError> {
        if qty <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveQuantity(qty));
        }
        if unit_amount < Decimal::ZERO {
            return Err(LedgerError::NegativeUnitAmount(unit_amount));
        }

        let total = qty * unit_amount;
        let paid = paid_amount.min(total);

        Ok(OpenedEntry {
            total,
            paid_amount: paid,
            due_amount: total - paid,
            status: PaymentStatus::from_amounts(paid, total),
            initial_payment: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(qty: Decimal, unit_amount: Decimal, initial: Option<Decimal>) -> EntryInput {
        EntryInput {
            qty,
            unit_amount,
            initial_payment: initial,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            payment_note: None,
        }
    }

    #[test]
    fn test_open_unpaid_purchase() {
        // qty=10, unit_cost=5 -> total=50, nothing paid
        let opened = LedgerService::open_entry(&input(dec!(10), dec!(5), None)).unwrap();

        assert_eq!(opened.total, dec!(50));
        assert_eq!(opened.paid_amount, dec!(0));
        assert_eq!(opened.due_amount, dec!(50));
        assert_eq!(opened.status, PaymentStatus::Unpaid);
        assert!(opened.initial_payment.is_none());
    }

    #[test]
    fn test_open_with_overpaid_initial_payment() {
        // qty=2, unit_price=20, initial=25 -> total=40, effective=min(25,40)=25
        let opened = LedgerService::open_entry(&input(dec!(2), dec!(20), Some(dec!(25)))).unwrap();

        assert_eq!(opened.total, dec!(40));
        assert_eq!(opened.paid_amount, dec!(25));
        assert_eq!(opened.due_amount, dec!(15));
        assert_eq!(opened.status, PaymentStatus::Partial);

        let draft = opened.initial_payment.unwrap();
        assert_eq!(draft.amount, dec!(25));
        assert_eq!(draft.note, "Initial payment");
    }

    #[test]
    fn test_initial_payment_capped_at_total() {
        let opened = LedgerService::open_entry(&input(dec!(2), dec!(20), Some(dec!(100)))).unwrap();

        assert_eq!(opened.paid_amount, dec!(40));
        assert_eq!(opened.due_amount, dec!(0));
        assert_eq!(opened.status, PaymentStatus::Paid);
        assert_eq!(opened.initial_payment.unwrap().amount, dec!(40));
    }

    #[test]
    fn test_zero_initial_payment_yields_no_draft() {
        let opened = LedgerService::open_entry(&input(dec!(3), dec!(7), Some(dec!(0)))).unwrap();
        assert!(opened.initial_payment.is_none());
        assert_eq!(opened.status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_caller_supplied_payment_note() {
        let mut inp = input(dec!(1), dec!(10), Some(dec!(10)));
        inp.payment_note = Some("Cash on delivery".to_string());
        let opened = LedgerService::open_entry(&inp).unwrap();
        assert_eq!(opened.initial_payment.unwrap().note, "Cash on delivery");
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        assert_eq!(
            LedgerService::open_entry(&input(dec!(0), dec!(5), None)),
            Err(LedgerError::NonPositiveQuantity(dec!(0)))
        );
        assert_eq!(
            LedgerService::open_entry(&input(dec!(-1), dec!(5), None)),
            Err(LedgerError::NonPositiveQuantity(dec!(-1)))
        );
    }

    #[test]
    fn test_rejects_negative_unit_amount() {
        assert_eq!(
            LedgerService::open_entry(&input(dec!(1), dec!(-5), None)),
            Err(LedgerError::NegativeUnitAmount(dec!(-5)))
        );
    }

    #[test]
    fn test_rejects_negative_initial_payment() {
        assert_eq!(
            LedgerService::open_entry(&input(dec!(1), dec!(5), Some(dec!(-1)))),
            Err(LedgerError::NegativePayment(dec!(-1)))
        );
    }

    #[test]
    fn test_free_unit_amount_is_allowed() {
        // Zero-cost acquisitions (samples, gifts) are legal.
        let opened = LedgerService::open_entry(&input(dec!(5), dec!(0), None)).unwrap();
        assert_eq!(opened.total, dec!(0));
        assert_eq!(opened.status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_reprice_caps_paid_at_new_total() {
        // Paid 40 against a total of 40, then the entry shrinks to total 30.
        let repriced = LedgerService::reprice_entry(dec!(3), dec!(10), dec!(40)).unwrap();
        assert_eq!(repriced.total, dec!(30));
        assert_eq!(repriced.paid_amount, dec!(30));
        assert_eq!(repriced.due_amount, dec!(0));
        assert_eq!(repriced.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_reprice_reopens_due() {
        // Paid 20 against a total of 20, then the entry grows to total 50.
        let repriced = LedgerService::reprice_entry(dec!(5), dec!(10), dec!(20)).unwrap();
        assert_eq!(repriced.total, dec!(50));
        assert_eq!(repriced.paid_amount, dec!(20));
        assert_eq!(repriced.due_amount, dec!(30));
        assert_eq!(repriced.status, PaymentStatus::Partial);
    }
}
