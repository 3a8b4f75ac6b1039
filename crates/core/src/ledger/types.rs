//! Ledger domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment status of a billable transaction, derived from its amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing has been paid.
    Unpaid,
    /// Some, but not all, of the total has been paid.
    Partial,
    /// The full total has been paid.
    Paid,
}

impl PaymentStatus {
    /// Derives the status from `(paid_amount, total)`.
    ///
    /// The derivation is a pure function of the two amounts, so recomputing
    /// it at any point in a transaction's history yields the same value.
    #[must_use]
    pub fn from_amounts(paid_amount: Decimal, total: Decimal) -> Self {
        if paid_amount <= Decimal::ZERO {
            Self::Unpaid
        } else if paid_amount >= total {
            Self::Paid
        } else {
            Self::Partial
        }
    }

    /// Returns the canonical string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Unknown payment status: {s}")),
        }
    }
}

/// The monetary state of a billable transaction.
///
/// `due_amount` is always derived, never stored independently, which keeps
/// `paid_amount + due_amount == total` true by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerAmounts {
    /// Contract total, fixed at creation.
    pub total: Decimal,
    /// Amount paid so far.
    pub paid_amount: Decimal,
}

impl LedgerAmounts {
    /// Creates the amounts pair.
    #[must_use]
    pub const fn new(total: Decimal, paid_amount: Decimal) -> Self {
        Self { total, paid_amount }
    }

    /// Outstanding balance, never negative.
    #[must_use]
    pub fn due_amount(&self) -> Decimal {
        (self.total - self.paid_amount).max(Decimal::ZERO)
    }

    /// Derived payment status.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::from_amounts(self.paid_amount, self.total)
    }

    /// Returns true if nothing is outstanding.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.due_amount() <= Decimal::ZERO
    }
}

/// A payment record to append to a transaction's ledger.
///
/// Drafts are produced by the ledger service only; the amount always equals
/// what was actually applied against the due balance, so the sum of a
/// transaction's payment records reconciles with its `paid_amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    /// Amount applied.
    pub amount: Decimal,
    /// Payment date.
    pub date: NaiveDate,
    /// Free-text note.
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(dec!(0), dec!(50), PaymentStatus::Unpaid)]
    #[case(dec!(25), dec!(50), PaymentStatus::Partial)]
    #[case(dec!(50), dec!(50), PaymentStatus::Paid)]
    #[case(dec!(60), dec!(50), PaymentStatus::Paid)]
    fn test_status_from_amounts(
        #[case] paid: Decimal,
        #[case] total: Decimal,
        #[case] expected: PaymentStatus,
    ) {
        assert_eq!(PaymentStatus::from_amounts(paid, total), expected);
    }

    #[test]
    fn test_zero_total_with_zero_paid_is_unpaid() {
        // A free line item: nothing paid, nothing due.
        assert_eq!(
            PaymentStatus::from_amounts(dec!(0), dec!(0)),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Partial,
            PaymentStatus::Paid,
        ] {
            assert_eq!(PaymentStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(PaymentStatus::from_str("settled").is_err());
    }

    #[test]
    fn test_amounts_due_and_settled() {
        let amounts = LedgerAmounts::new(dec!(40), dec!(25));
        assert_eq!(amounts.due_amount(), dec!(15));
        assert!(!amounts.is_settled());

        let settled = LedgerAmounts::new(dec!(40), dec!(40));
        assert_eq!(settled.due_amount(), dec!(0));
        assert!(settled.is_settled());
    }
}
