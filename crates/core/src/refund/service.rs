//! Return processing and payback recording.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::RefundError;

/// Refund-ledger state of a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnState {
    /// Whether the sale has been returned. One-way false -> true.
    pub is_return: bool,
    /// Money owed back to the customer.
    pub return_owed: Decimal,
    /// Money paid back so far.
    pub return_paid_back: Decimal,
}

impl ReturnState {
    /// Outstanding refund balance, never negative.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        (self.return_owed - self.return_paid_back).max(Decimal::ZERO)
    }
}

/// The refund ledger opened by processing a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnOutcome {
    /// Date of the return.
    pub return_date: NaiveDate,
    /// Goods value collected back from the customer at return time.
    pub return_collected: Decimal,
    /// Money owed back to the customer.
    pub return_owed: Decimal,
    /// Money paid back so far (always zero at return time).
    pub return_paid_back: Decimal,
}

/// Result of applying a payback against the refund ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaybackApplication {
    /// Amount actually applied (the request capped at the outstanding).
    pub applied: Decimal,
    /// Paid-back total after the application.
    pub new_paid_back: Decimal,
    /// Outstanding refund after the application.
    pub remaining: Decimal,
}

/// Stateless service for return/refund bookkeeping.
pub struct RefundService;

impl RefundService {
    /// Opens the refund ledger for a sale being returned.
    ///
    /// The owed amount falls back to the collected amount when the caller
    /// passes zero: "took the goods back, owe the customer what was
    /// collected". The forward payment fields of the sale are deliberately
    /// untouched; stock release is the caller's concern and happens in the
    /// same atomic unit that persists this state.
    ///
    /// # Errors
    ///
    /// Returns `RefundError::AlreadyReturned` if the sale was returned
    /// before, and `RefundError::NegativeAmount` for negative inputs.
    pub fn process_return(
        state: &ReturnState,
        date: NaiveDate,
        collected: Decimal,
        owed: Decimal,
    ) -> Result<ReturnOutcome, RefundError> {
        if state.is_return {
            return Err(RefundError::AlreadyReturned);
        }
        if collected < Decimal::ZERO {
            return Err(RefundError::NegativeAmount(collected));
        }
        if owed < Decimal::ZERO {
            return Err(RefundError::NegativeAmount(owed));
        }

        let return_owed = if owed > Decimal::ZERO { owed } else { collected };

        Ok(ReturnOutcome {
            return_date: date,
            return_collected: collected,
            return_owed,
            return_paid_back: Decimal::ZERO,
        })
    }

    /// Applies a payback against the refund ledger, capped at the
    /// outstanding amount — the same no-overpayment pattern as the forward
    /// payment recorder.
    ///
    /// # Errors
    ///
    /// Returns `RefundError::NotReturned` if the sale has no refund ledger,
    /// and `RefundError::NonPositivePayback` if `amount <= 0`.
    pub fn record_payback(
        state: &ReturnState,
        amount: Decimal,
    ) -> Result<PaybackApplication, RefundError> {
        if !state.is_return {
            return Err(RefundError::NotReturned);
        }
        if amount <= Decimal::ZERO {
            return Err(RefundError::NonPositivePayback(amount));
        }

        let remaining = state.outstanding();
        let applied = amount.min(remaining);
        let new_paid_back = state.return_paid_back + applied;

        Ok(PaybackApplication {
            applied,
            new_paid_back,
            remaining: remaining - applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 9).unwrap()
    }

    #[test]
    fn test_process_return_with_explicit_owed() {
        let outcome =
            RefundService::process_return(&ReturnState::default(), date(), dec!(40), dec!(30))
                .unwrap();

        assert_eq!(outcome.return_collected, dec!(40));
        assert_eq!(outcome.return_owed, dec!(30));
        assert_eq!(outcome.return_paid_back, dec!(0));
    }

    #[test]
    fn test_owed_falls_back_to_collected() {
        let outcome =
            RefundService::process_return(&ReturnState::default(), date(), dec!(40), dec!(0))
                .unwrap();
        assert_eq!(outcome.return_owed, dec!(40));
    }

    #[test]
    fn test_double_return_rejected() {
        let state = ReturnState {
            is_return: true,
            return_owed: dec!(40),
            return_paid_back: dec!(0),
        };
        assert_eq!(
            RefundService::process_return(&state, date(), dec!(40), dec!(0)),
            Err(RefundError::AlreadyReturned)
        );
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert_eq!(
            RefundService::process_return(&ReturnState::default(), date(), dec!(-1), dec!(0)),
            Err(RefundError::NegativeAmount(dec!(-1)))
        );
        assert_eq!(
            RefundService::process_return(&ReturnState::default(), date(), dec!(10), dec!(-5)),
            Err(RefundError::NegativeAmount(dec!(-5)))
        );
    }

    #[test]
    fn test_payback_capped_at_outstanding() {
        let state = ReturnState {
            is_return: true,
            return_owed: dec!(40),
            return_paid_back: dec!(0),
        };
        let app = RefundService::record_payback(&state, dec!(50)).unwrap();

        assert_eq!(app.applied, dec!(40));
        assert_eq!(app.new_paid_back, dec!(40));
        assert_eq!(app.remaining, dec!(0));
    }

    #[test]
    fn test_partial_paybacks_accumulate() {
        let mut state = ReturnState {
            is_return: true,
            return_owed: dec!(40),
            return_paid_back: dec!(0),
        };

        let first = RefundService::record_payback(&state, dec!(15)).unwrap();
        state.return_paid_back = first.new_paid_back;
        assert_eq!(state.outstanding(), dec!(25));

        let second = RefundService::record_payback(&state, dec!(25)).unwrap();
        assert_eq!(second.new_paid_back, dec!(40));
        assert_eq!(second.remaining, dec!(0));
    }

    #[test]
    fn test_payback_requires_return() {
        assert_eq!(
            RefundService::record_payback(&ReturnState::default(), dec!(10)),
            Err(RefundError::NotReturned)
        );
    }

    #[test]
    fn test_payback_rejects_non_positive() {
        let state = ReturnState {
            is_return: true,
            return_owed: dec!(40),
            return_paid_back: dec!(0),
        };
        assert_eq!(
            RefundService::record_payback(&state, dec!(0)),
            Err(RefundError::NonPositivePayback(dec!(0)))
        );
    }

    #[test]
    fn test_settled_refund_accepts_nothing_more() {
        let state = ReturnState {
            is_return: true,
            return_owed: dec!(40),
            return_paid_back: dec!(40),
        };
        let app = RefundService::record_payback(&state, dec!(10)).unwrap();
        // Nothing outstanding: the application is a no-op.
        assert_eq!(app.applied, dec!(0));
        assert_eq!(app.new_paid_back, dec!(40));
    }
}
