//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Quantity must be strictly positive.
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// Unit cost/price cannot be negative.
    #[error("Unit amount cannot be negative, got {0}")]
    NegativeUnitAmount(Decimal),

    /// An initial payment cannot be negative.
    #[error("Payment amount cannot be negative, got {0}")]
    NegativePayment(Decimal),

    /// A recorded payment must be strictly positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositivePayment(Decimal),

    /// The transaction has no outstanding due balance.
    #[error("Transaction is already fully settled")]
    AlreadySettled,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::NegativeUnitAmount(_) => "NEGATIVE_UNIT_AMOUNT",
            Self::NegativePayment(_) => "NEGATIVE_PAYMENT",
            Self::NonPositivePayment(_) => "NON_POSITIVE_PAYMENT",
            Self::AlreadySettled => "ALREADY_SETTLED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveQuantity(_)
            | Self::NegativeUnitAmount(_)
            | Self::NegativePayment(_)
            | Self::NonPositivePayment(_) => 400,
            Self::AlreadySettled => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::NonPositiveQuantity(dec!(0)).error_code(),
            "NON_POSITIVE_QUANTITY"
        );
        assert_eq!(LedgerError::AlreadySettled.error_code(), "ALREADY_SETTLED");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::NegativeUnitAmount(dec!(-1)).http_status_code(), 400);
        assert_eq!(LedgerError::AlreadySettled.http_status_code(), 409);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LedgerError::NonPositiveQuantity(dec!(-2)).to_string(),
            "Quantity must be positive, got -2"
        );
        assert_eq!(
            LedgerError::AlreadySettled.to_string(),
            "Transaction is already fully settled"
        );
    }
}
