//! Refund error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during return/refund operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefundError {
    /// The sale was already returned; returning is one-way.
    #[error("Sale has already been returned")]
    AlreadyReturned,

    /// The sale has not been returned, so there is no refund ledger.
    #[error("Sale has not been returned")]
    NotReturned,

    /// Refund amounts cannot be negative.
    #[error("Refund amount cannot be negative, got {0}")]
    NegativeAmount(Decimal),

    /// A payback must be strictly positive.
    #[error("Payback amount must be positive, got {0}")]
    NonPositivePayback(Decimal),
}

impl RefundError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyReturned => "ALREADY_RETURNED",
            Self::NotReturned => "NOT_RETURNED",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::NonPositivePayback(_) => "NON_POSITIVE_PAYBACK",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::AlreadyReturned | Self::NotReturned => 409,
            Self::NegativeAmount(_) | Self::NonPositivePayback(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_statuses() {
        assert_eq!(RefundError::AlreadyReturned.error_code(), "ALREADY_RETURNED");
        assert_eq!(RefundError::AlreadyReturned.http_status_code(), 409);
        assert_eq!(RefundError::NotReturned.error_code(), "NOT_RETURNED");
        assert_eq!(
            RefundError::NegativeAmount(rust_decimal::Decimal::NEGATIVE_ONE).http_status_code(),
            400
        );
    }
}
