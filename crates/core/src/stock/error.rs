//! Stock accounting error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during stock operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    /// Not enough stock to cover the requested quantity.
    #[error(
        "Insufficient stock for {item}: requested {requested}, available {available} (short by {})",
        .requested - .available
    )]
    InsufficientStock {
        /// Item or product name.
        item: String,
        /// Quantity requested.
        requested: Decimal,
        /// Quantity available at check time.
        available: Decimal,
    },

    /// The referenced catalog item does not exist.
    ///
    /// Items are registered by their first purchase; consuming an item that
    /// was never purchased is rejected instead of fabricating phantom stock.
    #[error("Unknown item: {0} (no purchase has registered it)")]
    UnknownItem(String),

    /// The record cannot be removed because other records depend on its
    /// acquired stock.
    #[error("{resource} is in use by: {}", .dependents.join(", "))]
    ResourceInUse {
        /// The record being removed.
        resource: String,
        /// Names of the dependent records.
        dependents: Vec<String>,
    },

    /// Quantity must be strictly positive.
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),
}

impl StockError {
    /// Shortfall between requested and available, for insufficient-stock
    /// errors; zero for other kinds.
    #[must_use]
    pub fn shortfall(&self) -> Decimal {
        match self {
            Self::InsufficientStock {
                requested,
                available,
                ..
            } => *requested - *available,
            _ => Decimal::ZERO,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::UnknownItem(_) => "UNKNOWN_ITEM",
            Self::ResourceInUse { .. } => "RESOURCE_IN_USE",
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InsufficientStock { .. } | Self::ResourceInUse { .. } => 409,
            Self::UnknownItem(_) => 404,
            Self::NonPositiveQuantity(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_stock_message_names_shortfall() {
        let err = StockError::InsufficientStock {
            item: "flour".to_string(),
            requested: dec!(5),
            available: dec!(3),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for flour: requested 5, available 3 (short by 2)"
        );
        assert_eq!(err.shortfall(), dec!(2));
    }

    #[test]
    fn test_resource_in_use_names_dependents() {
        let err = StockError::ResourceInUse {
            resource: "purchase of flour".to_string(),
            dependents: vec!["product: bread".to_string(), "3 sales".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "purchase of flour is in use by: product: bread, 3 sales"
        );
    }

    #[test]
    fn test_error_codes_and_statuses() {
        assert_eq!(
            StockError::UnknownItem("x".into()).error_code(),
            "UNKNOWN_ITEM"
        );
        assert_eq!(StockError::UnknownItem("x".into()).http_status_code(), 404);
        assert_eq!(
            StockError::NonPositiveQuantity(dec!(0)).http_status_code(),
            400
        );
        assert_eq!(
            StockError::InsufficientStock {
                item: String::new(),
                requested: dec!(1),
                available: dec!(0),
            }
            .http_status_code(),
            409
        );
    }
}
