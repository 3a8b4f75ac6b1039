//! Availability derivation and reservation checks.

use rust_decimal::Decimal;

use super::error::StockError;

/// Acquisition/consumption totals for a stock-tracked item.
///
/// Availability is always derived from these two sums, never stored, so it
/// cannot drift from the underlying history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockLevel {
    /// Total quantity ever acquired (sum of purchases).
    pub acquired: Decimal,
    /// Total quantity ever consumed (sales + ingredient usage).
    pub consumed: Decimal,
}

impl StockLevel {
    /// Creates a stock level from acquisition and consumption sums.
    #[must_use]
    pub const fn new(acquired: Decimal, consumed: Decimal) -> Self {
        Self { acquired, consumed }
    }

    /// Currently available quantity.
    ///
    /// Non-negative by construction: every consuming operation is checked
    /// against availability before it is persisted.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.acquired - self.consumed
    }

    /// True when the level should be flagged as low stock.
    ///
    /// A threshold of zero disables the alert.
    #[must_use]
    pub fn is_low(&self, threshold: Decimal) -> bool {
        threshold > Decimal::ZERO && self.available() <= threshold
    }
}

/// Stateless service for stock checks.
pub struct StockService;

impl StockService {
    /// Checks that `requested` units of `item` can be consumed.
    ///
    /// This performs the check only; it has no side effect. The caller must
    /// apply the debit in the same atomic unit (database transaction with a
    /// row lock on the item) that persists the consuming record, so that
    /// two concurrent consumers cannot both pass the check.
    ///
    /// # Errors
    ///
    /// Returns `StockError::NonPositiveQuantity` if `requested <= 0`, and
    /// `StockError::InsufficientStock` (carrying requested and available,
    /// from which the shortfall is derived) if the item cannot cover it.
    pub fn reserve(item: &str, requested: Decimal, available: Decimal) -> Result<(), StockError> {
        if requested <= Decimal::ZERO {
            return Err(StockError::NonPositiveQuantity(requested));
        }
        if requested > available {
            return Err(StockError::InsufficientStock {
                item: item.to_string(),
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Returns stock to availability after a deletion or return.
    ///
    /// Releasing never fails: it only ever increases what is available.
    #[must_use]
    pub fn release(available: Decimal, qty: Decimal) -> Decimal {
        available + qty
    }

    /// Checks that a source-of-supply record (a purchase) can be removed
    /// without driving the item's availability negative.
    ///
    /// `available` is the item's availability including the record being
    /// removed; removing it subtracts `acquired_qty` from the acquisition
    /// sum. If consumed stock already depends on that acquisition, the
    /// removal is rejected, naming the dependents.
    ///
    /// # Errors
    ///
    /// Returns `StockError::ResourceInUse` if removal would leave
    /// `available < 0`.
    pub fn ensure_source_removable(
        resource: &str,
        acquired_qty: Decimal,
        available: Decimal,
        dependents: Vec<String>,
    ) -> Result<(), StockError> {
        if available - acquired_qty < Decimal::ZERO {
            return Err(StockError::ResourceInUse {
                resource: resource.to_string(),
                dependents,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_available_is_acquired_minus_consumed() {
        let level = StockLevel::new(dec!(10), dec!(4));
        assert_eq!(level.available(), dec!(6));
    }

    #[test]
    fn test_reserve_within_availability() {
        assert!(StockService::reserve("flour", dec!(3), dec!(3)).is_ok());
        assert!(StockService::reserve("flour", dec!(1), dec!(3)).is_ok());
    }

    #[test]
    fn test_reserve_beyond_availability_carries_shortfall() {
        let err = StockService::reserve("flour", dec!(5), dec!(3)).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                item: "flour".to_string(),
                requested: dec!(5),
                available: dec!(3),
            }
        );
        assert_eq!(err.shortfall(), dec!(2));
    }

    #[test]
    fn test_reserve_rejects_non_positive_quantity() {
        assert_eq!(
            StockService::reserve("flour", dec!(0), dec!(3)),
            Err(StockError::NonPositiveQuantity(dec!(0)))
        );
    }

    #[test]
    fn test_release_is_additive() {
        assert_eq!(StockService::release(dec!(2), dec!(4)), dec!(6));
        // Release on an empty level works the same way.
        assert_eq!(StockService::release(dec!(0), dec!(4)), dec!(4));
    }

    #[test]
    fn test_source_removable_when_unconsumed() {
        // acquired 10, available 10: removing the 10-unit purchase is fine.
        assert!(
            StockService::ensure_source_removable("purchase of flour", dec!(10), dec!(10), vec![])
                .is_ok()
        );
    }

    #[test]
    fn test_source_in_use_rejected() {
        // acquired 10, but only 4 left: 6 units are consumed elsewhere.
        let err = StockService::ensure_source_removable(
            "purchase of flour",
            dec!(10),
            dec!(4),
            vec!["product: bread".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, StockError::ResourceInUse { .. }));
    }

    #[test]
    fn test_low_stock_flag() {
        assert!(StockLevel::new(dec!(5), dec!(3)).is_low(dec!(2)));
        assert!(!StockLevel::new(dec!(5), dec!(1)).is_low(dec!(2)));
        // Zero threshold disables the alert even at zero availability.
        assert!(!StockLevel::new(dec!(5), dec!(5)).is_low(dec!(0)));
    }
}
