//! Property-based tests for stock accounting.
//!
//! - Availability never goes negative across any accepted operation sequence
//! - A reservation larger than availability is always rejected
//! - Release is exact: releasing what was reserved restores the level

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::{StockLevel, StockService};

/// Strategy for positive quantities (0.01 to 1,000.00).
fn qty() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// A random walk of stock operations.
#[derive(Debug, Clone)]
enum Op {
    Acquire(Decimal),
    Consume(Decimal),
    Release(Decimal),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        qty().prop_map(Op::Acquire),
        qty().prop_map(Op::Consume),
        qty().prop_map(Op::Release),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever sequence of acquisitions, consumption attempts, and
    /// releases is applied, availability stays non-negative.
    #[test]
    fn prop_available_never_negative(ops in proptest::collection::vec(op(), 1..40)) {
        let mut level = StockLevel::default();
        let mut reserved_total = Decimal::ZERO;

        for operation in ops {
            match operation {
                Op::Acquire(q) => level.acquired += q,
                Op::Consume(q) => {
                    match StockService::reserve("item", q, level.available()) {
                        Ok(()) => {
                            level.consumed += q;
                            reserved_total += q;
                        }
                        Err(_) => {
                            // Rejected reservations must not touch the level.
                            prop_assert!(q > level.available());
                        }
                    }
                }
                Op::Release(q) => {
                    // Only stock that was actually consumed can come back.
                    let releasable = q.min(reserved_total);
                    if releasable > Decimal::ZERO {
                        level.consumed -= releasable;
                        reserved_total -= releasable;
                    }
                }
            }
            prop_assert!(level.available() >= Decimal::ZERO);
        }
    }

    /// Reserve succeeds exactly when the request fits the availability.
    #[test]
    fn prop_reserve_boundary(requested in qty(), available in qty()) {
        let result = StockService::reserve("item", requested, available);
        if requested <= available {
            prop_assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            prop_assert_eq!(err.shortfall(), requested - available);
        }
    }

    /// Releasing what was consumed restores the original availability.
    #[test]
    fn prop_release_round_trip(initial in qty(), consumed in qty()) {
        prop_assume!(consumed <= initial);
        let after_consume = initial - consumed;
        prop_assert_eq!(StockService::release(after_consume, consumed), initial);
    }
}
