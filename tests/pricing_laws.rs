//! Pricing engine proptest law verification
//!
//! Quantity split, discount bounds, total additivity and idempotence over
//! generated order lines.

use order_desk::pricing::money::sum;
use order_desk::pricing::{OrderLine, OrderPricing, normalize, round_money, total};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary implementations
// =============================================================================

/// Prices from 0.000 to 9999.999, three decimals to exercise rounding
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

/// Discounts from 0.0 to 100.0 in tenths
fn arb_discount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::ONE_HUNDRED),
        (0i64..=1000i64).prop_map(|n| Decimal::new(n, 1)),
    ]
}

fn arb_line() -> impl Strategy<Value = OrderLine> {
    (
        (100u32..1000u32),
        arb_price(),
        0i64..100_000i64,
        1i64..500i64,
        arb_discount(),
    )
        .prop_map(|(code, price, quantity, per_box, discount)| OrderLine {
            product_code: format!("P{code}"),
            product_name: format!("Product {code}"),
            unit_price: price,
            ordered_quantity: quantity,
            units_per_container: per_box,
            discount_percent: discount,
        })
}

fn arb_lines() -> impl Strategy<Value = Vec<OrderLine>> {
    prop::collection::vec(arb_line(), 1..40)
}

// =============================================================================
// Law verification
// =============================================================================

proptest! {
    /// Full containers and leftover units add back up to the ordered quantity
    #[test]
    fn test_quantity_split(line in arb_line()) {
        let normalized = normalize(std::slice::from_ref(&line)).unwrap();
        let first = &normalized[0];

        prop_assert_eq!(
            i64::from(first.container_count) * line.units_per_container + i64::from(first.leftover_units),
            line.ordered_quantity
        );
        prop_assert!(first.leftover_units < first.units_per_container);
    }

    /// The discount never goes negative nor exceeds the gross amount
    #[test]
    fn test_discount_bounded(line in arb_line()) {
        let first = normalize(&[line]).unwrap().remove(0);

        prop_assert!(first.discount_amount >= Decimal::ZERO);
        prop_assert!(first.discount_amount <= first.gross_amount);
        prop_assert!(first.net_amount <= first.gross_amount);
        prop_assert!(first.net_amount >= Decimal::ZERO);
    }

    /// The total is the rounded sum of the net amounts
    #[test]
    fn test_total_additivity(lines in arb_lines()) {
        let normalized = normalize(&lines).unwrap();
        let expected = round_money(sum(normalized.iter().map(|l| l.net_amount)));

        prop_assert_eq!(total(&normalized), expected);
        prop_assert_eq!(total(&normalized).scale(), 2);
    }

    /// Normalizing the same input twice gives the same output
    #[test]
    fn test_normalize_idempotent(lines in arb_lines()) {
        prop_assert_eq!(normalize(&lines).unwrap(), normalize(&lines).unwrap());
    }

    /// The pricing summary agrees with the engine
    #[test]
    fn test_summary_matches_engine(lines in arb_lines()) {
        let pricing = OrderPricing::from_lines(&lines).unwrap();
        let normalized = normalize(&lines).unwrap();

        prop_assert_eq!(pricing.total, total(&normalized));
        prop_assert_eq!(&pricing.lines, &normalized);
        prop_assert!(pricing.total <= pricing.gross_total);
    }

    /// Any zero or negative divisor is rejected with the offending index
    #[test]
    fn test_bad_divisor_rejected(
        mut lines in arb_lines(),
        index in any::<prop::sample::Index>(),
        divisor in -50i64..=0i64
    ) {
        let at = index.index(lines.len());
        lines[at].units_per_container = divisor;

        let err = normalize(&lines).unwrap_err();
        prop_assert_eq!(err.error_code(), "INVALID_LINE");
        prop_assert_eq!(err.line(), at);
    }
}
