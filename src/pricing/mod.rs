//! Order pricing engine
//!
//! Pure, deterministic computation over order lines:
//!
//! - [`normalize`] validates each line, splits its quantity into full
//!   containers and leftover units, and computes gross, discount and net
//!   amounts at full precision.
//! - [`total`] sums net amounts and rounds once to the currency minor unit.
//! - [`OrderPricing`] bundles both for callers that also need gross and
//!   discount totals (order summary, persisted order, document footer).
//!
//! Nothing here performs I/O or keeps state between calls.

pub mod line;
pub mod money;

pub use line::{NormalizedOrderLine, OrderLine};
pub use money::round_money;

use crate::core::error::PricingError;
use rust_decimal::Decimal;
use serde::Serialize;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest gross amount of a single line
///
/// Keeps order totals far below `Decimal::MAX`, so summing lines never
/// overflows.
pub const MAX_LINE_AMOUNT: i64 = 1_000_000_000_000_000;

/// Validate and price every line, keeping input order
///
/// An empty slice is not an error and yields an empty vector.
///
/// # Errors
///
/// The first offending line fails the whole call:
/// - [`PricingError::NegativeValue`] for a negative price or quantity, or a
///   discount outside `[0, 100]`
/// - [`PricingError::InvalidLine`] for a zero or negative units-per-container
///   divisor, a blank product code or name, a product code with characters
///   the order document cannot print, or amounts that overflow
pub fn normalize(lines: &[OrderLine]) -> Result<Vec<NormalizedOrderLine>, PricingError> {
    let normalized = lines
        .iter()
        .enumerate()
        .map(|(index, line)| normalize_line(index, line))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(lines = normalized.len(), "normalized order lines");
    Ok(normalized)
}

/// Validate and price a single line; `index` is reported in errors
pub fn normalize_line(index: usize, line: &OrderLine) -> Result<NormalizedOrderLine, PricingError> {
    let invalid = |field: &'static str, message: &str| PricingError::InvalidLine {
        line: index,
        field,
        message: message.to_string(),
    };
    let out_of_range = |field: &'static str, value: String| PricingError::NegativeValue {
        line: index,
        field,
        value,
    };

    if line.product_code.trim().is_empty() {
        return Err(invalid("product_code", "must not be empty"));
    }
    if !line.product_code.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
        return Err(invalid("product_code", "must contain printable ASCII characters only"));
    }
    if line.product_name.trim().is_empty() {
        return Err(invalid("product_name", "must not be empty"));
    }
    if line.unit_price.is_sign_negative() && !line.unit_price.is_zero() {
        return Err(out_of_range("unit_price", line.unit_price.to_string()));
    }
    if line.ordered_quantity < 0 {
        return Err(out_of_range(
            "ordered_quantity",
            line.ordered_quantity.to_string(),
        ));
    }
    if line.discount_percent < Decimal::ZERO || line.discount_percent > HUNDRED {
        return Err(out_of_range(
            "discount_percent",
            line.discount_percent.to_string(),
        ));
    }
    if line.units_per_container <= 0 {
        return Err(invalid("units_per_container", "must be greater than zero"));
    }

    let ordered_quantity = u32::try_from(line.ordered_quantity)
        .map_err(|_| invalid("ordered_quantity", "is too large"))?;
    let units_per_container = u32::try_from(line.units_per_container)
        .map_err(|_| invalid("units_per_container", "is too large"))?;

    let gross_amount = line
        .unit_price
        .checked_mul(Decimal::from(ordered_quantity))
        .ok_or_else(|| invalid("unit_price", "overflows the line amount"))?;
    if gross_amount > Decimal::from(MAX_LINE_AMOUNT) {
        return Err(invalid("unit_price", "line amount exceeds the maximum"));
    }
    let discount_amount = if line.discount_percent.is_zero() {
        Decimal::ZERO
    } else {
        gross_amount
            .checked_mul(line.discount_percent)
            .map(|amount| amount / HUNDRED)
            .ok_or_else(|| invalid("discount_percent", "overflows the line amount"))?
    };

    Ok(NormalizedOrderLine {
        product_code: line.product_code.clone(),
        product_name: line.product_name.clone(),
        unit_price: line.unit_price,
        ordered_quantity,
        units_per_container,
        discount_percent: line.discount_percent,
        container_count: ordered_quantity / units_per_container,
        leftover_units: ordered_quantity % units_per_container,
        gross_amount,
        discount_amount,
        net_amount: gross_amount - discount_amount,
    })
}

/// Order total: sum of net amounts, rounded once to 2 decimals
pub fn total(normalized: &[NormalizedOrderLine]) -> Decimal {
    round_money(money::sum(normalized.iter().map(|line| line.net_amount)))
}

/// Priced order shared by the summary view, the document and persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPricing {
    pub lines: Vec<NormalizedOrderLine>,
    /// Sum of gross amounts, rounded
    pub gross_total: Decimal,
    /// Sum of discount amounts, rounded
    pub discount_total: Decimal,
    /// Sum of net amounts, rounded; equal to [`total`] over `lines`
    pub total: Decimal,
}

impl OrderPricing {
    /// Normalize `lines` and compute every total from the same pass
    pub fn from_lines(lines: &[OrderLine]) -> Result<Self, PricingError> {
        let normalized = normalize(lines)?;
        Ok(Self::from_normalized(normalized))
    }

    pub fn from_normalized(lines: Vec<NormalizedOrderLine>) -> Self {
        let gross_total = round_money(money::sum(lines.iter().map(|l| l.gross_amount)));
        let discount_total = round_money(money::sum(lines.iter().map(|l| l.discount_amount)));
        let total = total(&lines);

        Self {
            lines,
            gross_total,
            discount_total,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total ordered units across all lines
    pub fn total_units(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.ordered_quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn line(price: &str, quantity: i64, per_box: i64, discount: &str) -> OrderLine {
        OrderLine {
            product_code: "TS-001".to_string(),
            product_name: "Cotton Tee".to_string(),
            unit_price: dec(price),
            ordered_quantity: quantity,
            units_per_container: per_box,
            discount_percent: dec(discount),
        }
    }

    #[test]
    fn test_line_without_discount() {
        let normalized = normalize(&[line("10.00", 25, 12, "0")]).unwrap();
        let first = &normalized[0];

        assert_eq!(first.container_count, 2);
        assert_eq!(first.leftover_units, 1);
        assert_eq!(first.gross_amount, dec("250.00"));
        assert_eq!(first.discount_amount, Decimal::ZERO);
        assert_eq!(first.net_amount, dec("250.00"));
        assert!(!first.has_discount());
    }

    #[test]
    fn test_line_with_discount() {
        let normalized = normalize(&[line("20.00", 10, 5, "10")]).unwrap();
        let first = &normalized[0];

        assert_eq!(first.container_count, 2);
        assert_eq!(first.leftover_units, 0);
        assert_eq!(first.gross_amount, dec("200.00"));
        assert_eq!(first.discount_amount, dec("20.00"));
        assert_eq!(first.net_amount, dec("180.00"));
    }

    #[test]
    fn test_empty_lines() {
        let normalized = normalize(&[]).unwrap();
        assert!(normalized.is_empty());
        assert_eq!(total(&normalized), dec("0.00"));
        assert_eq!(total(&normalized).to_string(), "0.00");
    }

    #[test]
    fn test_zero_divisor_rejected_with_line_index() {
        let lines = [line("1.00", 3, 1, "0"), line("1.00", 3, 0, "0")];
        let err = normalize(&lines).unwrap_err();

        assert_eq!(
            err,
            PricingError::InvalidLine {
                line: 1,
                field: "units_per_container",
                message: "must be greater than zero".to_string(),
            }
        );
    }

    #[rstest]
    #[case(line("-0.01", 1, 1, "0"), "unit_price")]
    #[case(line("1.00", -1, 1, "0"), "ordered_quantity")]
    #[case(line("1.00", 1, 1, "-5"), "discount_percent")]
    #[case(line("1.00", 1, 1, "100.5"), "discount_percent")]
    fn test_range_violations(#[case] input: OrderLine, #[case] field: &str) {
        match normalize(&[input]) {
            Err(PricingError::NegativeValue { line, field: got, .. }) => {
                assert_eq!(line, 0);
                assert_eq!(got, field);
            }
            other => panic!("expected NegativeValue, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_divisor_is_invalid_line() {
        let err = normalize(&[line("1.00", 1, -4, "0")]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_LINE");
    }

    #[test]
    fn test_blank_product_code_rejected() {
        let mut input = line("1.00", 1, 1, "0");
        input.product_code = "  ".to_string();
        assert!(matches!(
            normalize(&[input]),
            Err(PricingError::InvalidLine { field: "product_code", .. })
        ));
    }

    #[rstest]
    #[case("CAFÉ-01")]
    #[case("TS\t001")]
    #[case("ТС-001")]
    fn test_unprintable_product_code_rejected(#[case] code: &str) {
        let mut input = line("1.00", 1, 1, "0");
        input.product_code = code.to_string();
        assert!(matches!(
            normalize(&[input]),
            Err(PricingError::InvalidLine { field: "product_code", .. })
        ));
    }

    #[test]
    fn test_full_discount_and_zero_quantity() {
        let normalized = normalize(&[line("9.99", 4, 6, "100"), line("5.00", 0, 6, "0")]).unwrap();

        assert_eq!(normalized[0].net_amount, Decimal::ZERO);
        assert_eq!(normalized[0].container_count, 0);
        assert_eq!(normalized[0].leftover_units, 4);
        assert_eq!(normalized[1].gross_amount, Decimal::ZERO);
        assert_eq!(total(&normalized), dec("0.00"));
    }

    #[test]
    fn test_total_rounds_once() {
        // 3 x 0.333 = 0.999 at full precision; per-line rounding would give 0.99
        let lines: Vec<_> = (0..3).map(|_| line("0.333", 1, 1, "0")).collect();
        let normalized = normalize(&lines).unwrap();
        assert_eq!(total(&normalized), dec("1.00"));
    }

    #[test]
    fn test_line_amount_is_bounded() {
        let huge = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let mut input = line("1.00", 1, 1, "0");
        input.unit_price = huge;

        let err = normalize(&[input.clone(), input]).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidLine { line: 0, field: "unit_price", .. }
        ));

        // Largest accepted lines still add up
        let mut at_limit = line("1.00", 1, 1, "0");
        at_limit.unit_price = Decimal::from(MAX_LINE_AMOUNT);
        let normalized = normalize(&[at_limit.clone(), at_limit]).unwrap();
        assert_eq!(total(&normalized), Decimal::from(2 * MAX_LINE_AMOUNT));
    }

    #[test]
    fn test_order_pricing_totals() {
        let pricing =
            OrderPricing::from_lines(&[line("10.00", 25, 12, "0"), line("20.00", 10, 5, "10")])
                .unwrap();

        assert_eq!(pricing.gross_total, dec("450.00"));
        assert_eq!(pricing.discount_total, dec("20.00"));
        assert_eq!(pricing.total, dec("430.00"));
        assert_eq!(pricing.total, total(&pricing.lines));
        assert_eq!(pricing.total_units(), 35);
        assert!(!pricing.is_empty());
    }
}
