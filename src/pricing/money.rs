//! Money rounding
//!
//! Amounts are carried at full precision through the pricing engine and
//! rounded here exactly once, when a total or a display value is produced.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of a currency minor unit
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to the currency minor unit (half away from zero)
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Sum amounts at full precision
///
/// Line amounts are capped at [`MAX_LINE_AMOUNT`](crate::pricing::MAX_LINE_AMOUNT)
/// by `normalize`, which keeps any order total in range.
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc + amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("1.005", "1.01")]
    #[case("1.004", "1.00")]
    #[case("-1.005", "-1.01")]
    #[case("250", "250.00")]
    #[case("0", "0.00")]
    fn test_round_money(#[case] input: &str, #[case] expected: &str) {
        let rounded = round_money(Decimal::from_str(input).unwrap());
        assert_eq!(rounded.to_string(), expected);
    }

    #[test]
    fn test_sum_keeps_precision() {
        let third = Decimal::from(10) / Decimal::from(3);
        let total = sum([third, third, third]);
        assert_eq!(round_money(total), Decimal::from_str("10.00").unwrap());
    }
}
