//! Currency and discount formatting for order documents

use crate::pricing::money::{MONEY_SCALE, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the currency symbol goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Prefix,
    Suffix,
}

/// Locale-dependent money formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// ISO 4217 code, e.g. "USD"
    pub code: String,
    /// Symbol printed with amounts, e.g. "$"
    pub symbol: String,
    pub symbol_position: SymbolPosition,
    pub decimal_separator: char,
    /// Group separator for thousands; `None` disables grouping
    pub thousands_separator: Option<char>,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            symbol_position: SymbolPosition::Prefix,
            decimal_separator: '.',
            thousands_separator: Some(','),
        }
    }
}

impl CurrencyFormat {
    /// Euro amounts written the French way: `1 234,50 €`
    pub fn euro() -> Self {
        Self {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
            symbol_position: SymbolPosition::Suffix,
            decimal_separator: ',',
            thousands_separator: Some(' '),
        }
    }

    /// Format an amount with exactly two decimals and the currency symbol
    ///
    /// This is the only place display rounding happens.
    pub fn format(&self, amount: Decimal) -> String {
        let number = self.format_number(amount);
        let sign = if round_money(amount) < Decimal::ZERO { "-" } else { "" };

        match self.symbol_position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, self.symbol, number),
            SymbolPosition::Suffix => format!("{}{} {}", sign, number, self.symbol),
        }
    }

    /// Two-decimal number with grouping, without symbol or sign
    pub fn format_number(&self, amount: Decimal) -> String {
        let rounded = round_money(amount.abs()).to_string();
        let (integer, fraction) = rounded
            .split_once('.')
            .unwrap_or((rounded.as_str(), "00"));

        let grouped = match self.thousands_separator {
            Some(separator) => group_thousands(integer, separator),
            None => integer.to_string(),
        };

        let mut fraction = fraction.to_string();
        while fraction.len() < MONEY_SCALE as usize {
            fraction.push('0');
        }

        format!("{}{}{}", grouped, self.decimal_separator, fraction)
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Discount cell text: a dash when there is no discount, else `12.5%`
pub fn format_discount(percent: Decimal) -> String {
    if percent.is_zero() {
        "-".to_string()
    } else {
        format!("{}%", percent.normalize())
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

    #[rstest]
    #[case("250", "$250.00")]
    #[case("1234567.891", "$1,234,567.89")]
    #[case("0.005", "$0.01")]
    #[case("0", "$0.00")]
    #[case("-12.5", "-$12.50")]
    #[case("-0.001", "$0.00")]
    fn test_default_format(#[case] amount: &str, #[case] expected: &str) {
        assert_eq!(CurrencyFormat::default().format(dec(amount)), expected);
    }

    #[test]
    fn test_euro_format() {
        let euro = CurrencyFormat::euro();
        assert_eq!(euro.format(dec("1234.5")), "1 234,50 €");
        assert_eq!(euro.format(dec("7")), "7,00 €");
    }

    #[test]
    fn test_no_grouping() {
        let format = CurrencyFormat {
            thousands_separator: None,
            ..CurrencyFormat::default()
        };
        assert_eq!(format.format(dec("98765.4")), "$98765.40");
    }

    #[rstest]
    #[case("0", "-")]
    #[case("0.00", "-")]
    #[case("10", "10%")]
    #[case("12.50", "12.5%")]
    #[case("100", "100%")]
    fn test_format_discount(#[case] percent: &str, #[case] expected: &str) {
        assert_eq!(format_discount(dec(percent)), expected);
    }
}
