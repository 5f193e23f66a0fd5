//! Order line input and normalized output types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One requested product line, as assembled by the order form
///
/// Numeric fields are signed so that bad input reaches the pricing engine
/// and gets rejected there instead of being wrapped or clamped upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Stock code; printable ASCII only, since it is printed verbatim
    pub product_code: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub ordered_quantity: i64,
    pub units_per_container: i64,
    /// Percentage in [0, 100]; zero means no discount
    #[serde(default)]
    pub discount_percent: Decimal,
}

/// A validated line with its container split and amounts
///
/// Amounts are unrounded. Round with
/// [`round_money`](crate::pricing::money::round_money) only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOrderLine {
    pub product_code: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub ordered_quantity: u32,
    pub units_per_container: u32,
    pub discount_percent: Decimal,

    /// Full containers: `ordered_quantity / units_per_container`
    pub container_count: u32,
    /// Units left over after filling containers
    pub leftover_units: u32,
    /// `unit_price * ordered_quantity`
    pub gross_amount: Decimal,
    /// `gross_amount * discount_percent / 100`
    pub discount_amount: Decimal,
    /// `gross_amount - discount_amount`
    pub net_amount: Decimal,
}

impl NormalizedOrderLine {
    pub fn has_discount(&self) -> bool {
        !self.discount_percent.is_zero()
    }
}
