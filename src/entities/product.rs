//! Product (inventory item) record

use crate::impl_record;
use crate::pricing::OrderLine;
use rust_decimal::Decimal;

impl_record!(
    Product,
    "product",
    "products",
    {
        /// Stock code printed on order documents
        sku: String,
        /// Selling price per unit
        price: Decimal,
        /// Units packed in one box
        quantity_per_box: u32,
        /// Units currently in stock
        stock_quantity: u32,
    }
);

impl Product {
    /// Order line for `quantity` units of this product
    pub fn order_line(&self, quantity: i64, discount_percent: Decimal) -> OrderLine {
        OrderLine {
            product_code: self.sku.clone(),
            product_name: self.name.clone(),
            unit_price: self.price,
            ordered_quantity: quantity,
            units_per_container: i64::from(self.quantity_per_box),
            discount_percent,
        }
    }

    /// Case-insensitive match on name or stock code
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.sku.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Data;
    use crate::core::field::FieldValue;

    fn tee() -> Product {
        Product::new(
            "Cotton Tee".to_string(),
            "in_stock".to_string(),
            "TS-001".to_string(),
            Decimal::new(1250, 2),
            12,
            240,
        )
    }

    #[test]
    fn test_order_line_from_product() {
        let line = tee().order_line(25, Decimal::new(10, 0));
        assert_eq!(line.product_code, "TS-001");
        assert_eq!(line.product_name, "Cotton Tee");
        assert_eq!(line.unit_price, Decimal::new(1250, 2));
        assert_eq!(line.units_per_container, 12);
        assert_eq!(line.ordered_quantity, 25);
    }

    #[test]
    fn test_matches_term() {
        let product = tee();
        assert!(product.matches_term("cotton"));
        assert!(product.matches_term("ts-0"));
        assert!(product.matches_term(""));
        assert!(!product.matches_term("denim"));
    }

    #[test]
    fn test_numeric_fields_are_queryable() {
        let product = tee();
        assert_eq!(
            product.field_value("price"),
            Some(FieldValue::Decimal(Decimal::new(1250, 2)))
        );
        assert_eq!(
            product.field_value("quantity_per_box"),
            Some(FieldValue::Integer(12))
        );
    }
}
