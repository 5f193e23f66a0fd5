//! Shared test harness for record storage backends
//!
//! Provides product fixtures spanning the `FieldValue` variants a catalog
//! record carries (text, integer, decimal) and the `data_service_tests!`
//! contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use order_desk::entities::Product;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A catalog product with the given stock code and price in cents
pub fn create_test_product(name: &str, sku: &str, price_cents: i64, per_box: u32) -> Product {
    Product::new(
        name.to_string(),
        "in_stock".to_string(),
        sku.to_string(),
        Decimal::new(price_cents, 2),
        per_box,
        100,
    )
}

/// Same as [`create_test_product`] with a fixed id
pub fn create_test_product_with_id(id: Uuid, name: &str, sku: &str) -> Product {
    let mut product = create_test_product(name, sku, 1000, 12);
    product.id = id;
    product
}

/// A small catalog with distinct names, codes, prices and box sizes
pub fn sample_catalog() -> Vec<Product> {
    vec![
        create_test_product("Cotton Tee", "TS-001", 1000, 12),
        create_test_product("Hoodie", "HD-002", 2500, 5),
        create_test_product("Cap", "CP-003", 800, 20),
        create_test_product("Denim Jacket", "DJ-004", 6000, 5),
        create_test_product("Socks", "SK-005", 300, 50),
    ]
}
