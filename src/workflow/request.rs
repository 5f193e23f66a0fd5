//! Inputs and outputs of the order workflow

use crate::entities::{Customer, CustomerDetails, Order, OrderItem};
use crate::pricing::OrderPricing;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product line of the order form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedLine {
    pub product_id: Uuid,
    pub quantity: i64,
    #[serde(default)]
    pub discount_percent: Decimal,
}

impl RequestedLine {
    pub fn new(product_id: Uuid, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
            discount_percent: Decimal::ZERO,
        }
    }

    pub fn with_discount(mut self, percent: Decimal) -> Self {
        self.discount_percent = percent;
        self
    }
}

/// A submitted order form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer: CustomerDetails,
    /// Existing customer to update instead of creating a new one
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    pub lines: Vec<RequestedLine>,
}

/// Everything a placed or revised order left behind
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub customer: Customer,
    pub pricing: OrderPricing,
    pub document_url: String,
    pub document_key: String,
}

impl PlacedOrder {
    pub fn order_number(&self) -> &str {
        &self.order.order_number
    }
}
