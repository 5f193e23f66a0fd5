//! Order and order item records

use crate::impl_record;
use crate::pricing::NormalizedOrderLine;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled orders keep their lines and document
    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

impl_record!(
    Order,
    "order",
    "orders",
    {
        order_number: String,
        customer_id: Uuid,
        /// Net total, rounded once to 2 decimals
        total_amount: Decimal,
        order_date: DateTime<Utc>,
        /// Retrieval URL of the rendered order document
        pdf_url: Option<String>,
        notes: Option<String>,
    }
);

impl Order {
    /// Create a pending order
    pub fn pending(order_number: &str, customer_id: Uuid, total_amount: Decimal) -> Self {
        Order::new(
            order_number.to_string(),
            OrderStatus::Pending.as_str().to_string(),
            order_number.to_string(),
            customer_id,
            total_amount,
            Utc::now(),
            None,
            None,
        )
    }

    /// Typed status; unknown stored values read as pending
    pub fn order_status(&self) -> OrderStatus {
        self.status.parse().unwrap_or_default()
    }

    pub fn set_order_status(&mut self, status: OrderStatus) {
        self.set_status(status.as_str().to_string());
    }
}

impl_record!(
    OrderItem,
    "order_item",
    "order_items",
    {
        order_id: Uuid,
        product_id: Uuid,
        quantity: u32,
        /// Undiscounted unit price
        unit_price: Decimal,
        discount_percent: Decimal,
        /// Net line amount, rounded to 2 decimals
        total_price: Decimal,
    }
);

impl OrderItem {
    /// Persisted form of a normalized line
    pub fn from_line(order_id: Uuid, product_id: Uuid, line: &NormalizedOrderLine) -> Self {
        OrderItem::new(
            line.product_name.clone(),
            "active".to_string(),
            order_id,
            product_id,
            line.ordered_quantity,
            line.unit_price,
            line.discount_percent,
            crate::pricing::money::round_money(line.net_amount),
        )
    }
}
