//! # Order Desk
//!
//! Order pricing and order document generation for a small wholesale
//! business.
//!
//! ## Features
//!
//! - **Pricing engine**: splits ordered quantities into full boxes and
//!   leftover units, applies percentage discounts, totals with a single
//!   rounding step
//! - **Order documents**: paginated PDF order forms whose footer total always
//!   matches the pricing engine
//! - **Order workflow**: price, render, upload and record an order, undoing
//!   earlier writes when a later step fails
//! - **Events**: order changes broadcast on an explicit [`EventBus`](core::EventBus)
//! - **Configuration-Based**: currency, page setup and storage layout from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_desk::prelude::*;
//!
//! let lines = vec![OrderLine {
//!     product_code: "TS-001".to_string(),
//!     product_name: "Cotton Tee".to_string(),
//!     unit_price: Decimal::new(1000, 2),
//!     ordered_quantity: 25,
//!     units_per_container: 12,
//!     discount_percent: Decimal::ZERO,
//! }];
//!
//! let normalized = normalize(&lines)?;          // 2 boxes + 1 unit
//! let amount = total(&normalized);              // 250.00
//!
//! let generator = OrderDocumentGenerator::default();
//! let document = generator.render(
//!     &CustomerIdentity::named("Maison Dupont"),
//!     &normalized,
//!     "ORD-2403-0042",
//!     amount,
//! )?;
//! std::fs::write(document.file_name(), &document.bytes)?;
//! ```

pub mod config;
pub mod core;
pub mod document;
pub mod entities;
pub mod order_number;
pub mod pricing;
pub mod storage;
pub mod workflow;

/// Install a `tracing` subscriber filtered by `RUST_LOG`
///
/// Defaults to `order_desk=info` when `RUST_LOG` is unset. Calling it twice
/// is harmless; the second call leaves the first subscriber in place.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_desk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Data, Entity},
        error::{
            ConfigError, DeskError, DeskResult, EntityError, PricingError, RenderError,
            StorageError, ValidationError, WorkflowError,
        },
        events::{EventBus, EventEnvelope, OrderEvent},
        field::{FieldFormat, FieldValue},
        query::{Comparison, Page, PaginationMeta, RecordQuery, SortDirection},
        service::{DataService, ObjectStorage},
    };

    // === Macros ===
    pub use crate::impl_record;

    // === Pricing ===
    pub use crate::pricing::{
        NormalizedOrderLine, OrderLine, OrderPricing, normalize, round_money, total,
    };

    // === Documents ===
    pub use crate::document::{
        CurrencyFormat, CustomerIdentity, DocumentLayout, OrderDocument, OrderDocumentGenerator,
        PageSize, SymbolPosition,
    };
    pub use crate::order_number::OrderNumber;

    // === Records ===
    pub use crate::entities::{Customer, CustomerDetails, Order, OrderItem, OrderStatus, Product};

    // === Storage ===
    pub use crate::storage::{InMemoryDataService, InMemoryObjectStorage};

    // === Workflow ===
    pub use crate::workflow::{
        OrderStores, OrderWorkflow, PlaceOrderRequest, PlacedOrder, RequestedLine,
    };

    // === Config ===
    pub use crate::config::{DeskConfig, DocumentConfig, OrderNumberConfig, StorageConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
