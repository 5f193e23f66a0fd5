//! Order change notifications
//!
//! Components that create or change orders publish on an [`EventBus`] they
//! were handed explicitly; list views subscribe to the same bus to refresh.
//!
//! ```text
//! OrderWorkflow::place_order ──▶ EventBus::publish() ──▶ broadcast channel ──▶ order list
//!                                                                          ──▶ customer history
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(64);
//! let mut rx = bus.subscribe();
//! let workflow = OrderWorkflow::new(stores, storage, config, bus.clone());
//!
//! workflow.place_order(request).await?;
//! if let Ok(envelope) = rx.recv().await {
//!     refresh(envelope.event.order_id());
//! }
//! ```

use crate::entities::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Changes to orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderEvent {
    /// An order was placed
    Created {
        order_id: Uuid,
        order_number: String,
        customer_id: Uuid,
        pdf_url: String,
    },
    /// An order's lines were revised and its document re-rendered
    Updated {
        order_id: Uuid,
        order_number: String,
        pdf_url: String,
    },
    /// An order moved to another status
    StatusChanged {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
    /// An order and its document were removed
    Deleted { order_id: Uuid, order_number: String },
}

impl OrderEvent {
    /// The order this event relates to
    pub fn order_id(&self) -> Uuid {
        match self {
            OrderEvent::Created { order_id, .. }
            | OrderEvent::Updated { order_id, .. }
            | OrderEvent::StatusChanged { order_id, .. }
            | OrderEvent::Deleted { order_id, .. } => *order_id,
        }
    }

    /// Get the action name
    pub fn action(&self) -> &str {
        match self {
            OrderEvent::Created { .. } => "created",
            OrderEvent::Updated { .. } => "updated",
            OrderEvent::StatusChanged { .. } => "status_changed",
            OrderEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: OrderEvent,
}

impl EventEnvelope {
    pub fn new(event: OrderEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone (Arc internally) and shareable across threads.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Receivers that fall more than `capacity` events behind get `Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Returns the number of receivers that will see the event.
    pub fn publish(&self, event: OrderEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() returns Err only if there are no receivers
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to future events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created(order_id: Uuid) -> OrderEvent {
        OrderEvent::Created {
            order_id,
            order_number: "ORD-2403-0042".to_string(),
            customer_id: Uuid::new_v4(),
            pdf_url: "memory://orders/ORD-2403-0042.pdf".to_string(),
        }
    }

    #[test]
    fn test_event_serialization_tag() {
        let json = serde_json::to_value(created(Uuid::new_v4())).unwrap();
        assert_eq!(json["action"], "created");
        assert_eq!(json["order_number"], "ORD-2403-0042");

        let json = serde_json::to_value(OrderEvent::StatusChanged {
            order_id: Uuid::new_v4(),
            from: OrderStatus::Pending,
            to: OrderStatus::Completed,
        })
        .unwrap();
        assert_eq!(json["action"], "status_changed");
        assert_eq!(json["to"], "completed");
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let order_id = Uuid::new_v4();

        assert_eq!(bus.publish(created(order_id)), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event.order_id(), order_id);
        assert_eq!(received.event.action(), "created");
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.clone().subscribe();
        assert_eq!(bus.receiver_count(), 2);

        bus.publish(OrderEvent::Deleted {
            order_id: Uuid::new_v4(),
            order_number: "ORD-2403-0001".to_string(),
        });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.id, e2.id);
    }

    #[test]
    fn test_event_bus_publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(created(Uuid::new_v4())), 0);
    }
}
