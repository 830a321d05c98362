//! Live update channel
//!
//! Storefront and admin clients keep a WebSocket open to receive change
//! notifications. The server side is a broadcast bus:
//!
//! ```text
//! handler ──▶ MessageBus::publish() ──▶ broadcast::Sender<BusMessage>
//!                                            │
//!                              ┌─────────────┴─────────────┐
//!                              ▼                           ▼
//!                        WebSocket client 1          WebSocket client N
//! ```
//!
//! Delivery is at-most-once and fire-and-forget: no acknowledgment, no
//! retry, no ordering guarantee across concurrent emissions.

pub mod bus;
pub mod ws;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use bus::MessageBus;

/// Notification event types pushed to connected clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A new order was placed (payload: full order snapshot)
    OrderCreated,
    /// An order changed (payload: full order snapshot)
    OrderUpdated,
    /// Catalog data changed (categories etc.; no payload)
    DataUpdated,
}

/// A single bus message, serialized as JSON on the WebSocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusMessage {
    pub event: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl BusMessage {
    pub fn new(event: EventType, payload: Option<serde_json::Value>) -> Self {
        Self {
            event,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// `order_created` event carrying the full order snapshot
    pub fn order_created<T: Serialize>(order: &T) -> Self {
        Self::new(EventType::OrderCreated, serde_json::to_value(order).ok())
    }

    /// `order_updated` event carrying the full order snapshot
    pub fn order_updated<T: Serialize>(order: &T) -> Self {
        Self::new(EventType::OrderUpdated, serde_json::to_value(order).ok())
    }

    /// `data_updated` event (generic catalog change, no payload)
    pub fn data_updated() -> Self {
        Self::new(EventType::DataUpdated, None)
    }
}
