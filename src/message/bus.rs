//! Message bus core implementation
//!
//! A thin wrapper over `tokio::sync::broadcast`. Handlers publish after a
//! successful persistence write; every connected WebSocket task holds a
//! receiver and forwards messages to its socket.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::BusMessage;

/// Default capacity of the broadcast channel
const DEFAULT_CAPACITY: usize = 1024;

/// Message bus - routes notifications to all subscribed clients
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
    shutdown_token: CancellationToken,
}

impl MessageBus {
    /// Create a bus with the default channel capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus with a specific channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Publish a message to all subscribers (best-effort)
    ///
    /// Returns the number of receivers the message reached. Zero
    /// subscribers is not an error: delivery is fire-and-forget.
    pub fn publish(&self, msg: BusMessage) -> usize {
        self.tx.send(msg).unwrap_or(0)
    }

    /// Subscribe to the broadcast stream
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Token for observing shutdown
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Gracefully shut down the bus, closing all WebSocket forward loops
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::EventType;

    #[tokio::test]
    async fn publish_reaches_subscribers() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe();

        let reached = bus.publish(BusMessage::data_updated());
        assert_eq!(reached, 1);

        let msg = rx.recv().await.expect("subscriber should receive");
        assert_eq!(msg.event, EventType::DataUpdated);
        assert!(msg.payload.is_none());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let bus = MessageBus::new();
        assert_eq!(bus.publish(BusMessage::data_updated()), 0);
    }

    #[tokio::test]
    async fn order_events_carry_payload() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe();

        bus.publish(BusMessage::order_created(&serde_json::json!({
            "orderId": "ORD-123456"
        })));

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event, EventType::OrderCreated);
        assert_eq!(msg.payload.unwrap()["orderId"], "ORD-123456");
    }
}
