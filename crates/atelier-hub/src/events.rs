//! Event emission for external observers.
//!
//! The façade emits an event after the underlying transaction commits,
//! so subscribers only ever see durable facts. Emission never blocks;
//! the no-subscriber case is ignored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use atelier_types::events::{Event, EventType};
use atelier_types::unix_now;
use tokio::sync::broadcast;

/// Event bus for broadcasting marketplace events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    sequence: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event_type: EventType, payload: serde_json::Value) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(Event {
            event_type,
            timestamp: unix_now(),
            payload,
        });
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Get the current sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(
            EventType::CreatorRegistered,
            serde_json::json!({"account_id": "alice"}),
        );

        let event = rx.try_recv().expect("receive event");
        assert_eq!(event.event_type, EventType::CreatorRegistered);
        assert_eq!(event.payload["account_id"], "alice");
        assert_eq!(bus.sequence(), 1);
    }

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::new(16);
        bus.emit(EventType::PurchaseComplete, serde_json::json!({}));
        assert_eq!(bus.sequence(), 1);
    }
}
