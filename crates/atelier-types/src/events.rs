//! Event types for marketplace notifications.
//!
//! Events are emitted by the façade after the underlying transaction
//! commits, so observers only ever see durable facts.

use serde::{Deserialize, Serialize};

/// Envelope for all marketplace events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub timestamp: u64,
    /// Type-specific payload.
    pub payload: serde_json::Value,
}

/// All event types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CreatorRegistered,
    CreatorUpdated,
    ContentPublished,
    PriceChanged,
    ContentTombstoned,
    PurchaseComplete,
}
