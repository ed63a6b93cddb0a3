// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The five session event kinds and the broadcast bus that carries them
//! (spec.md §2, §9 "Observer / event emitter").
//!
//! The original "on(event, handler) → unsubscribe" surface is modeled as a
//! `tokio::sync::broadcast` channel: `subscribe()` returns a receiver, and
//! dropping that receiver is the unsubscribe. There is no separate handler
//! registry to manage.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::error::ErrorEvent;
use crate::protocol::RawEnvelope;
use crate::session::ConnectionState;

/// One of the five event kinds the session manager emits (spec.md §2).
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    StatusChange { gateway_id: String, state: ConnectionState, at: DateTime<Utc> },
    Connected { gateway_id: String, at: DateTime<Utc> },
    Authenticated { gateway_id: String, at: DateTime<Utc> },
    Disconnected { gateway_id: String, reason: Option<String>, at: DateTime<Utc> },
    Error { gateway_id: String, error: ErrorEvent },
    /// A validated envelope whose `Type` did not match a known response
    /// variant, delivered so forward-compatible types are observable
    /// (spec.md §4.2 step 3).
    Message { gateway_id: String, envelope: RawEnvelope },
}

impl GatewayEvent {
    pub fn gateway_id(&self) -> &str {
        match self {
            Self::StatusChange { gateway_id, .. }
            | Self::Connected { gateway_id, .. }
            | Self::Authenticated { gateway_id, .. }
            | Self::Disconnected { gateway_id, .. }
            | Self::Error { gateway_id, .. }
            | Self::Message { gateway_id, .. } => gateway_id,
        }
    }
}

/// A bounded fan-out channel for [`GatewayEvent`]. Lagging subscribers
/// observe a gap (the manager itself never blocks on slow observers); the
/// default capacity tracks the teacher's own bus sizing.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GatewayEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.sender.subscribe()
    }

    /// Emit an event. Returns the number of live subscribers reached; an
    /// empty bus is not an error, it's the common case when no one has
    /// subscribed yet.
    pub fn emit(&self, event: GatewayEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
