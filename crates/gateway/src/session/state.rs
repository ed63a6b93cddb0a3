// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-session Mealy state machine (spec.md §4.1).

use serde::{Deserialize, Serialize};

/// A session's connection state. Transitions are driven exclusively by
/// [`super::task::run_session`]; nothing else mutates state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Authenticating,
    Authenticated,
    Error,
}

impl ConnectionState {
    /// Whether a socket handle should be present in this state (spec.md
    /// §3, invariant I1: `socket == null ⇔ state ∈ {Disconnected, Error}`).
    pub fn has_socket(&self) -> bool {
        !matches!(self, Self::Disconnected | Self::Error)
    }

    /// Whether a message of the given wire `Type` may be sent immediately
    /// in this state rather than queued (spec.md §4.1, "Outbound
    /// queueing"). `POST_LOGIN` is ready slightly earlier than everything
    /// else.
    pub fn is_ready_for(&self, message_type: &str) -> bool {
        if message_type == "POST_LOGIN" {
            matches!(self, Self::Connected | Self::Authenticating)
        } else {
            matches!(self, Self::Connected | Self::Authenticated)
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
