// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway identity, sourced externally and immutable within a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity, connection, and credential information for one on-premise
/// sensor gateway. Fetched from a collaborator registry (out of scope for
/// this subsystem) and treated as read-only for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayDescriptor {
    pub id: String,
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_authenticated_at: Option<DateTime<Utc>>,
}

impl GatewayDescriptor {
    pub fn new(id: impl Into<String>, url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            username: username.into(),
            password: password.into(),
            status: None,
            last_authenticated_at: None,
        }
    }
}
