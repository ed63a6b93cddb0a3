// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds surfaced by the gateway connection subsystem.
//!
//! Every fallible path records a [`GatewayError`] as a session's last error
//! and mirrors it into an `error` event (see [`crate::events::GatewayEvent`]).
//! Only [`GatewayError::Auth`] additionally forces a state transition; the
//! rest are recorded without otherwise touching the connection state
//! machine, per the propagation rules in the subsystem's error design.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error kinds the subsystem can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayError {
    /// Socket error or abnormal close.
    Transport(String),
    /// Invalid JSON on an inbound frame.
    Parse(String),
    /// Valid JSON with the wrong envelope or payload shape.
    Schema(String),
    /// `RTN_LOGIN` reported `Success: false`.
    Auth(String),
    /// The gateway sent an `RTN_ERR` frame.
    Remote { attempt: String, error: String },
    /// Outbound serialization or write failure.
    Send(String),
    /// An illegal waveform transform direction was requested.
    Pipeline(String),
}

impl GatewayError {
    /// Machine-readable error code, mirrored into [`ErrorEvent::code`].
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Remote { .. } => "REMOTE_ERROR",
            Self::Send(_) => "SEND_ERROR",
            Self::Pipeline(_) => "PIPELINE_ERROR",
        }
    }

    /// Whether this error kind forces the owning session into `Error` state
    /// and disconnects it. Only authentication failures do.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Build the `{message, code, timestamp}` record exposed to observers.
    pub fn to_event(&self, at: DateTime<Utc>) -> ErrorEvent {
        ErrorEvent { message: self.to_string(), code: Some(self.code().to_owned()), timestamp: at }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Schema(msg) => write!(f, "schema error: {msg}"),
            Self::Auth(msg) => write!(f, "{msg}"),
            Self::Remote { attempt, error } => write!(f, "remote error on {attempt}: {error}"),
            Self::Send(msg) => write!(f, "send error: {msg}"),
            Self::Pipeline(msg) => write!(f, "pipeline error: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// User-visible error record surfaced per gateway, per spec.md §7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
    pub code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
