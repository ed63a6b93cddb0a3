// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session manager configuration (spec.md §4.1, §6.3).

use std::time::Duration;

use clap::Args;

/// The four configuration knobs recognized by the session manager.
/// Library callers construct this directly; the demonstration binary
/// exposes it as CLI/env arguments.
#[derive(Debug, Clone, Copy, PartialEq, Args)]
pub struct GatewayManagerConfig {
    /// Upper bound on consecutive reconnect attempts.
    #[arg(long, env = "GATEWAY_MAX_RECONNECT_ATTEMPTS", default_value_t = 5)]
    pub max_reconnect_attempts: u32,

    /// Base delay of the reconnect backoff schedule, in milliseconds.
    #[arg(long, env = "GATEWAY_RECONNECT_DELAY_MS", default_value_t = 1000)]
    pub reconnect_delay_ms: u64,

    /// Exponent base of the reconnect backoff schedule.
    #[arg(long, env = "GATEWAY_RECONNECT_BACKOFF_FACTOR", default_value_t = 1.5)]
    pub reconnect_backoff_factor: f64,

    /// Interval at which socket health is polled, in milliseconds.
    #[arg(long, env = "GATEWAY_KEEP_ALIVE_INTERVAL_MS", default_value_t = 30_000)]
    pub keep_alive_interval_ms: u64,
}

impl Default for GatewayManagerConfig {
    fn default() -> Self {
        Self { max_reconnect_attempts: 5, reconnect_delay_ms: 1000, reconnect_backoff_factor: 1.5, keep_alive_interval_ms: 30_000 }
    }
}

impl GatewayManagerConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_millis(self.keep_alive_interval_ms)
    }

    /// The backoff delay at a given attempt count, per spec.md I5:
    /// `reconnectDelayMs × reconnectBackoffFactor^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let millis = self.reconnect_delay_ms as f64 * self.reconnect_backoff_factor.powi(attempt as i32);
        Duration::from_millis(millis.round() as u64)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
