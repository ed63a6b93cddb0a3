// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn backoff_delay_matches_the_documented_formula() {
    // (I5)
    let config = GatewayManagerConfig { reconnect_delay_ms: 1000, reconnect_backoff_factor: 1.5, ..Default::default() };
    assert_eq!(config.backoff_delay(0), Duration::from_millis(1000));
    assert_eq!(config.backoff_delay(1), Duration::from_millis(1500));
    assert_eq!(config.backoff_delay(2), Duration::from_millis(2250));
}

#[test]
fn defaults_match_the_documented_configuration() {
    let config = GatewayManagerConfig::default();
    assert_eq!(config.max_reconnect_attempts, 5);
    assert_eq!(config.reconnect_delay_ms, 1000);
    assert_eq!(config.keep_alive_interval_ms, 30_000);
}
