// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use sensor_gateway::{ConnectionState, GatewayDescriptor, GatewayError, GatewayEvent, GatewayManager, GatewayManagerConfig};
use sensor_gateway_specs::{wait_for_state, MockGateway};

/// scenario 5: reconnecting against an unreachable gateway stops after
/// exactly `max_reconnect_attempts` retries (one initial attempt plus the
/// budget), landing on `Disconnected` with no further attempts until an
/// explicit `connect` call.
#[tokio::test]
async fn reconnect_stops_at_the_configured_budget() {
    let url = MockGateway::unreachable_url().await.expect("reserve an unreachable address");
    let config = GatewayManagerConfig { max_reconnect_attempts: 2, reconnect_delay_ms: 20, reconnect_backoff_factor: 1.5, keep_alive_interval_ms: 60_000 };
    let manager = GatewayManager::new(config);
    let mut events = manager.subscribe();

    manager.connect(GatewayDescriptor::new("g1", url, "u@x", "p"));
    assert!(wait_for_state(&manager, "g1", ConnectionState::Disconnected, Duration::from_secs(5)).await);

    let mut transport_errors = 0;
    while let Ok(Ok(event)) = tokio::time::timeout(Duration::from_millis(200), events.recv()).await {
        if let GatewayEvent::Error { error, .. } = event {
            if error.code.as_deref() == Some(GatewayError::Transport(String::new()).code()) {
                transport_errors += 1;
            }
        }
    }
    // One attempt at time of `connect`, plus one retry per unit of
    // budget.
    assert_eq!(transport_errors, 3, "expected the initial attempt plus two retries to each record a transport error");

    // No further attempts happen without an explicit reconnect.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(manager.state("g1"), Some(ConnectionState::Disconnected));

    manager.cleanup().await;
}
