// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use sensor_gateway::{ConnectionState, GatewayDescriptor, GatewayEvent, GatewayManager, GatewayManagerConfig};
use sensor_gateway_specs::{wait_for_state, MockGateway};

/// scenario 2: `RTN_LOGIN` reporting `Success: false` ends the session at
/// `Disconnected` with an `Auth` error recorded, and no further outbound
/// frames follow the rejected login.
#[tokio::test]
async fn failed_login_disconnects_without_further_sends() {
    let mut gateway = MockGateway::spawn().await.expect("spawn mock gateway");
    // A single reconnect attempt would only repeat the same failure and
    // slow the test down; the auth path never reaches that budget anyway
    // since an auth error is terminal, not transient.
    let config = GatewayManagerConfig { max_reconnect_attempts: 0, reconnect_delay_ms: 10, ..Default::default() };
    let manager = GatewayManager::new(config);
    let mut events = manager.subscribe();

    manager.connect(GatewayDescriptor::new("g1", gateway.url.clone(), "u@x", "p"));
    gateway.wait_for("POST_LOGIN", Duration::from_secs(2)).await.expect("POST_LOGIN sent");
    gateway.reply_login(false);

    assert!(wait_for_state(&manager, "g1", ConnectionState::Disconnected, Duration::from_secs(2)).await);

    let saw_auth_error = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match events.recv().await {
                Ok(GatewayEvent::Error { error, .. }) => return error.code.as_deref() == Some("AUTH_ERROR"),
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    })
    .await
    .unwrap_or(false);
    assert!(saw_auth_error, "expected an AUTH_ERROR event");

    // No further request follows the rejected login.
    assert!(gateway.next_frame(Duration::from_millis(500)).await.is_none());

    manager.cleanup().await;
}
