// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use sensor_gateway::{ConnectionState, GatewayDescriptor, GatewayManager};
use sensor_gateway_specs::{fast_config, wait_for_state, MockGateway};

/// scenario 1: a clean connect reaches `Authenticated` and the client
/// sends exactly `POST_LOGIN`, then `POST_SUB_CHANGES`, then `GET_DYN`,
/// in that order.
#[tokio::test]
async fn connect_authenticates_and_sends_the_post_open_sequence() {
    let mut gateway = MockGateway::spawn().await.expect("spawn mock gateway");
    let manager = GatewayManager::new(fast_config());

    assert!(manager.connect(GatewayDescriptor::new("g1", gateway.url.clone(), "u@x", "p")));

    let login_frame = gateway.wait_for("POST_LOGIN", Duration::from_secs(2)).await.expect("POST_LOGIN sent");
    assert!(login_frame.contains(r#""To":"SERV""#));
    gateway.reply_login(true);

    assert!(wait_for_state(&manager, "g1", ConnectionState::Authenticated, Duration::from_secs(2)).await);

    let sub_frame = gateway.next_frame(Duration::from_secs(1)).await.expect("POST_SUB_CHANGES sent");
    assert!(sub_frame.contains("POST_SUB_CHANGES"));

    let dyn_frame = gateway.next_frame(Duration::from_secs(1)).await.expect("GET_DYN sent");
    assert!(dyn_frame.contains(r#""Type":"GET_DYN""#));

    manager.cleanup().await;
}
