// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use sensor_gateway::protocol::RequestBody;
use sensor_gateway::{ConnectionState, GatewayDescriptor, GatewayManager};
use sensor_gateway_specs::{fast_config, wait_for_state, MockGateway};

/// scenario 3: a request sent while a session is `Authenticating` (after
/// `POST_LOGIN` but before `RTN_LOGIN` arrives) queues instead of going
/// out immediately, and drains only after the post-login
/// `POST_SUB_CHANGES`/`GET_DYN` pair, in submission order.
#[tokio::test]
async fn request_sent_during_authentication_queues_until_after_post_login_sequence() {
    let mut gateway = MockGateway::spawn().await.expect("spawn mock gateway");
    let manager = GatewayManager::new(fast_config());

    manager.connect(GatewayDescriptor::new("g1", gateway.url.clone(), "u@x", "p"));
    gateway.wait_for("POST_LOGIN", Duration::from_secs(2)).await.expect("POST_LOGIN sent");

    assert!(wait_for_state(&manager, "g1", ConnectionState::Authenticating, Duration::from_secs(2)).await);
    assert!(manager.take_dynamic_reading("g1", 42));

    // Give the queued command a moment to reach the session task before
    // the login reply unblocks the gate, so the ordering below is
    // meaningful rather than coincidental.
    tokio::time::sleep(Duration::from_millis(50)).await;
    gateway.reply_login(true);

    let second = gateway.next_frame(Duration::from_secs(2)).await.expect("POST_SUB_CHANGES sent");
    assert!(second.contains("POST_SUB_CHANGES"));
    let third = gateway.next_frame(Duration::from_secs(1)).await.expect("GET_DYN sent");
    assert!(third.contains(r#""Type":"GET_DYN""#));
    let fourth = gateway.next_frame(Duration::from_secs(1)).await.expect("queued TAKE_DYN_READING sent");
    assert!(fourth.contains("TAKE_DYN_READING"));
    assert!(fourth.contains(r#""Serial":42"#));

    manager.cleanup().await;
}

/// Sanity check that the wire encoding of the queued request matches the
/// typed variant the manager built it from.
#[test]
fn take_dynamic_reading_is_the_expected_request_shape() {
    let body = RequestBody::TakeDynReading(sensor_gateway::protocol::request::SerialRequest { serial: 42 });
    assert_eq!(body.type_name(), "TAKE_DYN_READING");
}
