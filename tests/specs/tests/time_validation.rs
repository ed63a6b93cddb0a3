// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use sensor_gateway::{ConnectionState, GatewayDescriptor, GatewayEvent, GatewayManager};
use sensor_gateway_specs::{fast_config, wait_for_state, MockGateway};

/// A reading whose `Time` doesn't match the wire time format is a schema
/// problem, not silently-ignored noise (spec.md §6.1): it's dropped rather
/// than stored, an error event is raised, and the session stays up to
/// receive the next (well-formed) reading.
#[tokio::test]
async fn malformed_reading_time_is_rejected_not_stored() {
    let mut gateway = MockGateway::spawn().await.expect("spawn mock gateway");
    let manager = GatewayManager::new(fast_config());
    let store = manager.reading_store();
    let mut events = manager.subscribe();

    manager.connect(GatewayDescriptor::new("g1", gateway.url.clone(), "u@x", "p"));
    gateway.wait_for("POST_LOGIN", Duration::from_secs(2)).await.expect("POST_LOGIN sent");
    gateway.reply_login(true);
    assert!(wait_for_state(&manager, "g1", ConnectionState::Authenticated, Duration::from_secs(2)).await);
    gateway.wait_for("GET_DYN", Duration::from_secs(2)).await.expect("GET_DYN sent");

    gateway.send(r#"{"Type":"RTN_DYN_BATTS","From":"SERV","Target":"UI","Data":[{"ID":1,"Serial":"100","Time":"not-a-time","Batt":50}]}"#);

    let saw_schema_error = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match events.recv().await {
                Ok(GatewayEvent::Error { error, .. }) => return error.code.as_deref() == Some("SCHEMA_ERROR"),
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    })
    .await
    .unwrap_or(false);
    assert!(saw_schema_error, "expected a SCHEMA_ERROR event for the malformed time");

    // The malformed reading never lands in the store...
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.battery("g1").is_empty());

    // ...and the session is still up to receive a well-formed one.
    gateway.send(r#"{"Type":"RTN_DYN_BATTS","From":"SERV","Target":"UI","Data":[{"ID":1,"Serial":"100","Time":"2026-01-01 00:00","Batt":50}]}"#);
    let landed = wait_until(|| (store.battery("g1").len() == 1).then_some(())).await;
    assert!(landed.is_some(), "well-formed reading must still land after a malformed one was rejected");

    manager.cleanup().await;
}

/// A `GET_DYN_BATTS` history query with a malformed `Start` date never
/// reaches the gateway; it's rejected as a schema error at send time
/// instead (spec.md §6.1 wire time formats).
#[tokio::test]
async fn malformed_history_query_date_is_not_sent() {
    let mut gateway = MockGateway::spawn().await.expect("spawn mock gateway");
    let manager = GatewayManager::new(fast_config());
    let mut events = manager.subscribe();

    manager.connect(GatewayDescriptor::new("g1", gateway.url.clone(), "u@x", "p"));
    gateway.wait_for("POST_LOGIN", Duration::from_secs(2)).await.expect("POST_LOGIN sent");
    gateway.reply_login(true);
    assert!(wait_for_state(&manager, "g1", ConnectionState::Authenticated, Duration::from_secs(2)).await);
    gateway.wait_for("GET_DYN", Duration::from_secs(2)).await.expect("GET_DYN sent");

    let mut query = sensor_gateway::protocol::request::HistoryQuery::default();
    query.start = Some("not-a-date".to_string());
    manager.get_dynamic_batts("g1", query);

    let saw_schema_error = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match events.recv().await {
                Ok(GatewayEvent::Error { error, .. }) => return error.code.as_deref() == Some("SCHEMA_ERROR"),
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    })
    .await
    .unwrap_or(false);
    assert!(saw_schema_error, "expected a SCHEMA_ERROR event for the malformed query date");

    assert!(gateway.next_frame(Duration::from_millis(300)).await.is_none(), "the malformed query must never reach the wire");

    manager.cleanup().await;
}

async fn wait_until<T>(mut probe: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if let Some(value) = probe() {
            return Some(value);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
