// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use sensor_gateway::{ConnectionState, GatewayDescriptor, GatewayManager};
use sensor_gateway_specs::{fast_config, wait_for_state, MockGateway};

/// scenario 4: an authoritative `RTN_DYN_BATTS` snapshot followed by a
/// streamed `NOT_DYN_BATT` notification for the same id overwrites the
/// entry in place, leaves other ids untouched, and hands out a fresh map
/// reference for observers tracking it by identity.
#[tokio::test]
async fn streamed_notification_overwrites_the_authoritative_snapshot_by_id() {
    let mut gateway = MockGateway::spawn().await.expect("spawn mock gateway");
    let manager = GatewayManager::new(fast_config());
    let store = manager.reading_store();

    manager.connect(GatewayDescriptor::new("g1", gateway.url.clone(), "u@x", "p"));
    gateway.wait_for("POST_LOGIN", Duration::from_secs(2)).await.expect("POST_LOGIN sent");
    gateway.reply_login(true);
    assert!(wait_for_state(&manager, "g1", ConnectionState::Authenticated, Duration::from_secs(2)).await);
    gateway.wait_for("GET_DYN", Duration::from_secs(2)).await.expect("GET_DYN sent");

    gateway.send(
        r#"{"Type":"RTN_DYN_BATTS","From":"SERV","Target":"UI","Data":[
            {"ID":1,"Serial":"100","Time":"2026-01-01 00:00","Batt":50},
            {"ID":2,"Serial":"200","Time":"2026-01-01 00:00","Batt":90}
        ]}"#,
    );

    let before = wait_until(|| {
        let snapshot = store.battery("g1");
        (snapshot.len() == 2).then_some(snapshot)
    })
    .await
    .expect("initial snapshot landed");
    assert_eq!(before.get(&1).map(|r| r.batt), Some(50));

    gateway.send(r#"{"Type":"NOT_DYN_BATT","From":"SERV","Data":{"1":{"ID":1,"Serial":"100","Time":"2026-01-01 00:05","Batt":80}}}"#);

    let after = wait_until(|| {
        let snapshot = store.battery("g1");
        (snapshot.get(&1).map(|r| r.batt) == Some(80)).then_some(snapshot)
    })
    .await
    .expect("overwrite landed");

    assert_eq!(after.get(&1).map(|r| r.batt), Some(80));
    assert_eq!(after.get(&2).map(|r| r.batt), Some(90), "untouched id must survive the overwrite");
    assert!(!Arc::ptr_eq(&before, &after), "mutation must hand out a fresh map reference");

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
