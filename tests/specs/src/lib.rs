// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mock-gateway WebSocket harness for end-to-end scenario tests.
//!
//! Each [`MockGateway`] binds a loopback listener, accepts exactly one
//! client connection, and lets a test script frames to the client and
//! observe what the client sends, without the real `sensor-gateway`
//! library ever knowing it isn't talking to a real on-premise gateway.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::tungstenite::Message;

use sensor_gateway::{ConnectionState, GatewayManager, GatewayManagerConfig};

/// A mock gateway accepting a single client connection in a background
/// task, forwarding every text frame the client sends and relaying
/// whatever the test scripts back to it.
pub struct MockGateway {
    pub url: String,
    inbound: mpsc::UnboundedReceiver<String>,
    outbound: mpsc::UnboundedSender<String>,
}

impl MockGateway {
    /// Bind a loopback listener and accept one connection in the
    /// background.
    pub async fn spawn() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else { return };
            let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else { return };
            loop {
                tokio::select! {
                    frame = ws.next() => {
                        match frame {
                            Some(Ok(Message::Text(text))) => {
                                if inbound_tx.send(text.to_string()).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Ok(_)) => {}
                            Some(Err(_)) => break,
                        }
                    }
                    outgoing = outbound_rx.recv() => {
                        match outgoing {
                            Some(text) => { let _ = ws.send(Message::Text(text.into())).await; }
                            None => break,
                        }
                    }
                }
            }
        });

        Ok(Self { url: format!("ws://{addr}"), inbound: inbound_rx, outbound: outbound_tx })
    }

    /// A loopback address nothing listens on, for exercising reconnect
    /// exhaustion against a gateway that is never reachable.
    pub async fn unreachable_url() -> anyhow::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        Ok(format!("ws://{addr}"))
    }

    /// Send one text frame to the connected client.
    pub fn send(&self, text: impl Into<String>) {
        let _ = self.outbound.send(text.into());
    }

    /// Reply to `POST_LOGIN` with an `RTN_LOGIN` of the given outcome.
    pub fn reply_login(&self, success: bool) {
        self.send(format!(
            r#"{{"Type":"RTN_LOGIN","From":"SERV","Target":"UI","Data":{{"Email":"u@x","Success":{success}}}}}"#
        ));
    }

    /// Wait for the next frame the client sent, or `None` on timeout.
    pub async fn next_frame(&mut self, wait: Duration) -> Option<String> {
        timeout(wait, self.inbound.recv()).await.ok().flatten()
    }

    /// Wait until a frame containing `needle` arrives, discarding any
    /// frames that don't match, or `None` on timeout.
    pub async fn wait_for(&mut self, needle: &str, wait: Duration) -> Option<String> {
        let deadline = Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match timeout(remaining, self.inbound.recv()).await {
                Ok(Some(text)) if text.contains(needle) => return Some(text),
                Ok(Some(_)) => continue,
                _ => return None,
            }
        }
    }
}

/// Poll a manager's session state until it matches `want`, or time out.
pub async fn wait_for_state(manager: &GatewayManager, gateway_id: &str, want: ConnectionState, wait: Duration) -> bool {
    let deadline = Instant::now() + wait;
    while Instant::now() < deadline {
        if manager.state(gateway_id) == Some(want) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// A configuration tuned for fast, deterministic tests: short reconnect
/// delays and a keep-alive interval long enough never to fire during a
/// test's lifetime.
pub fn fast_config() -> GatewayManagerConfig {
    GatewayManagerConfig {
        max_reconnect_attempts: 2,
        reconnect_delay_ms: 50,
        reconnect_backoff_factor: 1.5,
        keep_alive_interval_ms: 60_000,
    }
}
