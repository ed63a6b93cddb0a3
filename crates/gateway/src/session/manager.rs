// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide Session Manager (spec.md §4.1, §6.2).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::GatewayManagerConfig;
use crate::descriptor::GatewayDescriptor;
use crate::events::{EventBus, GatewayEvent};
use crate::protocol::request::{HistoryQuery, SerialRequest, SerialsFilter};
use crate::protocol::RequestBody;
use crate::reading_store::{ReadingStore, ReadingStoreView};

use super::state::ConnectionState;
use super::task::{run_session, SessionCommand};

struct SessionHandle {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Process-wide owner of every gateway session (spec.md §4.1). Construct
/// one per subsystem root (spec.md §9, "Singletons" — no global-addressable
/// requirement) and share it via `Arc` with whatever calls its methods.
pub struct GatewayManager {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
    store: Arc<ReadingStore>,
    events: EventBus,
    config: GatewayManagerConfig,
    root_cancel: CancellationToken,
}

impl GatewayManager {
    pub fn new(config: GatewayManagerConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store: Arc::new(ReadingStore::new()),
            events: EventBus::default(),
            config,
            root_cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to the five session event kinds (spec.md §2). Dropping
    /// the receiver is the unsubscribe (spec.md §9, "Observer / event
    /// emitter").
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.events.subscribe()
    }

    /// A read-only view over the reading store, for the out-of-scope UI
    /// adapter (spec.md §4.3).
    pub fn reading_store(&self) -> ReadingStoreView {
        ReadingStoreView::new(self.store.clone())
    }

    /// The current state of a gateway's session, if one exists.
    pub fn state(&self, gateway_id: &str) -> Option<ConnectionState> {
        let sessions = self.sessions.read().unwrap_or_else(|p| p.into_inner());
        sessions.get(gateway_id).map(|handle| *handle.state_rx.borrow())
    }

    /// Open (or idempotently continue) a session to `descriptor.id`
    /// (spec.md §4.1, `connect`).
    pub fn connect(&self, descriptor: GatewayDescriptor) -> bool {
        let id = descriptor.id.clone();

        {
            let sessions = self.sessions.read().unwrap_or_else(|p| p.into_inner());
            if let Some(handle) = sessions.get(&id) {
                if matches!(
                    *handle.state_rx.borrow(),
                    ConnectionState::Connecting
                        | ConnectionState::Connected
                        | ConnectionState::Authenticating
                        | ConnectionState::Authenticated
                ) {
                    return true;
                }
            }
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let cancel = self.root_cancel.child_token();

        let id_for_task = id.clone();
        let task_command_tx = command_tx.clone();
        let config = self.config;
        let store = self.store.clone();
        let events = self.events.clone();
        let task_cancel = cancel.clone();

        // The handle stays in the map once the task ends, rather than
        // being removed here: `state()` must keep returning the session's
        // last-known state (e.g. `Disconnected` after a budget-exhausted
        // reconnect) until the next `connect()` for this id replaces the
        // entry.
        let join = tokio::spawn(async move {
            run_session(id_for_task, descriptor, config, store, events, state_tx, task_command_tx, command_rx, task_cancel)
                .await;
        });

        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        sessions.insert(id, SessionHandle { command_tx, state_rx, cancel, join });
        true
    }

    /// Close a session's socket, cancel its timers, and empty its queue
    /// (spec.md §4.1, `disconnect`). Never triggers reconnect.
    pub fn disconnect(&self, gateway_id: &str, reason: Option<String>) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(|p| p.into_inner());
        match sessions.get(gateway_id) {
            Some(handle) => handle.command_tx.send(SessionCommand::Disconnect(reason)).is_ok(),
            None => false,
        }
    }

    /// Validate and send (or queue) a request on an existing session
    /// (spec.md §4.1, `sendMessage`; §4.2, "Outbound algorithm").
    pub fn send_message(&self, gateway_id: &str, body: RequestBody) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(|p| p.into_inner());
        match sessions.get(gateway_id) {
            Some(handle) => handle.command_tx.send(SessionCommand::Send(body)).is_ok(),
            None => false,
        }
    }

    pub fn take_dynamic_reading(&self, gateway_id: &str, serial: i64) -> bool {
        self.send_message(gateway_id, RequestBody::TakeDynReading(SerialRequest { serial }))
    }

    pub fn take_dynamic_temp(&self, gateway_id: &str, serial: i64) -> bool {
        self.send_message(gateway_id, RequestBody::TakeDynTemp(SerialRequest { serial }))
    }

    pub fn take_dynamic_batt(&self, gateway_id: &str, serial: i64) -> bool {
        self.send_message(gateway_id, RequestBody::TakeDynBatt(SerialRequest { serial }))
    }

    pub fn get_dynamic_readings(&self, gateway_id: &str, query: HistoryQuery) -> bool {
        self.send_message(gateway_id, RequestBody::GetDynReadings(query))
    }

    pub fn get_dynamic_temps(&self, gateway_id: &str, query: HistoryQuery) -> bool {
        self.send_message(gateway_id, RequestBody::GetDynTemps(query))
    }

    pub fn get_dynamic_batts(&self, gateway_id: &str, query: HistoryQuery) -> bool {
        self.send_message(gateway_id, RequestBody::GetDynBatts(query))
    }

    /// Request the current sensor snapshot (spec.md §4.1,
    /// `getConnectedSensors` sends `GET_DYN`).
    pub fn get_connected_sensors(&self, gateway_id: &str) -> bool {
        self.send_message(gateway_id, RequestBody::GetDyn(SerialsFilter::default()))
    }

    /// Tear down every session (spec.md §4.1, `cleanup`). Cancels the root
    /// token, which cascades to every session's child token, then waits
    /// for each session task to finish.
    pub async fn cleanup(&self) {
        self.root_cancel.cancel();
        let handles: Vec<JoinHandle<()>> = {
            let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
            sessions.drain().map(|(_, handle)| handle.join).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
