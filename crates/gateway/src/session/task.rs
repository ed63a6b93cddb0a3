// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-session task: owns the socket, the FSM, the outbound queue, and
//! drives reconnect/keep-alive (spec.md §4.1).

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::GatewayManagerConfig;
use crate::descriptor::GatewayDescriptor;
use crate::error::GatewayError;
use crate::events::{EventBus, GatewayEvent};
use crate::protocol::request::{EmptyData, PostLoginData, SerialRequest, SerialsFilter};
use crate::protocol::{InboundFrame, OutboundEnvelope, RequestBody, ResponseBody};
use crate::reading_store::ReadingStore;

use super::state::ConnectionState;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The grace period after socket open before `POST_LOGIN` is sent, and
/// again before `GET_DYN` follows a successful login (spec.md §4.1,
/// "Post-open sequence"). Treated as a fixed implementation constant, not
/// a configuration knob: spec.md §9 leaves its necessity an open question
/// but does not suggest it should vary per deployment.
const POST_OPEN_DELAY: Duration = Duration::from_millis(300);

/// Delay between the auto-requested `TAKE_DYN_TEMP` and `TAKE_DYN_BATT`
/// that follow a sensor reconnecting (spec.md §4.2, `NOT_DYN_CONN`).
const AUTO_TEMP_BATT_DELAY: Duration = Duration::from_millis(500);

/// Commands a session task accepts, from the manager's public API and from
/// the task's own detached timers (the self-send pattern that keeps the
/// main select loop non-blocking).
#[derive(Debug)]
pub enum SessionCommand {
    Send(RequestBody),
    Disconnect(Option<String>),
    SendPostLogin,
    SendPostSubAndGetDyn,
    SendAutoBatt(i64),
}

/// Outcome of one connected-socket lifetime, used by the outer reconnect
/// loop to decide whether to retry.
enum ConnectedOutcome {
    ExplicitDisconnect,
    Terminal,
    AbnormalClose,
}

struct Session {
    id: String,
    descriptor: GatewayDescriptor,
    config: GatewayManagerConfig,
    store: Arc<ReadingStore>,
    events: EventBus,
    state_tx: watch::Sender<ConnectionState>,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    queue: VecDeque<RequestBody>,
    reconnect_attempts: u32,
}

impl Session {
    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
        self.events.emit(GatewayEvent::StatusChange { gateway_id: self.id.clone(), state, at: Utc::now() });
    }

    fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    fn record_error(&self, error: GatewayError) {
        warn!(gateway_id = %self.id, %error, "session error");
        self.events.emit(GatewayEvent::Error { gateway_id: self.id.clone(), error: error.to_event(Utc::now()) });
    }

    fn enqueue(&mut self, body: RequestBody) {
        self.queue.push_back(body);
    }

    /// Reject a malformed `Start`/`End` history-range date before it is
    /// gated or queued, rather than letting it reach the gateway and
    /// silently skew a range query (spec.md §6.1 wire time formats).
    fn validate_outbound(&self, body: &RequestBody) -> Result<(), GatewayError> {
        let query = match body {
            RequestBody::GetDynReadings(q) | RequestBody::GetDynTemps(q) | RequestBody::GetDynBatts(q) => q,
            _ => return Ok(()),
        };
        for date in [&query.start, &query.end].into_iter().flatten() {
            crate::protocol::time::parse_date(date)
                .map_err(|e| GatewayError::Schema(format!("invalid history-range date {date:?}: {e}")))?;
        }
        Ok(())
    }

    /// Reject a reading whose `Time` field doesn't match the wire format,
    /// rather than storing it for a later range query to silently corrupt
    /// (spec.md §6.1 wire time formats).
    fn validate_reading_time(&self, time: &str) -> bool {
        match crate::protocol::time::parse_reading_time(time) {
            Ok(_) => true,
            Err(err) => {
                self.record_error(GatewayError::Schema(format!("invalid reading time {time:?}: {err}")));
                false
            }
        }
    }

    /// Send a frame on an open socket, or queue it if the gate is closed
    /// (spec.md §4.1, "Outbound queueing").
    async fn send_or_queue(&mut self, sink: &mut WsStream, body: RequestBody) {
        if let Err(err) = self.validate_outbound(&body) {
            self.record_error(err);
            return;
        }
        if self.state().is_ready_for(body.type_name()) {
            if let Err(err) = self.write(sink, &body).await {
                self.record_error(err);
                self.queue.push_front(body);
            }
        } else {
            self.enqueue(body);
        }
    }

    async fn write(&self, sink: &mut WsStream, body: &RequestBody) -> Result<(), GatewayError> {
        let envelope = OutboundEnvelope::new(body.clone());
        let text = envelope.to_json().map_err(|e| GatewayError::Send(e.to_string()))?;
        sink.send(Message::Text(text.into())).await.map_err(|e| GatewayError::Send(e.to_string()))
    }

    /// Re-evaluate the gate for every queued message in order, stopping on
    /// the first send failure so order is preserved across retries
    /// (spec.md §4.1, "drain procedure"; §5, I3).
    async fn drain_queue(&mut self, sink: &mut WsStream) {
        while let Some(body) = self.queue.front() {
            if !self.state().is_ready_for(body.type_name()) {
                break;
            }
            let body = self.queue.pop_front().expect("front just checked");
            if let Err(err) = self.write(sink, &body).await {
                self.record_error(err);
                self.queue.push_front(body);
                break;
            }
        }
    }

    fn spawn_delayed(&self, delay: Duration, command: SessionCommand) {
        let tx = self.command_tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(command);
        });
    }

    async fn handle_inbound(&mut self, sink: &mut WsStream, frame: InboundFrame) {
        let body = match frame {
            InboundFrame::Typed(body) => body,
            InboundFrame::Raw(envelope) => {
                self.events.emit(GatewayEvent::Message { gateway_id: self.id.clone(), envelope });
                return;
            }
        };

        match body {
            ResponseBody::RtnLogin(data) => {
                if data.success {
                    self.set_state(ConnectionState::Authenticated);
                    self.events.emit(GatewayEvent::Authenticated { gateway_id: self.id.clone(), at: Utc::now() });
                    self.spawn_delayed(POST_OPEN_DELAY, SessionCommand::SendPostSubAndGetDyn);
                } else {
                    let error = GatewayError::Auth("Authentication failed".to_string());
                    self.record_error(error);
                    self.set_state(ConnectionState::Error);
                }
            }
            ResponseBody::RtnErr(data) => {
                self.record_error(GatewayError::Remote { attempt: data.attempt, error: data.error });
            }
            ResponseBody::RtnDyn(sensors) => {
                self.store.replace_sensors(&self.id, sensors);
            }
            ResponseBody::RtnDynReadings(readings) => {
                let readings: Vec<_> = readings.into_iter().filter(|r| self.validate_reading_time(r.time())).collect();
                self.store.upsert_vibration(&self.id, readings);
            }
            ResponseBody::RtnDynTemps(readings) => {
                let readings: Vec<_> = readings.into_iter().filter(|r| self.validate_reading_time(&r.time)).collect();
                self.store.upsert_temperature(&self.id, readings);
            }
            ResponseBody::RtnDynBatts(readings) => {
                let readings: Vec<_> = readings.into_iter().filter(|r| self.validate_reading_time(&r.time)).collect();
                self.store.upsert_battery(&self.id, readings);
            }
            ResponseBody::NotDynConn(data) => {
                if data.connected {
                    self.send_or_queue(sink, RequestBody::TakeDynTemp(SerialRequest { serial: data.serial })).await;
                    self.spawn_delayed(AUTO_TEMP_BATT_DELAY, SessionCommand::SendAutoBatt(data.serial));
                }
            }
            ResponseBody::NotApConn(_) | ResponseBody::NotDynReadingStarted(_) => {
                // Notification-only; no store mutation required.
            }
            ResponseBody::NotDynReading(map) => {
                let readings: Vec<_> = map.into_values().filter(|r| self.validate_reading_time(r.time())).collect();
                self.store.upsert_vibration(&self.id, readings);
            }
            ResponseBody::NotDynTemp(map) => {
                let readings: Vec<_> = map.into_values().filter(|r| self.validate_reading_time(&r.time)).collect();
                self.store.upsert_temperature(&self.id, readings);
            }
            ResponseBody::NotDynBatt(map) => {
                let readings: Vec<_> = map.into_values().filter(|r| self.validate_reading_time(&r.time)).collect();
                self.store.upsert_battery(&self.id, readings);
            }
        }
    }

    /// Close the socket, clear the outbound queue, and transition to
    /// `Disconnected`, emitting the event every path off a connected
    /// socket must produce (spec.md §4.1 "disconnect"; §7, auth error
    /// "transitions to Error AND issues disconnect"). `terminal` records
    /// whether the outer reconnect loop should retry or stop.
    async fn terminate(&mut self, ws: &mut WsStream, terminal: bool) -> ConnectedOutcome {
        let _ = ws.close(None).await;
        self.queue.clear();
        self.set_state(ConnectionState::Disconnected);
        self.events.emit(GatewayEvent::Disconnected { gateway_id: self.id.clone(), reason: None, at: Utc::now() });
        if terminal {
            ConnectedOutcome::Terminal
        } else {
            ConnectedOutcome::ExplicitDisconnect
        }
    }

    async fn handle_command(&mut self, sink: &mut WsStream, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Send(body) => {
                self.send_or_queue(sink, body).await;
                self.drain_queue(sink).await;
            }
            SessionCommand::SendPostLogin => {
                self.set_state(ConnectionState::Authenticating);
                let body = RequestBody::PostLogin(PostLoginData {
                    email: self.descriptor.username.clone(),
                    password: self.descriptor.password.clone(),
                });
                self.send_or_queue(sink, body).await;
            }
            SessionCommand::SendPostSubAndGetDyn => {
                self.send_or_queue(sink, RequestBody::PostSubChanges(EmptyData {})).await;
                self.send_or_queue(sink, RequestBody::GetDyn(SerialsFilter::default())).await;
                self.drain_queue(sink).await;
            }
            SessionCommand::SendAutoBatt(serial) => {
                self.send_or_queue(sink, RequestBody::TakeDynBatt(SerialRequest { serial })).await;
            }
            SessionCommand::Disconnect(_) => return true,
        }
        false
    }

    /// Drive one connected socket's lifetime until it closes or an
    /// explicit disconnect/terminal error ends the session.
    async fn run_connected(
        &mut self,
        mut ws: WsStream,
        command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>,
        cancel: &CancellationToken,
    ) -> ConnectedOutcome {
        self.set_state(ConnectionState::Connected);
        self.events.emit(GatewayEvent::Connected { gateway_id: self.id.clone(), at: Utc::now() });
        self.spawn_delayed(POST_OPEN_DELAY, SessionCommand::SendPostLogin);

        let keep_alive = self.config.keep_alive_interval();
        let mut keep_alive_tick = tokio::time::interval(keep_alive);
        keep_alive_tick.tick().await; // first tick fires immediately; skip it.

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return ConnectedOutcome::ExplicitDisconnect,
                _ = keep_alive_tick.tick() => {
                    debug!(gateway_id = %self.id, "keep-alive tick");
                }
                command = command_rx.recv() => {
                    match command {
                        Some(command) => {
                            let should_exit = self.handle_command(&mut ws, command).await;
                            if should_exit {
                                let terminal = self.state() == ConnectionState::Error;
                                return self.terminate(&mut ws, terminal).await;
                            }
                            if self.state() == ConnectionState::Error {
                                return self.terminate(&mut ws, true).await;
                            }
                        }
                        None => return ConnectedOutcome::ExplicitDisconnect,
                    }
                }
                frame = ws.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match crate::protocol::parse_response_body(&text) {
                                Ok(inbound) => self.handle_inbound(&mut ws, inbound).await,
                                Err(err) => self.record_error(err),
                            }
                            if self.state() == ConnectionState::Error {
                                return self.terminate(&mut ws, true).await;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            return ConnectedOutcome::AbnormalClose;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            self.record_error(GatewayError::Transport(err.to_string()));
                            return ConnectedOutcome::AbnormalClose;
                        }
                    }
                }
            }
        }
    }
}

/// Run a session end to end: connect, authenticate, drive frames, and
/// reconnect on unexpected close up to the configured budget (spec.md
/// §4.1).
pub async fn run_session(
    id: String,
    descriptor: GatewayDescriptor,
    config: GatewayManagerConfig,
    store: Arc<ReadingStore>,
    events: EventBus,
    state_tx: watch::Sender<ConnectionState>,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    cancel: CancellationToken,
) {
    let mut session = Session {
        id: id.clone(),
        descriptor,
        config,
        store,
        events,
        state_tx,
        command_tx,
        queue: VecDeque::new(),
        reconnect_attempts: 0,
    };

    session.set_state(ConnectionState::Connecting);

    loop {
        let connect_result = tokio::select! {
            _ = cancel.cancelled() => return,
            result = connect_async(&session.descriptor.url) => result,
        };

        let ws = match connect_result {
            Ok((ws, _response)) => {
                session.reconnect_attempts = 0;
                ws
            }
            Err(err) => {
                session.record_error(GatewayError::Transport(err.to_string()));
                if !reconnect_or_stop(&mut session, &cancel).await {
                    return;
                }
                continue;
            }
        };

        // Drain any messages queued before the socket opened (scenario 3),
        // gated the same way as live sends once state allows it.
        match session.run_connected(ws, &mut command_rx, &cancel).await {
            ConnectedOutcome::ExplicitDisconnect | ConnectedOutcome::Terminal => return,
            ConnectedOutcome::AbnormalClose => {
                if !reconnect_or_stop(&mut session, &cancel).await {
                    return;
                }
            }
        }
    }
}

/// Schedule the next reconnect attempt, or report that the budget is
/// exhausted (spec.md §4.1 "Reconnect", §8 I5 and scenario 5).
async fn reconnect_or_stop(session: &mut Session, cancel: &CancellationToken) -> bool {
    if session.reconnect_attempts >= session.config.max_reconnect_attempts {
        info!(gateway_id = %session.id, "reconnect budget exhausted");
        session.set_state(ConnectionState::Disconnected);
        return false;
    }
    let delay = session.config.backoff_delay(session.reconnect_attempts);
    session.reconnect_attempts += 1;
    session.set_state(ConnectionState::Connecting);
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = sleep(delay) => true,
    }
}
