// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client → server request union (spec.md §6.1).

use serde::{Deserialize, Serialize};

/// `POST_LOGIN` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostLoginData {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password: String,
}

/// Payload for requests that carry no data (`POST_SUB_CHANGES`,
/// `POST_UNSUB_CHANGES`, `GET_DYN_CONNECTED`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyData {}

/// `GET_DYN` payload: an optional serial allowlist, otherwise the full
/// sensor set is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialsFilter {
    #[serde(rename = "Serials", skip_serializing_if = "Option::is_none")]
    pub serials: Option<Vec<i64>>,
}

/// Shared shape of the three `TAKE_DYN_*` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialRequest {
    #[serde(rename = "Serial")]
    pub serial: i64,
}

/// Shared shape of the three `GET_DYN_{READINGS,TEMPS,BATTS}` history
/// requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "Serials", skip_serializing_if = "Option::is_none")]
    pub serials: Option<Vec<i64>>,
    #[serde(rename = "Start", skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(rename = "End", skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(rename = "Max", skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

/// The closed set of client-originated requests (spec.md §6.1, "Client →
/// Server requests"). Adjacently tagged on `Type`/`Data`, matching the wire
/// envelope once flattened into [`OutboundEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Data")]
pub enum RequestBody {
    #[serde(rename = "POST_LOGIN")]
    PostLogin(PostLoginData),
    #[serde(rename = "POST_SUB_CHANGES")]
    PostSubChanges(EmptyData),
    #[serde(rename = "POST_UNSUB_CHANGES")]
    PostUnsubChanges(EmptyData),
    #[serde(rename = "GET_DYN")]
    GetDyn(SerialsFilter),
    #[serde(rename = "GET_DYN_CONNECTED")]
    GetDynConnected(EmptyData),
    #[serde(rename = "TAKE_DYN_READING")]
    TakeDynReading(SerialRequest),
    #[serde(rename = "TAKE_DYN_TEMP")]
    TakeDynTemp(SerialRequest),
    #[serde(rename = "TAKE_DYN_BATT")]
    TakeDynBatt(SerialRequest),
    #[serde(rename = "GET_DYN_READINGS")]
    GetDynReadings(HistoryQuery),
    #[serde(rename = "GET_DYN_TEMPS")]
    GetDynTemps(HistoryQuery),
    #[serde(rename = "GET_DYN_BATTS")]
    GetDynBatts(HistoryQuery),
}

impl RequestBody {
    /// The wire `Type` discriminator, used by the outbound queue gate to
    /// decide readiness without a full round-trip through serde.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::PostLogin(_) => "POST_LOGIN",
            Self::PostSubChanges(_) => "POST_SUB_CHANGES",
            Self::PostUnsubChanges(_) => "POST_UNSUB_CHANGES",
            Self::GetDyn(_) => "GET_DYN",
            Self::GetDynConnected(_) => "GET_DYN_CONNECTED",
            Self::TakeDynReading(_) => "TAKE_DYN_READING",
            Self::TakeDynTemp(_) => "TAKE_DYN_TEMP",
            Self::TakeDynBatt(_) => "TAKE_DYN_BATT",
            Self::GetDynReadings(_) => "GET_DYN_READINGS",
            Self::GetDynTemps(_) => "GET_DYN_TEMPS",
            Self::GetDynBatts(_) => "GET_DYN_BATTS",
        }
    }
}

/// The full outbound envelope, `{Type, From, To, Data}` (spec.md §3,
/// "Message"). `Type`/`Data` come from the flattened [`RequestBody`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEnvelope {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(flatten)]
    pub body: RequestBody,
}

impl OutboundEnvelope {
    /// Wrap a request body as a client-originated envelope
    /// (`From="UI", To="SERV"`, spec.md §3).
    pub fn new(body: RequestBody) -> Self {
        Self { from: "UI".to_string(), to: "SERV".to_string(), body }
    }

    pub fn type_name(&self) -> &'static str {
        self.body.type_name()
    }

    /// Serialize to the wire JSON text form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
