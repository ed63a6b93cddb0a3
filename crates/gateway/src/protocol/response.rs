// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server → client response/notification union and the two-step inbound
//! parsing algorithm (spec.md §4.2, §6.1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

use super::reading::{BatteryReading, TemperatureReading, VibrationReadingWire};
use super::sensor::Sensor;

/// `RTN_LOGIN` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtnLoginData {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "First", default)]
    pub first: Option<String>,
    #[serde(rename = "Last", default)]
    pub last: Option<String>,
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "AccessLevel", default)]
    pub access_level: Option<String>,
    #[serde(rename = "Verified", default)]
    pub verified: Option<bool>,
}

/// `RTN_ERR` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtnErrData {
    #[serde(rename = "Attempt")]
    pub attempt: String,
    #[serde(rename = "Error")]
    pub error: String,
}

/// `NOT_DYN_CONN` payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotDynConnData {
    #[serde(rename = "Serial")]
    pub serial: i64,
    #[serde(rename = "Connected")]
    pub connected: bool,
}

/// `NOT_AP_CONN` payload. `Connected` is an int on this notification
/// specifically (spec.md §6.1), unlike `NOT_DYN_CONN`'s bool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotApConnData {
    #[serde(rename = "Serial")]
    pub serial: i64,
    #[serde(rename = "Connected")]
    pub connected: i64,
}

/// `NOT_DYN_READING_STARTED` payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotDynReadingStartedData {
    #[serde(rename = "Serial")]
    pub serial: i64,
    #[serde(rename = "Success")]
    pub success: bool,
}

/// The closed set of server-originated responses and notifications
/// (spec.md §6.1, "Server → Client responses and notifications").
/// Adjacently tagged on `Type`/`Data`; parsed from a reconstructed
/// `{Type, Data}` value rather than the full envelope (see
/// [`parse_response_body`]) so the extra `From`/`Target` envelope fields
/// never interfere with the tagged-enum deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Data")]
pub enum ResponseBody {
    #[serde(rename = "RTN_LOGIN")]
    RtnLogin(RtnLoginData),
    #[serde(rename = "RTN_ERR")]
    RtnErr(RtnErrData),
    #[serde(rename = "RTN_DYN")]
    RtnDyn(Vec<Sensor>),
    #[serde(rename = "RTN_DYN_READINGS")]
    RtnDynReadings(Vec<VibrationReadingWire>),
    #[serde(rename = "RTN_DYN_TEMPS")]
    RtnDynTemps(Vec<TemperatureReading>),
    #[serde(rename = "RTN_DYN_BATTS")]
    RtnDynBatts(Vec<BatteryReading>),
    #[serde(rename = "NOT_DYN_CONN")]
    NotDynConn(NotDynConnData),
    #[serde(rename = "NOT_AP_CONN")]
    NotApConn(NotApConnData),
    #[serde(rename = "NOT_DYN_READING_STARTED")]
    NotDynReadingStarted(NotDynReadingStartedData),
    #[serde(rename = "NOT_DYN_READING")]
    NotDynReading(HashMap<String, VibrationReadingWire>),
    #[serde(rename = "NOT_DYN_TEMP")]
    NotDynTemp(HashMap<String, TemperatureReading>),
    #[serde(rename = "NOT_DYN_BATT")]
    NotDynBatt(HashMap<String, BatteryReading>),
}

impl ResponseBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RtnLogin(_) => "RTN_LOGIN",
            Self::RtnErr(_) => "RTN_ERR",
            Self::RtnDyn(_) => "RTN_DYN",
            Self::RtnDynReadings(_) => "RTN_DYN_READINGS",
            Self::RtnDynTemps(_) => "RTN_DYN_TEMPS",
            Self::RtnDynBatts(_) => "RTN_DYN_BATTS",
            Self::NotDynConn(_) => "NOT_DYN_CONN",
            Self::NotApConn(_) => "NOT_AP_CONN",
            Self::NotDynReadingStarted(_) => "NOT_DYN_READING_STARTED",
            Self::NotDynReading(_) => "NOT_DYN_READING",
            Self::NotDynTemp(_) => "NOT_DYN_TEMP",
            Self::NotDynBatt(_) => "NOT_DYN_BATT",
        }
    }
}

/// A validated envelope that did not match any known response variant.
/// Delivered to the generic `message` event so forward-compatible `Type`
/// values degrade gracefully instead of being dropped (spec.md §4.2 step 3).
#[derive(Debug, Clone, PartialEq)]
pub struct RawEnvelope {
    pub ty: String,
    pub from: String,
    pub to: Option<String>,
    pub target: Option<String>,
    pub data: Value,
}

/// Result of the two-step inbound parse: either a known, typed response, or
/// a validated-but-unrecognized envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Typed(ResponseBody),
    Raw(RawEnvelope),
}

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    #[serde(rename = "Type")]
    ty: Value,
    #[serde(rename = "From")]
    from: Value,
    #[serde(rename = "To", default)]
    to: Option<Value>,
    #[serde(rename = "Target", default)]
    target: Option<Value>,
    #[serde(rename = "Data", default)]
    data: Value,
}

/// Parse and dispatch one inbound frame (spec.md §4.2 "Inbound algorithm").
///
/// 1. Parse JSON — failure is a [`GatewayError::Parse`], the session stays
///    up.
/// 2. Validate the envelope shape `{Type:string, From:string, To?, Target?,
///    Data}` — failure is a [`GatewayError::Schema`].
/// 3. Attempt typed validation against the response union; on no match,
///    still return the raw envelope rather than erroring.
pub fn parse_response_body(text: &str) -> Result<InboundFrame, GatewayError> {
    let envelope: WireEnvelope =
        serde_json::from_str(text).map_err(|e| GatewayError::Parse(e.to_string()))?;

    let ty = match envelope.ty {
        Value::String(s) => s,
        other => return Err(GatewayError::Schema(format!("Type must be a string, got {other}"))),
    };
    let from = match envelope.from {
        Value::String(s) => s,
        other => return Err(GatewayError::Schema(format!("From must be a string, got {other}"))),
    };
    let to = match envelope.to {
        Some(Value::String(s)) => Some(s),
        Some(other) => return Err(GatewayError::Schema(format!("To must be a string, got {other}"))),
        None => None,
    };
    let target = match envelope.target {
        Some(Value::String(s)) => Some(s),
        Some(other) => return Err(GatewayError::Schema(format!("Target must be a string, got {other}"))),
        None => None,
    };

    let reconstructed = serde_json::json!({ "Type": ty, "Data": envelope.data });
    match serde_json::from_value::<ResponseBody>(reconstructed) {
        Ok(body) => Ok(InboundFrame::Typed(body)),
        Err(_) => Ok(InboundFrame::Raw(RawEnvelope { ty, from, to, target, data: envelope.data })),
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
