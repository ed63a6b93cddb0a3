// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Serial` appears as either a JSON number or string on the wire. The codec
//! coerces to a canonical `String` for reading records and keeps an `i64`
//! for sensor identity (spec.md §4.2, "Serial normalization"). `Connected`
//! is similarly polymorphic (bool or int); both are treated as truthy.

use serde::{de, Deserialize, Deserializer};

/// Deserialize a wire `Serial` field (number or string) into an `i64`,
/// used for sensor identity.
pub fn serial_as_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => {
            n.as_i64().ok_or_else(|| de::Error::custom(format!("serial number out of range: {n}")))
        }
        serde_json::Value::String(s) => {
            s.parse::<i64>().map_err(|e| de::Error::custom(format!("invalid serial string {s:?}: {e}")))
        }
        other => Err(de::Error::custom(format!("expected serial number or string, got {other}"))),
    }
}

/// Deserialize a wire `Serial` field (number or string) into a canonical
/// `String`, used for reading records.
pub fn serial_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) => Ok(s),
        other => Err(de::Error::custom(format!("expected serial number or string, got {other}"))),
    }
}

/// Deserialize a `Connected` field that may be a JSON bool or an int, both
/// treated as truthy (spec.md §3, §9 Open Questions).
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
        other => Err(de::Error::custom(format!("expected bool or number for Connected, got {other}"))),
    }
}

/// Normalize any serial-like value (string or int, as already captured in a
/// `Sensor.serial: i64` or a reading's `serial: String`) to a canonical
/// string for filter comparisons (spec.md B3).
pub fn normalize(serial: impl ToString) -> String {
    serial.to_string()
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod tests;
