// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reading kinds: battery, temperature, and vibration (simple or detailed)
//! (spec.md §3).

use serde::{Deserialize, Serialize};

use super::serial::serial_as_string;

/// A battery-level reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Serial", deserialize_with = "serial_as_string")]
    pub serial: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Batt")]
    pub batt: i64,
}

/// A temperature reading, in degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Serial", deserialize_with = "serial_as_string")]
    pub serial: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Temp")]
    pub temp: i64,
}

/// A vibration reading carrying only per-axis summary strings, either
/// received directly or materialized from a [`DetailedVibrationReading`]'s
/// peak values (spec.md §4.3, "ALSO materializes a simple-vibration view").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibrationReadingSimple {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Serial", deserialize_with = "serial_as_string")]
    pub serial: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "X")]
    pub x: String,
    #[serde(rename = "Y")]
    pub y: String,
    #[serde(rename = "Z")]
    pub z: String,
}

/// A vibration reading carrying peak/peak-to-peak/RMS summaries per axis
/// plus the raw time-domain sample arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedVibrationReading {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Serial", deserialize_with = "serial_as_string")]
    pub serial: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Xpk")]
    pub x_pk: f64,
    #[serde(rename = "Ypk")]
    pub y_pk: f64,
    #[serde(rename = "Zpk")]
    pub z_pk: f64,
    #[serde(rename = "Xpp")]
    pub x_pp: f64,
    #[serde(rename = "Ypp")]
    pub y_pp: f64,
    #[serde(rename = "Zpp")]
    pub z_pp: f64,
    #[serde(rename = "Xrms")]
    pub x_rms: f64,
    #[serde(rename = "Yrms")]
    pub y_rms: f64,
    #[serde(rename = "Zrms")]
    pub z_rms: f64,
    #[serde(rename = "X")]
    pub x: Vec<f64>,
    #[serde(rename = "Y")]
    pub y: Vec<f64>,
    #[serde(rename = "Z")]
    pub z: Vec<f64>,
}

impl DetailedVibrationReading {
    /// Materialize the simple-vibration view by taking peak magnitudes as
    /// `X/Y/Z`, so consumers keyed on the simple kind stay consistent
    /// (spec.md B2).
    pub fn to_simple(&self) -> VibrationReadingSimple {
        VibrationReadingSimple {
            id: self.id,
            serial: self.serial.clone(),
            time: self.time.clone(),
            x: self.x_pk.to_string(),
            y: self.y_pk.to_string(),
            z: self.z_pk.to_string(),
        }
    }
}

/// A vibration reading as it arrives on the wire: either detailed (with raw
/// sample arrays) or simple. Detailed is tried first since it's the more
/// constrained shape; plain arrays of numbers would also satisfy the simple
/// variant's string fields only by coincidence, which never happens in
/// practice, so trying detailed first is safe and avoids ambiguity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VibrationReadingWire {
    Detailed(DetailedVibrationReading),
    Simple(VibrationReadingSimple),
}

impl VibrationReadingWire {
    pub fn id(&self) -> i64 {
        match self {
            Self::Detailed(r) => r.id,
            Self::Simple(r) => r.id,
        }
    }

    pub fn serial(&self) -> &str {
        match self {
            Self::Detailed(r) => &r.serial,
            Self::Simple(r) => &r.serial,
        }
    }

    pub fn time(&self) -> &str {
        match self {
            Self::Detailed(r) => &r.time,
            Self::Simple(r) => &r.time,
        }
    }

    /// The simple view of this reading — either itself, or materialized
    /// from a detailed reading's peak values.
    pub fn as_simple(&self) -> VibrationReadingSimple {
        match self {
            Self::Detailed(r) => r.to_simple(),
            Self::Simple(r) => r.clone(),
        }
    }

    pub fn as_detailed(&self) -> Option<&DetailedVibrationReading> {
        match self {
            Self::Detailed(r) => Some(r),
            Self::Simple(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "reading_tests.rs"]
mod tests;
