// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime sensor view, as carried by `RTN_DYN` (spec.md §3).

use serde::{Deserialize, Serialize};

use super::serial::{serial_as_i64, truthy};

/// A single sensor as reported by a gateway. Identity is `serial` within
/// the owning gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(rename = "Serial", deserialize_with = "serial_as_i64")]
    pub serial: i64,
    #[serde(rename = "Connected", deserialize_with = "truthy")]
    pub connected: bool,
    #[serde(rename = "AccessPoint", default)]
    pub access_point: Option<String>,
    #[serde(rename = "PartNum", default)]
    pub part_num: Option<String>,
    #[serde(rename = "ReadRate", default)]
    pub read_rate: Option<i64>,
    #[serde(rename = "GMode", default)]
    pub g_mode: Option<i64>,
    #[serde(rename = "FreqMode", default)]
    pub freq_mode: Option<i64>,
    #[serde(rename = "Coupling", default)]
    pub coupling: Option<String>,
    #[serde(rename = "ReadPeriod", default)]
    pub read_period: Option<i64>,
    #[serde(rename = "Samples", default)]
    pub samples: Option<i64>,
    #[serde(rename = "Fs", default)]
    pub fs: Option<f64>,
    #[serde(rename = "Fmax", default)]
    pub fmax: Option<f64>,
    #[serde(rename = "HwVer", default)]
    pub hw_ver: Option<String>,
    #[serde(rename = "FmVer", default)]
    pub fm_ver: Option<String>,
    #[serde(rename = "Machine", default)]
    pub machine: Option<String>,
    #[serde(rename = "Early", default)]
    pub early: Option<f64>,
    #[serde(rename = "Crit", default)]
    pub crit: Option<f64>,
    #[serde(rename = "Nickname", default)]
    pub nickname: Option<String>,
    #[serde(rename = "EarlyUnit", default)]
    pub early_unit: Option<String>,
    #[serde(rename = "CritUnit", default)]
    pub crit_unit: Option<String>,
}
