// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waveform and spectrum types shared across the pipeline (spec.md §3).

use serde::{Deserialize, Serialize};

/// A sensor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// Physical unit of a waveform's samples, and the three-step ladder
/// `g ↔ m/s ↔ m` that `integrate`/`differentiate` walk (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Acceleration, in g.
    Acceleration,
    /// Velocity, in m/s.
    Velocity,
    /// Displacement, in m.
    Displacement,
}

/// One sample of a waveform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformPoint {
    pub time: f64,
    pub value: f64,
}

/// A time-domain waveform for one axis of one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibrationWaveform {
    pub axis: Axis,
    pub sample_rate: f64,
    pub data: Vec<WaveformPoint>,
    pub unit: Unit,
}

impl VibrationWaveform {
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One-sided magnitude spectrum of a waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FftResult {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

/// Build a raw acceleration waveform from a sample array, the entry point
/// into the pipeline (spec.md §4.4, `vibrationArrayToWaveform`).
pub fn vibration_array_to_waveform(samples: &[f64], sample_rate: f64, axis: Axis) -> VibrationWaveform {
    let data = samples
        .iter()
        .enumerate()
        .map(|(i, &value)| WaveformPoint { time: i as f64 / sample_rate, value })
        .collect();
    VibrationWaveform { axis, sample_rate, data, unit: Unit::Acceleration }
}
