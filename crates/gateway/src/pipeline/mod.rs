// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Vibration waveform pipeline: acceleration ↔ velocity ↔ displacement and
//! FFT, with per-(reading, axis) memoization (spec.md §4.4).

mod cache;
mod fft;
mod transform;
mod waveform;

use std::fmt;

pub use cache::WaveformPipeline;
pub use fft::fft;
pub use transform::{differentiate, integrate};
pub use waveform::{vibration_array_to_waveform, Axis, FftResult, Unit, VibrationWaveform, WaveformPoint};

/// An illegal waveform transform was requested (spec.md §7, `PipelineError`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineError(pub String);

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipeline error: {}", self.0)
    }
}

impl std::error::Error for PipelineError {}

impl From<PipelineError> for crate::error::GatewayError {
    fn from(err: PipelineError) -> Self {
        crate::error::GatewayError::Pipeline(err.0)
    }
}
