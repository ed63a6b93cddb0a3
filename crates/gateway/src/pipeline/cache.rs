// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-(reading, axis) memoization for the waveform pipeline (spec.md
//! §4.4, "Cache"). Deliberately not owned by the session manager: the
//! pipeline is a derived, on-demand view, and different consumers may want
//! independent caches.

use std::collections::HashMap;
use std::sync::Mutex;

use super::fft::fft as compute_fft;
use super::transform::integrate;
use super::waveform::{FftResult, VibrationWaveform};
use super::PipelineError;

fn cache_key(reading_id: i64, axis: &str) -> String {
    format!("{reading_id}-{axis}")
}

/// Three memoization maps — velocity, displacement, FFT — keyed by
/// `"{readingId}-{axis}"`. The cache map's own lifetime outlives any single
/// selected reading; memoization across revisits is intentional (spec.md
/// §9, "Cache invalidation").
#[derive(Debug, Default)]
pub struct WaveformPipeline {
    velocity: Mutex<HashMap<String, VibrationWaveform>>,
    displacement: Mutex<HashMap<String, VibrationWaveform>>,
    fft_results: Mutex<HashMap<String, FftResult>>,
}

impl WaveformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Velocity waveform for a reading's axis, computed from the raw
    /// acceleration waveform on first access and cached thereafter.
    pub fn velocity(
        &self,
        reading_id: i64,
        acceleration: &VibrationWaveform,
    ) -> Result<VibrationWaveform, PipelineError> {
        let key = cache_key(reading_id, acceleration.axis.as_str());
        let mut cache = self.velocity.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(cached) = cache.get(&key) {
            return Ok(cached.clone());
        }
        let velocity = integrate(acceleration)?;
        cache.insert(key, velocity.clone());
        Ok(velocity)
    }

    /// Displacement waveform for a reading's axis, built from the cached
    /// (or freshly computed) velocity waveform.
    pub fn displacement(
        &self,
        reading_id: i64,
        acceleration: &VibrationWaveform,
    ) -> Result<VibrationWaveform, PipelineError> {
        let key = cache_key(reading_id, acceleration.axis.as_str());
        {
            let cache = self.displacement.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(cached) = cache.get(&key) {
                return Ok(cached.clone());
            }
        }
        let velocity = self.velocity(reading_id, acceleration)?;
        let displacement = integrate(&velocity)?;
        self.displacement.lock().unwrap_or_else(|p| p.into_inner()).insert(key, displacement.clone());
        Ok(displacement)
    }

    /// FFT of a waveform for a reading's axis. The waveform passed in is
    /// whichever domain the caller wants spectral content for (usually the
    /// raw acceleration waveform).
    pub fn fft(&self, reading_id: i64, waveform: &VibrationWaveform) -> FftResult {
        let key = cache_key(reading_id, waveform.axis.as_str());
        let mut cache = self.fft_results.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(cached) = cache.get(&key) {
            return cached.clone();
        }
        let result = compute_fft(waveform);
        cache.insert(key, result.clone());
        result
    }

    /// Drop every memoized entry. Not part of the documented contract —
    /// the cache map is meant to outlive reading selection — but useful
    /// for tests and for callers that genuinely need to reclaim memory.
    pub fn clear(&self) {
        self.velocity.lock().unwrap_or_else(|p| p.into_inner()).clear();
        self.displacement.lock().unwrap_or_else(|p| p.into_inner()).clear();
        self.fft_results.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
