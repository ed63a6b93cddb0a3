// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-sided FFT magnitude spectrum (spec.md §4.4, `fft`).

use rustfft::{num_complex::Complex64, FftPlanner};

use super::waveform::{FftResult, VibrationWaveform};

/// Compute the one-sided magnitude spectrum of a waveform: length `N/2`
/// over `[0, sampleRate/2]` (spec.md §4.4, §8 scenario 6).
pub fn fft(waveform: &VibrationWaveform) -> FftResult {
    let n = waveform.len();
    if n < 2 {
        return FftResult { frequencies: Vec::new(), magnitudes: Vec::new() };
    }

    let mut buffer: Vec<Complex64> = waveform.values().into_iter().map(|v| Complex64::new(v, 0.0)).collect();

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let plan = planner.plan_fft_forward(n);
    plan.process(&mut buffer);

    let half = n / 2;
    let mut frequencies = Vec::with_capacity(half);
    let mut magnitudes = Vec::with_capacity(half);
    for (k, bin) in buffer.iter().take(half).enumerate() {
        frequencies.push(k as f64 * waveform.sample_rate / n as f64);
        let scale = if k == 0 { 1.0 / n as f64 } else { 2.0 / n as f64 };
        magnitudes.push(bin.norm() * scale);
    }

    FftResult { frequencies, magnitudes }
}

#[cfg(test)]
#[path = "fft_tests.rs"]
mod tests;
