// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Numerical integration/differentiation along the `g ↔ m/s ↔ m` unit
//! ladder (spec.md §4.4).

use super::waveform::{Unit, VibrationWaveform, WaveformPoint};
use super::PipelineError;

/// Standard gravity, used when converting between `g` and SI units on the
/// boundary step of the integration/differentiation ladder.
const STANDARD_GRAVITY: f64 = 9.80665;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Integrate acceleration into velocity, or velocity into displacement
/// (spec.md §4.4, `integrate`). Trapezoidal cumulative integral with the
/// mean removed before integrating; the `g → m/s` step applies the
/// standard-gravity conversion.
pub fn integrate(waveform: &VibrationWaveform) -> Result<VibrationWaveform, PipelineError> {
    let next_unit = match waveform.unit {
        Unit::Acceleration => Unit::Velocity,
        Unit::Velocity => Unit::Displacement,
        Unit::Displacement => {
            return Err(PipelineError("cannot integrate a displacement waveform further".to_string()))
        }
    };

    let values = waveform.values();
    let demeaned: Vec<f64> = {
        let m = mean(&values);
        values.iter().map(|v| v - m).collect()
    };
    let scaled: Vec<f64> = if waveform.unit == Unit::Acceleration {
        demeaned.iter().map(|v| v * STANDARD_GRAVITY).collect()
    } else {
        demeaned
    };

    let dt = 1.0 / waveform.sample_rate;
    let mut integral = Vec::with_capacity(scaled.len());
    let mut acc = 0.0;
    for (i, &value) in scaled.iter().enumerate() {
        if i > 0 {
            acc += (scaled[i - 1] + value) / 2.0 * dt;
        }
        integral.push(acc);
    }

    let data = waveform
        .data
        .iter()
        .zip(integral)
        .map(|(p, value)| WaveformPoint { time: p.time, value })
        .collect();

    Ok(VibrationWaveform { axis: waveform.axis, sample_rate: waveform.sample_rate, data, unit: next_unit })
}

/// Differentiate displacement into velocity, or velocity into acceleration
/// (spec.md §4.4, `differentiate`). Central finite difference with
/// one-sided extrapolation at the endpoints; the `m/s → g` step undoes the
/// standard-gravity conversion.
pub fn differentiate(waveform: &VibrationWaveform) -> Result<VibrationWaveform, PipelineError> {
    let previous_unit = match waveform.unit {
        Unit::Displacement => Unit::Velocity,
        Unit::Velocity => Unit::Acceleration,
        Unit::Acceleration => {
            return Err(PipelineError("cannot differentiate an acceleration waveform further".to_string()))
        }
    };

    let values = waveform.values();
    let n = values.len();
    let dt = 1.0 / waveform.sample_rate;
    let mut derivative = vec![0.0; n];
    for i in 0..n {
        derivative[i] = if n < 2 {
            0.0
        } else if i == 0 {
            (values[1] - values[0]) / dt
        } else if i == n - 1 {
            (values[n - 1] - values[n - 2]) / dt
        } else {
            (values[i + 1] - values[i - 1]) / (2.0 * dt)
        };
    }

    if previous_unit == Unit::Acceleration {
        for value in derivative.iter_mut() {
            *value /= STANDARD_GRAVITY;
        }
    }

    let data = waveform
        .data
        .iter()
        .zip(derivative)
        .map(|(p, value)| WaveformPoint { time: p.time, value })
        .collect();

    Ok(VibrationWaveform { axis: waveform.axis, sample_rate: waveform.sample_rate, data, unit: previous_unit })
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
