// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-gateway keyed reading store (spec.md §4.3).
//!
//! Each kind of data (sensors, vibration, vibration-detailed, temperature,
//! battery) lives behind its own `Arc` swap so that a mutation to one kind
//! produces a fresh top-level reference for that kind without disturbing
//! the others, letting downstream observers compare snapshots by identity.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::protocol::serial;
use crate::protocol::{
    BatteryReading, DetailedVibrationReading, Sensor, TemperatureReading, VibrationReadingSimple, VibrationReadingWire,
};

type SensorList = Arc<Vec<Sensor>>;
type ReadingMap<T> = Arc<HashMap<i64, T>>;

#[derive(Debug)]
struct GatewayState {
    sensors: RwLock<SensorList>,
    vibration: RwLock<ReadingMap<VibrationReadingSimple>>,
    vibration_detailed: RwLock<ReadingMap<DetailedVibrationReading>>,
    temperature: RwLock<ReadingMap<TemperatureReading>>,
    battery: RwLock<ReadingMap<BatteryReading>>,
}

impl Default for GatewayState {
    fn default() -> Self {
        Self {
            sensors: RwLock::new(Arc::new(Vec::new())),
            vibration: RwLock::new(Arc::new(HashMap::new())),
            vibration_detailed: RwLock::new(Arc::new(HashMap::new())),
            temperature: RwLock::new(Arc::new(HashMap::new())),
            battery: RwLock::new(Arc::new(HashMap::new())),
        }
    }
}

/// Upsert one entry into a kind's map, swapping in a fresh `Arc` so holders
/// of the previous snapshot keep observing the old state (spec.md §4.3,
/// "Change propagation").
fn upsert<T: Clone>(lock: &RwLock<ReadingMap<T>>, id: i64, value: T) {
    let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut next: HashMap<i64, T> = (**guard).clone();
    next.insert(id, value);
    *guard = Arc::new(next);
}

/// The authoritative, mutable reading store. Owned by the session manager;
/// not exposed to read-only consumers, which use [`ReadingStoreView`]
/// instead.
#[derive(Debug, Default)]
pub struct ReadingStore {
    gateways: RwLock<HashMap<String, Arc<GatewayState>>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, gateway_id: &str) -> Arc<GatewayState> {
        if let Some(state) = self.gateways.read().unwrap_or_else(|p| p.into_inner()).get(gateway_id) {
            return state.clone();
        }
        let mut guard = self.gateways.write().unwrap_or_else(|p| p.into_inner());
        guard.entry(gateway_id.to_string()).or_default().clone()
    }

    /// Replace the full sensor list for a gateway (`RTN_DYN` is
    /// authoritative — spec.md §4.3, "Sensor list replacement is
    /// whole-list").
    pub fn replace_sensors(&self, gateway_id: &str, sensors: Vec<Sensor>) {
        let state = self.state(gateway_id);
        let mut guard = state.sensors.write().unwrap_or_else(|p| p.into_inner());
        *guard = Arc::new(sensors);
    }

    /// Upsert one or more vibration readings. Detailed readings also
    /// materialize a simple-vibration view from their peak magnitudes
    /// (spec.md §4.3, B2).
    pub fn upsert_vibration(&self, gateway_id: &str, readings: impl IntoIterator<Item = VibrationReadingWire>) {
        let state = self.state(gateway_id);
        for reading in readings {
            let simple = reading.as_simple();
            upsert(&state.vibration, simple.id, simple);
            if let VibrationReadingWire::Detailed(detailed) = reading {
                upsert(&state.vibration_detailed, detailed.id, detailed);
            }
        }
    }

    /// Upsert one or more temperature readings.
    pub fn upsert_temperature(&self, gateway_id: &str, readings: impl IntoIterator<Item = TemperatureReading>) {
        let state = self.state(gateway_id);
        for reading in readings {
            upsert(&state.temperature, reading.id, reading);
        }
    }

    /// Upsert one or more battery readings.
    pub fn upsert_battery(&self, gateway_id: &str, readings: impl IntoIterator<Item = BatteryReading>) {
        let state = self.state(gateway_id);
        for reading in readings {
            upsert(&state.battery, reading.id, reading);
        }
    }

    pub fn sensors(&self, gateway_id: &str) -> SensorList {
        self.state(gateway_id).sensors.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn vibration(&self, gateway_id: &str) -> ReadingMap<VibrationReadingSimple> {
        self.state(gateway_id).vibration.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn vibration_detailed(&self, gateway_id: &str) -> ReadingMap<DetailedVibrationReading> {
        self.state(gateway_id).vibration_detailed.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn temperature(&self, gateway_id: &str) -> ReadingMap<TemperatureReading> {
        self.state(gateway_id).temperature.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn battery(&self, gateway_id: &str) -> ReadingMap<BatteryReading> {
        self.state(gateway_id).battery.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Sensors whose `Serial` matches, comparing both sides as strings
    /// (spec.md B3).
    pub fn sensors_by_serial(&self, gateway_id: &str, wanted: &str) -> Vec<Sensor> {
        let wanted = serial::normalize(wanted);
        self.sensors(gateway_id).iter().filter(|s| serial::normalize(s.serial) == wanted).cloned().collect()
    }
}

/// Read-only facade over a [`ReadingStore`], the interface an outer UI
/// layer is meant to consume (spec.md §1, §4.3 "Read API").
#[derive(Clone)]
pub struct ReadingStoreView {
    inner: Arc<ReadingStore>,
}

impl ReadingStoreView {
    pub fn new(inner: Arc<ReadingStore>) -> Self {
        Self { inner }
    }

    pub fn sensors(&self, gateway_id: &str) -> SensorList {
        self.inner.sensors(gateway_id)
    }

    pub fn vibration(&self, gateway_id: &str) -> ReadingMap<VibrationReadingSimple> {
        self.inner.vibration(gateway_id)
    }

    pub fn vibration_detailed(&self, gateway_id: &str) -> ReadingMap<DetailedVibrationReading> {
        self.inner.vibration_detailed(gateway_id)
    }

    pub fn temperature(&self, gateway_id: &str) -> ReadingMap<TemperatureReading> {
        self.inner.temperature(gateway_id)
    }

    pub fn battery(&self, gateway_id: &str) -> ReadingMap<BatteryReading> {
        self.inner.battery(gateway_id)
    }

    pub fn sensors_by_serial(&self, gateway_id: &str, wanted: &str) -> Vec<Sensor> {
        self.inner.sensors_by_serial(gateway_id, wanted)
    }
}

#[cfg(test)]
#[path = "reading_store_tests.rs"]
mod tests;
