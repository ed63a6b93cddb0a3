// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire schema and codec: discriminated request/response unions, serial and
//! time coercion helpers, and the two-step inbound parsing algorithm
//! (spec.md §4.2, §6.1).

pub mod reading;
pub mod request;
pub mod response;
pub mod sensor;
pub mod serial;
pub mod time;

pub use reading::{BatteryReading, DetailedVibrationReading, TemperatureReading, VibrationReadingSimple, VibrationReadingWire};
pub use request::{OutboundEnvelope, RequestBody};
pub use response::{parse_response_body, InboundFrame, RawEnvelope, ResponseBody};
pub use sensor::Sensor;
