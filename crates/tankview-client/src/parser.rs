//! Telemetry payload decoding.
//!
//! The server pushes JSON objects with five required numeric fields:
//! `inflow`, `height`, `set_level`, `level`, `outflow`.  Anything that is
//! not valid JSON (or not an object) is a [`TankError::MalformedPayload`];
//! an absent or non-numeric field is a [`TankError::MissingField`].  A
//! failed parse drops the frame and leaves the display untouched.

use serde_json::{Map, Value};
use tankview_types::{TankError, TelemetryFrame};

/// Decode one raw text payload into a validated [`TelemetryFrame`].
pub fn parse_frame(payload: &str) -> Result<TelemetryFrame, TankError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| TankError::MalformedPayload(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| TankError::MalformedPayload("payload is not a JSON object".to_string()))?;

    Ok(TelemetryFrame {
        inflow: numeric_field(obj, "inflow")?,
        height: numeric_field(obj, "height")?,
        set_level: numeric_field(obj, "set_level")?,
        level: numeric_field(obj, "level")?,
        outflow: numeric_field(obj, "outflow")?,
    })
}

fn numeric_field(obj: &Map<String, Value>, name: &str) -> Result<f32, TankError> {
    obj.get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .ok_or_else(|| TankError::MissingField(name.to_string()))
}
