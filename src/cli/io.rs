//! JSON I/O handling for CLI
//!
//! - Input: a JSON array of event records read from a file
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::event::{is_builtin_axis, Duration, Event, LabelSpec, Scalar};

use super::errors::{CliError, CliResult};

/// One event as written in an event file
#[derive(Debug, Deserialize)]
pub struct EventRecord {
    pub timestamp: f64,
    /// Missing or negative means the event is still going on
    #[serde(default)]
    pub duration: Option<f64>,
    pub label: LabelSpec,
    #[serde(default)]
    pub characteristics: BTreeMap<String, Value>,
}

impl EventRecord {
    /// Convert into an event. Characteristics must be scalars and may not
    /// reuse the built-in `timestamp` or `duration` names.
    pub fn into_event(self) -> CliResult<Event> {
        let duration = self.duration.map_or(Duration::Ongoing, Duration::from_raw);
        let mut event = Event::new(self.timestamp, self.label.to_label()).with_duration(duration);
        for (key, value) in self.characteristics {
            if is_builtin_axis(&key) {
                return Err(CliError::malformed_events(format!(
                    "characteristic '{}' is a built-in axis",
                    key
                )));
            }
            let scalar = Scalar::from_json(&value).ok_or_else(|| {
                CliError::malformed_events(format!("characteristic '{}' is not a scalar", key))
            })?;
            event = event.with_characteristic(key, scalar);
        }
        Ok(event)
    }
}

/// Read an event file
pub fn read_events(path: &Path) -> CliResult<Vec<Event>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read events: {}", e)))?;

    let records: Vec<EventRecord> = serde_json::from_str(&content)
        .map_err(|e| CliError::malformed_events(format!("Invalid events JSON: {}", e)))?;

    records.into_iter().map(EventRecord::into_event).collect()
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
