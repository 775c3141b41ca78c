//! JSON-lines event log.
//!
//! Format: one `{"user_id": <id>, "event": {...}}` object per line, in the
//! order the actions happened. Blank lines are skipped.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use taste_model::{TasteEvent, UserId};

/// One recorded user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub user_id: UserId,
    pub event: TasteEvent,
}

/// Parse an event log from any buffered reader
pub fn parse_event_log<R: BufRead>(reader: R) -> Result<Vec<LoggedEvent>> {
    let mut events = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let event = serde_json::from_str::<LoggedEvent>(line_trimmed).map_err(|e| {
            StoreError::EventLog {
                line: line_no,
                reason: e.to_string(),
            }
        })?;
        events.push(event);
    }

    Ok(events)
}

/// Read an event log file
pub fn read_event_log(path: &Path) -> Result<Vec<LoggedEvent>> {
    let file = File::open(path)?;
    parse_event_log(BufReader::new(file))
}

/// Write events as JSON lines
pub fn write_event_log<W: Write>(mut writer: W, events: &[LoggedEvent]) -> Result<()> {
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
