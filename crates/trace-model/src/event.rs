//! Raw pointer events as produced by a live source.
//!
//! Events are recorded in append-only JSONL format for crash safety. A log
//! may start with `#`-prefixed header lines, which readers skip.

use serde::{Deserialize, Serialize};

use crate::point::{Point, TimestampMs};

/// A single pointer event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Milliseconds since capture start.
    pub t: TimestampMs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: PointerEventKind,
}

/// Discriminated union of pointer event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer position update.
    Move { x: f64, y: f64 },

    /// A button was pressed; ends the current stroke.
    Down,

    /// A button was released; ends the current stroke.
    Up,
}

/// Header line written at the top of an event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at capture start (RFC 3339).
    pub epoch_wall: String,

    /// Name of the source that produced the events.
    pub source: String,
}

impl PointerEvent {
    /// Create a move event.
    pub fn moved(t: TimestampMs, x: f64, y: f64) -> Self {
        Self {
            t,
            kind: PointerEventKind::Move { x, y },
        }
    }

    /// Create a button-press event.
    pub fn down(t: TimestampMs) -> Self {
        Self {
            t,
            kind: PointerEventKind::Down,
        }
    }

    /// Create a button-release event.
    pub fn up(t: TimestampMs) -> Self {
        Self {
            t,
            kind: PointerEventKind::Up,
        }
    }

    /// The sample carried by a move event.
    pub fn point(&self) -> Option<Point> {
        match self.kind {
            PointerEventKind::Move { x, y } => Some(Point::new(x, y, self.t)),
            _ => None,
        }
    }
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<PointerEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[PointerEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
