//! JSONL pointer event log.
//!
//! The first line is the `# `-prefixed [`EventLogHeader`], each following
//! line one [`PointerEvent`]. Output is buffered and pushed through every
//! [`FLUSH_EVERY`] events, on [`EventWriter::flush`], and on drop.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cursorcast_common::error::{CursorcastError, CursorcastResult};
use cursorcast_trace_model::event::{EventLogHeader, PointerEvent};

/// Events between automatic flushes.
pub const FLUSH_EVERY: u64 = 1000;

/// Streams pointer events into a log sink.
pub struct EventWriter<W: Write = BufWriter<File>> {
    sink: W,
    events_written: u64,
}

impl EventWriter {
    /// Create or truncate the log at `path`, creating parent directories.
    pub fn create(path: &Path, header: &EventLogHeader) -> CursorcastResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        tracing::debug!(path = %path.display(), "Event log created");
        Self::with_header(BufWriter::new(file), header)
    }
}

impl<W: Write> EventWriter<W> {
    /// Start a log on `sink` by writing its header line.
    pub fn with_header(mut sink: W, header: &EventLogHeader) -> CursorcastResult<Self> {
        sink.write_all(b"# ").map_err(|e| write_failed("header", e))?;
        serde_json::to_writer(&mut sink, header)?;
        sink.write_all(b"\n").map_err(|e| write_failed("header", e))?;

        Ok(Self {
            sink,
            events_written: 0,
        })
    }

    /// Append one event line.
    pub fn write_event(&mut self, event: &PointerEvent) -> CursorcastResult<()> {
        serde_json::to_writer(&mut self.sink, event)?;
        self.sink
            .write_all(b"\n")
            .map_err(|e| write_failed("event", e))?;
        self.events_written += 1;

        if self.events_written % FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> CursorcastResult<()> {
        self.sink
            .flush()
            .map_err(|e| CursorcastError::input_tracking(format!("Failed to flush events: {e}")))
    }

    pub fn events_written(&self) -> u64 {
        self.events_written
    }
}

impl<W: Write> Drop for EventWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.sink.flush() {
            tracing::warn!(error = %e, "Event log flush on close failed");
        }
    }
}

fn write_failed(what: &str, e: std::io::Error) -> CursorcastError {
    CursorcastError::input_tracking(format!("Failed to write {what}: {e}"))
}
