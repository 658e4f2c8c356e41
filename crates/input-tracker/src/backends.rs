//! Point source implementations.
//!
//! Each source provides a different way to obtain pointer events.

#[cfg(target_os = "linux")]
mod linux;

use std::path::Path;

use cursorcast_common::config::SourceConfig;
use cursorcast_common::error::{CursorcastError, CursorcastResult};
use cursorcast_trace_model::event::{parse_events, PointerEvent};

use crate::PointSource;

#[cfg(target_os = "linux")]
pub use linux::{mice_device_diagnostic, MiceSource};

/// Replays a fixed sequence of events.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    events: Vec<PointerEvent>,
    index: usize,
}

impl ReplaySource {
    /// Create a replay source with pre-loaded events.
    pub fn new(events: Vec<PointerEvent>) -> Self {
        Self { events, index: 0 }
    }

    /// Load a JSONL event log.
    pub fn from_file(path: impl AsRef<Path>) -> CursorcastResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CursorcastError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let events = parse_events(&content)?;
        tracing::debug!(path = %path.display(), events = events.len(), "Loaded replay log");
        Ok(Self::new(events))
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.events.len() - self.index
    }
}

impl PointSource for ReplaySource {
    fn poll(&mut self) -> CursorcastResult<Option<PointerEvent>> {
        let event = self.events.get(self.index).cloned();
        if event.is_some() {
            self.index += 1;
        }
        Ok(event)
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn restart(&mut self) -> CursorcastResult<()> {
        self.index = 0;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.index >= self.events.len()
    }
}

/// Open the source selected by `config`.
pub fn open_source(config: &SourceConfig) -> CursorcastResult<Box<dyn PointSource>> {
    match config {
        SourceConfig::Replay { path } => {
            let source = ReplaySource::from_file(path)?;
            tracing::info!(path = %path.display(), "Using replay source");
            Ok(Box::new(source))
        }
        #[cfg(target_os = "linux")]
        SourceConfig::Mice { device } => match MiceSource::open(device) {
            Ok(source) => {
                tracing::info!(device = %device.display(), "Using mice source");
                Ok(Box::new(source))
            }
            Err(e) => {
                tracing::warn!(details = %mice_device_diagnostic(device), "Mice source unavailable");
                Err(e)
            }
        },
        #[cfg(not(target_os = "linux"))]
        SourceConfig::Mice { .. } => Err(CursorcastError::unsupported(
            "the mice source is only available on Linux",
        )),
    }
}
