//! Cursorcast Input Tracker
//!
//! Turns live pointer input into traces the predictor can consume. Uses a
//! pluggable source architecture:
//!
//! - **Mice:** Relative PS/2 packets from `/dev/input/mice` (Linux)
//! - **Replay:** A recorded JSONL event log, restartable
//!
//! Events can be logged in append-only JSONL format for building template
//! libraries, or fed into a [`session::PredictionSession`] for live
//! prediction.

pub mod backends;
pub mod recorder;
pub mod session;
pub mod writer;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cursorcast_common::clock::TraceClock;
use cursorcast_common::error::CursorcastResult;
use cursorcast_trace_model::event::{EventLogHeader, PointerEvent};

pub use backends::{open_source, ReplaySource};
pub use recorder::TraceRecorder;
pub use session::PredictionSession;

/// Event log schema written by [`InputTracker`].
pub const EVENT_LOG_SCHEMA_VERSION: &str = "1.0";

/// A stream of pointer events.
pub trait PointSource: Send {
    /// Poll for the next event. Returns `None` if no event is available yet.
    fn poll(&mut self) -> CursorcastResult<Option<PointerEvent>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Start the sequence over.
    fn restart(&mut self) -> CursorcastResult<()>;

    /// Whether the source will never produce another event.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Drains a source into an event log.
pub struct InputTracker {
    source: Box<dyn PointSource>,
    writer: writer::EventWriter,
    stop_flag: Arc<AtomicBool>,
    events_logged: u64,
}

impl InputTracker {
    /// Create a tracker writing to `output_path`.
    pub fn new(
        source: Box<dyn PointSource>,
        output_path: PathBuf,
        clock: &TraceClock,
    ) -> CursorcastResult<Self> {
        let header = EventLogHeader {
            schema_version: EVENT_LOG_SCHEMA_VERSION.to_string(),
            epoch_wall: clock.epoch_wall().to_string(),
            source: source.name().to_string(),
        };

        let writer = writer::EventWriter::create(&output_path, &header)?;

        Ok(Self {
            source,
            writer,
            stop_flag: Arc::new(AtomicBool::new(false)),
            events_logged: 0,
        })
    }

    /// Run the tracking loop until stopped or the source runs dry.
    pub async fn run(&mut self) -> CursorcastResult<u64> {
        tracing::info!(source = %self.source.name(), "Input tracker started");

        while !self.stop_flag.load(Ordering::Relaxed) {
            match self.source.poll() {
                Ok(Some(event)) => {
                    self.writer.write_event(&event)?;
                    self.events_logged += 1;
                }
                Ok(None) if self.source.is_finished() => break,
                Ok(None) => {
                    tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Input tracking error");
                }
            }
        }

        self.writer.flush()?;
        tracing::info!(events = self.events_logged, "Input tracker stopped");
        Ok(self.events_logged)
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorcast_trace_model::event::parse_events;

    #[tokio::test]
    async fn test_tracker_logs_replay_until_exhausted() {
        let dir = std::env::temp_dir().join("cursorcast_test_tracker");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("events.jsonl");

        let events = vec![
            PointerEvent::moved(0, 1.0, 2.0),
            PointerEvent::down(5),
            PointerEvent::moved(10, 3.0, 4.0),
        ];
        let source = Box::new(ReplaySource::new(events.clone()));
        let mut tracker = InputTracker::new(source, path.clone(), &TraceClock::start()).unwrap();

        let logged = tracker.run().await.unwrap();
        assert_eq!(logged, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# "));
        assert!(content.contains("\"source\":\"replay\""));
        assert_eq!(parse_events(&content).unwrap(), events);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_tracker_honors_stop_flag() {
        let dir = std::env::temp_dir().join("cursorcast_test_tracker_stop");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("events.jsonl");

        let source = Box::new(ReplaySource::new(vec![PointerEvent::moved(0, 1.0, 2.0)]));
        let mut tracker = InputTracker::new(source, path.clone(), &TraceClock::start()).unwrap();
        tracker.stop_flag().store(true, Ordering::SeqCst);

        assert_eq!(tracker.run().await.unwrap(), 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(parse_events(&content).unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
