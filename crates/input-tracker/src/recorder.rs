//! Live trace buffer.

use cursorcast_prediction_core::TraceSampler;
use cursorcast_trace_model::event::PointerEvent;
use cursorcast_trace_model::point::{Point, Trace};

/// Accumulates the current stroke from a stream of pointer events.
///
/// Moves are resampled as they arrive. A button press or release ends the
/// stroke, so the buffer is cleared on either.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    sampler: TraceSampler,
    trace: Trace,
}

impl TraceRecorder {
    pub fn new(sampler: TraceSampler) -> Self {
        Self {
            sampler,
            trace: Trace::new(),
        }
    }

    /// Apply one event. Returns `true` when the event was a move.
    pub fn handle(&mut self, event: &PointerEvent) -> bool {
        match event.point() {
            Some(point) => {
                self.sampler.add_point(&mut self.trace, point);
                true
            }
            None => {
                self.clear();
                false
            }
        }
    }

    /// The resampled samples recorded so far.
    pub fn current_trace(&self) -> &[Point] {
        &self.trace
    }

    pub fn clear(&mut self) {
        self.trace.clear();
    }

    pub fn sampler(&self) -> &TraceSampler {
        &self.sampler
    }
}
