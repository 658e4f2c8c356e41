//! Trace resampling and stroke segmentation.
//!
//! Raw pointer samples arrive at irregular times. The sampler rebuilds them
//! on a fixed time grid by linear interpolation and decides where one stroke
//! ends and the next begins:
//!
//! - a sample earlier than the previous one (time reversal),
//! - a gap longer than the pause threshold,
//! - a sample closer to the stroke origin than the previous one was
//!   (direction reversal; the previous sample becomes the new origin).

use cursorcast_common::config::PredictorConfig;
use cursorcast_trace_model::point::{Point, Trace};

/// Fixed-interval resampler with stroke-boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSampler {
    sample_interval_ms: u32,
    pause_threshold_ms: u32,
}

impl TraceSampler {
    /// Create a sampler. A zero interval disables resampling.
    pub fn new(sample_interval_ms: u32, pause_threshold_ms: u32) -> Self {
        Self {
            sample_interval_ms,
            pause_threshold_ms,
        }
    }

    pub fn from_config(config: &PredictorConfig) -> Self {
        Self::new(config.sample_interval_ms, config.pause_threshold_ms)
    }

    pub fn sample_interval_ms(&self) -> u32 {
        self.sample_interval_ms
    }

    pub fn pause_threshold_ms(&self) -> u32 {
        self.pause_threshold_ms
    }

    /// Feed one raw sample into `trace`.
    pub fn add_point(&self, trace: &mut Trace, point: Point) {
        if let Some(last) = trace.last() {
            let pause = i64::from(self.pause_threshold_ms);
            if point.t < last.t || point.t > last.t.saturating_add(pause) {
                trace.clear();
            }
        }

        if let (Some(&origin), Some(&last)) = (trace.first(), trace.last()) {
            if origin.distance_to(&point) < origin.distance_to(&last) {
                trace.clear();
                trace.push(last);
            }
        }

        let Some(&last) = trace.last() else {
            trace.push(point);
            return;
        };

        if self.sample_interval_ms == 0 {
            trace.push(point);
            return;
        }

        let interval = i64::from(self.sample_interval_ms);
        let mut remaining = point.t - last.t;
        if remaining < interval {
            return;
        }

        let rate = interval as f64 / remaining as f64;
        let step_x = rate * (point.x - last.x);
        let step_y = rate * (point.y - last.y);

        let mut current = last;
        while remaining >= interval {
            current = Point::new(current.x + step_x, current.y + step_y, current.t + interval);
            trace.push(current);
            remaining -= interval;
        }
    }

    /// Resample a whole raw trace, as used when reprocessing recordings.
    pub fn sample_trace(&self, raw: &[Point]) -> Trace {
        let mut trace = Vec::with_capacity(raw.len());
        for &point in raw {
            self.add_point(&mut trace, point);
        }
        trace
    }
}

/// Index where the most recent stroke of `trace` starts.
///
/// Walks the trace keeping a running origin; whenever a sample is farther
/// from the origin than its successor, motion has turned back and that
/// sample becomes the new origin.
pub fn stroke_origin(trace: &[Point]) -> usize {
    let mut origin = 0;
    for i in 1..trace.len().saturating_sub(1) {
        let here = trace[origin].distance_to(&trace[i]);
        let next = trace[origin].distance_to(&trace[i + 1]);
        if here > next {
            origin = i;
        }
    }
    origin
}
