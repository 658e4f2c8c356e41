//! Extrapolation from matched templates.
//!
//! The live stroke is aligned with each matched template at the live
//! signature's last sample. From there the template's remaining motion is
//! replayed starting at the stroke's last position:
//!
//! - **Planar:** each step rotates the previous step's displacement by the
//!   template's turning angle and scales it to the template's speed, so
//!   curvature compounds the way it did in the recording.
//! - **Axis:** the template's remaining path length is laid out along the
//!   constraint axis, in whichever direction the stroke is currently moving.
//!
//! The per-template predictions are averaged; their RMS spread around the
//! mean is reported as a confidence radius.

use cursorcast_trace_model::point::Point;
use cursorcast_trace_model::template::{Signature, Template};

use crate::mode::Projection;

/// Upper bound on extrapolation steps when predicting a resting point.
pub const MAX_ENDPOINT_STEPS: usize = 30;

/// Heading vectors with both components below this are treated as zero.
const HEADING_EPSILON: f64 = 1e-8;

/// How far ahead to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// Where the stroke will come to rest.
    Endpoint,

    /// The position this many grid steps ahead.
    Steps(usize),
}

impl Horizon {
    /// Convert a time horizon into grid steps.
    ///
    /// Non-positive horizons request the endpoint. Partial steps round up.
    pub fn from_delta_ms(delta_ms: i64, sample_interval_ms: u32) -> Self {
        if delta_ms <= 0 || sample_interval_ms == 0 {
            return Self::Endpoint;
        }
        let interval = i64::from(sample_interval_ms);
        let steps = (delta_ms - 1) / interval + 1;
        Self::Steps(usize::try_from(steps).unwrap_or(usize::MAX))
    }
}

/// A predicted position and its confidence radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub x: f64,
    pub y: f64,

    /// RMS distance of the individual template predictions from `(x, y)`.
    pub confidence: f64,
}

/// Replays matched templates forward from the live stroke.
#[derive(Debug, Clone, Copy)]
pub struct PositionPredictor {
    sample_interval_ms: u32,
    projection: Projection,
}

impl PositionPredictor {
    pub fn new(sample_interval_ms: u32, projection: Projection) -> Self {
        Self {
            sample_interval_ms,
            projection,
        }
    }

    /// Predict from the live stroke and its signature.
    ///
    /// Returns `None` when the signature is empty, the stroke has fewer than
    /// two samples, or no templates were supplied.
    pub fn predict(
        &self,
        stroke: &[Point],
        current: &Signature,
        templates: &[&Template],
        horizon: Horizon,
    ) -> Option<Prediction> {
        if current.is_empty() || templates.is_empty() {
            return None;
        }
        let [.., prev, last] = stroke else {
            return None;
        };

        let align = current.len() - 1;
        let points: Vec<(f64, f64)> = templates
            .iter()
            .map(|template| {
                let steps = extrapolation_steps(align, template, horizon, self.projection);
                match self.projection {
                    Projection::Planar => self.replay_planar(prev, last, template, align, steps),
                    Projection::Axis { ux, uy } => {
                        self.replay_axis(prev, last, template, align, steps, (ux, uy))
                    }
                }
            })
            .collect();

        Some(aggregate(&points))
    }

    fn replay_planar(
        &self,
        prev: &Point,
        last: &Point,
        template: &Template,
        start: usize,
        steps: usize,
    ) -> (f64, f64) {
        let interval = f64::from(self.sample_interval_ms);
        let (mut vx, mut vy) = prev.displacement_to(last);
        let (mut px, mut py) = (last.x, last.y);

        let angles = template.signature.ap.iter().skip(start);
        let speeds = template.signature.vp.iter().skip(start);
        for (&angle, &speed) in angles.zip(speeds).take(steps) {
            let (sin, cos) = angle.sin_cos();
            let hx = vx * cos - vy * sin;
            let hy = vx * sin + vy * cos;

            let (dx, dy) = if hx.abs() < HEADING_EPSILON && hy.abs() < HEADING_EPSILON {
                (0.0, 0.0)
            } else {
                let scale = speed * interval / hx.hypot(hy);
                (hx * scale, hy * scale)
            };

            px += dx;
            py += dy;
            vx = dx;
            vy = dy;
        }

        (px, py)
    }

    fn replay_axis(
        &self,
        prev: &Point,
        last: &Point,
        template: &Template,
        start: usize,
        steps: usize,
        (ux, uy): (f64, f64),
    ) -> (f64, f64) {
        let interval = f64::from(self.sample_interval_ms);
        let path: f64 = template.signature.vp.iter().skip(start).take(steps).sum();
        let mut distance = path * interval;

        let (vx, vy) = prev.displacement_to(last);
        if vx * ux + vy * uy < 0.0 {
            distance = -distance;
        }

        (last.x + distance * ux, last.y + distance * uy)
    }
}

/// Number of template steps to replay after alignment index `align`.
///
/// Bounded by the template's valid length (`lbos`, else its trace length),
/// by [`MAX_ENDPOINT_STEPS`] for endpoint predictions, and by the profile
/// entries the template actually has.
pub fn extrapolation_steps(
    align: usize,
    template: &Template,
    horizon: Horizon,
    projection: Projection,
) -> usize {
    let bound = template.bound();
    let limit = bound.saturating_sub(align + 2);

    let steps = match horizon {
        Horizon::Endpoint => limit.min(MAX_ENDPOINT_STEPS),
        Horizon::Steps(delta) if align.saturating_add(2).saturating_add(delta) > bound => limit,
        Horizon::Steps(delta) => delta,
    };

    let sig = &template.signature;
    let available = match projection {
        Projection::Planar => sig.vp.len().min(sig.ap.len()),
        Projection::Axis { .. } => sig.vp.len(),
    };
    steps.min(available.saturating_sub(align))
}

/// Mean of the predicted points plus their RMS spread.
fn aggregate(points: &[(f64, f64)]) -> Prediction {
    let count = points.len() as f64;
    let x = points.iter().map(|p| p.0).sum::<f64>() / count;
    let y = points.iter().map(|p| p.1).sum::<f64>() / count;

    let spread = points
        .iter()
        .map(|p| (p.0 - x).powi(2) + (p.1 - y).powi(2))
        .sum::<f64>()
        / count;

    Prediction {
        x,
        y,
        confidence: spread.sqrt(),
    }
}
