//! Motion signatures: velocity and turning-angle profiles.
//!
//! Each interior triplet `(p[i-2], p[i-1], p[i])` of a trace contributes one
//! velocity magnitude (quadratic fit through the triplet, evaluated at the
//! middle sample) and one signed turning angle. The combined `vap` profile
//! folds the turning direction into the speed so mirror-image paths of equal
//! speed are told apart.

use std::f64::consts::PI;

use cursorcast_trace_model::library::TemplateLibrary;
use cursorcast_trace_model::point::Point;
use cursorcast_trace_model::template::{Signature, Template};

use crate::mode::Projection;
use crate::sampler::TraceSampler;

/// Builds signatures under a fixed projection.
#[derive(Debug, Clone, Copy)]
pub struct ProfileBuilder {
    projection: Projection,
}

impl ProfileBuilder {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }

    /// Builder for unconstrained 2-D signatures.
    pub fn planar() -> Self {
        Self::new(Projection::Planar)
    }

    /// Derive the signature of `trace`.
    pub fn build(&self, trace: &[Point]) -> Signature {
        match trace {
            [] | [_] => Signature::default(),
            [a, b] => {
                let (vx, vy) = two_point_velocity(a, b);
                let vp = vec![self.projection.speed(vx, vy)];
                Signature {
                    vap: vp.clone(),
                    vp,
                    ap: vec![0.0],
                }
            }
            _ => {
                let (vp, ap): (Vec<f64>, Vec<f64>) = trace
                    .windows(3)
                    .map(|w| {
                        let (vx, vy) = triplet_velocity(&w[0], &w[1], &w[2]);
                        (
                            self.projection.speed(vx, vy),
                            turning_angle(&w[0], &w[1], &w[2]),
                        )
                    })
                    .unzip();
                let vap = combine(&vp, &ap);
                Signature { vp, ap, vap }
            }
        }
    }
}

/// Build a template from a recorded, already resampled trace.
///
/// The template is unbounded (`lbos = None`) and carries a planar signature.
pub fn template_from_trace(trace: Vec<Point>) -> Template {
    let signature = ProfileBuilder::planar().build(&trace);
    Template::new(trace, signature, None)
}

/// Resample raw recordings and turn each usable one into a template.
///
/// Recordings too short to yield a signature after resampling are skipped.
pub fn build_library<I>(raw_traces: I, sampler: &TraceSampler) -> TemplateLibrary
where
    I: IntoIterator,
    I::Item: AsRef<[Point]>,
{
    raw_traces
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let trace = sampler.sample_trace(raw.as_ref());
            let template = template_from_trace(trace);
            if template.signature.is_empty() {
                tracing::debug!(index = i, "Skipping recording too short for a signature");
                None
            } else {
                Some(template)
            }
        })
        .collect()
}

/// Velocity between two samples; zero when they share a timestamp.
fn two_point_velocity(a: &Point, b: &Point) -> (f64, f64) {
    let dt = (b.t - a.t) as f64;
    if dt == 0.0 {
        return (0.0, 0.0);
    }
    ((b.x - a.x) / dt, (b.y - a.y) / dt)
}

/// Velocity at the middle sample of a triplet.
///
/// With equal steps this is the central difference. With unequal steps the
/// quadratic through all three samples is differentiated at the middle one,
/// which cancels the acceleration term. An estimate weighted from the outer
/// samples `p0` and `p2` alone is not used here: it ignores `p1` and keeps an
/// acceleration bias whenever the two steps differ.
fn triplet_velocity(p0: &Point, p1: &Point, p2: &Point) -> (f64, f64) {
    let t1 = (p2.t - p1.t) as f64;
    let t2 = (p1.t - p0.t) as f64;

    if t1 <= 0.0 || t2 <= 0.0 {
        // Repeated timestamps: fall back to the chord over the whole span.
        return two_point_velocity(p0, p2);
    }

    if t1 == t2 {
        let span = 2.0 * t1;
        return ((p2.x - p0.x) / span, (p2.y - p0.y) / span);
    }

    let denom = t1 * t2 * (t1 + t2);
    let vx = (t2 * t2 * (p2.x - p1.x) + t1 * t1 * (p1.x - p0.x)) / denom;
    let vy = (t2 * t2 * (p2.y - p1.y) + t1 * t1 * (p1.y - p0.y)) / denom;
    (vx, vy)
}

/// Signed angle from `p1 - p0` to `p2 - p1`, in `(-π, π]`.
fn turning_angle(p0: &Point, p1: &Point, p2: &Point) -> f64 {
    let (ax, ay) = p0.displacement_to(p1);
    let (bx, by) = p1.displacement_to(p2);
    let dot = ax * bx + ay * by;
    let cross = ax * by - ay * bx;
    let angle = cross.atan2(dot);
    if angle <= -PI {
        PI
    } else {
        angle
    }
}

/// `vp[i]` with the sign of `ap[i]` (non-negative angles count as positive).
fn combine(vp: &[f64], ap: &[f64]) -> Vec<f64> {
    vp.iter()
        .zip(ap)
        .map(|(&v, &a)| if a < 0.0 { -v } else { v })
        .collect()
}
