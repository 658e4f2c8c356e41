//! Prediction modes.

/// Constraint vectors shorter than this are rejected as degenerate.
pub const MIN_CONSTRAINT_LENGTH: f64 = 1e-8;

/// How a prediction treats the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PredictionMode {
    /// Free 2-D motion, matched on the signed velocity/angle profile.
    #[default]
    Default,

    /// Motion constrained to one axis (e.g. a slider or scrollbar). The
    /// direction need not be normalized.
    Constrained { dx: f64, dy: f64 },
}

/// A mode resolved into the geometry the kernel works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Full 2-D velocity, matched on `vap`.
    Planar,

    /// Velocity projected onto a unit axis, matched on `vp`.
    Axis { ux: f64, uy: f64 },
}

impl PredictionMode {
    pub fn constrained(dx: f64, dy: f64) -> Self {
        Self::Constrained { dx, dy }
    }

    /// Resolve to a projection, normalizing the constraint direction.
    ///
    /// Returns `None` for a constraint vector too short to define an axis.
    pub fn projection(&self) -> Option<Projection> {
        match *self {
            Self::Default => Some(Projection::Planar),
            Self::Constrained { dx, dy } => {
                let len = dx.hypot(dy);
                if !len.is_finite() || len < MIN_CONSTRAINT_LENGTH {
                    return None;
                }
                Some(Projection::Axis {
                    ux: dx / len,
                    uy: dy / len,
                })
            }
        }
    }
}

impl Projection {
    /// Length of a velocity vector under this projection.
    pub fn speed(&self, vx: f64, vy: f64) -> f64 {
        match *self {
            Self::Planar => vx.hypot(vy),
            Self::Axis { ux, uy } => (vx * ux + vy * uy).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_planar() {
        assert_eq!(
            PredictionMode::default().projection(),
            Some(Projection::Planar)
        );
    }

    #[test]
    fn test_constraint_is_normalized() {
        let Some(Projection::Axis { ux, uy }) = PredictionMode::constrained(3.0, 4.0).projection()
        else {
            panic!("expected an axis projection");
        };
        assert!((ux - 0.6).abs() < 1e-12);
        assert!((uy - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_constraint_rejected() {
        assert_eq!(PredictionMode::constrained(1e-9, 0.0).projection(), None);
        assert_eq!(PredictionMode::constrained(0.0, 0.0).projection(), None);
        assert_eq!(PredictionMode::constrained(f64::NAN, 1.0).projection(), None);
    }

    #[test]
    fn test_axis_speed_ignores_sign() {
        let axis = Projection::Axis { ux: 1.0, uy: 0.0 };
        assert_eq!(axis.speed(-2.0, 5.0), 2.0);
        assert_eq!(Projection::Planar.speed(3.0, 4.0), 5.0);
    }
}
