//! Motion signatures and recorded templates.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Velocity/angle profile of a trace.
///
/// For a trace of `n >= 3` samples every field holds `n - 2` entries, one per
/// interior triplet. A 2-sample trace yields a single velocity and `ap = [0]`.
/// Shorter traces yield an empty signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Velocity magnitudes (distance units per ms).
    pub vp: Vec<f64>,

    /// Signed turning angles in radians, range `(-π, π]`.
    pub ap: Vec<f64>,

    /// `vp[i]` carrying the sign of `ap[i]`.
    pub vap: Vec<f64>,
}

impl Signature {
    /// Number of profile samples.
    pub fn len(&self) -> usize {
        self.vp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vp.is_empty()
    }

    /// Whether all three profiles have the same length.
    pub fn is_consistent(&self) -> bool {
        self.vp.len() == self.ap.len() && self.vp.len() == self.vap.len()
    }
}

/// A recorded reference trace with its precomputed signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// The resampled trace the signature was derived from.
    pub trace: Vec<Point>,

    #[serde(flatten)]
    pub signature: Signature,

    /// Sample index bounding the valid matching region. `None` (persisted
    /// as `-1`) means the whole template is valid.
    #[serde(default, with = "lbos_serde")]
    pub lbos: Option<usize>,
}

impl Template {
    pub fn new(trace: Vec<Point>, signature: Signature, lbos: Option<usize>) -> Self {
        Self {
            trace,
            signature,
            lbos,
        }
    }

    /// Trace length used to bound extrapolation: `lbos` when set, otherwise
    /// the recorded trace length.
    pub fn bound(&self) -> usize {
        self.lbos.unwrap_or(self.trace.len())
    }
}

mod lbos_serde {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bound) => s.serialize_u64(*bound as u64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        match i64::deserialize(d)? {
            -1 => Ok(None),
            raw if raw >= 0 => Ok(Some(raw as usize)),
            raw => Err(D::Error::custom(format!(
                "invalid lbos {raw}: expected -1 or a non-negative index"
            ))),
        }
    }
}
