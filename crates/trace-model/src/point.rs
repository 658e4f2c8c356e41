//! Pointer samples and traces.

use serde::{Deserialize, Serialize};

/// Timestamp in integer milliseconds.
pub type TimestampMs = i64;

/// A single timestamped pointer sample.
///
/// Persisted as a compact `[x, y, t]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, TimestampMs)", into = "(f64, f64, TimestampMs)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub t: TimestampMs,
}

/// An ordered sequence of samples, non-decreasing in `t` within one stroke.
pub type Trace = Vec<Point>;

impl Point {
    pub fn new(x: f64, y: f64, t: TimestampMs) -> Self {
        Self { x, y, t }
    }

    /// Euclidean distance to another point, ignoring time.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Spatial displacement `other - self`.
    pub fn displacement_to(&self, other: &Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

impl From<(f64, f64, TimestampMs)> for Point {
    fn from((x, y, t): (f64, f64, TimestampMs)) -> Self {
        Self { x, y, t }
    }
}

impl From<Point> for (f64, f64, TimestampMs) {
    fn from(p: Point) -> Self {
        (p.x, p.y, p.t)
    }
}

/// Parse a trace from its JSON form `[[x, y, t], ...]`.
pub fn parse_trace(json: &str) -> Result<Trace, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a collection of traces from `[[[x, y, t], ...], ...]`.
pub fn parse_traces(json: &str) -> Result<Vec<Trace>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_as_triple() {
        let p = Point::new(1.5, -2.0, 30);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.5,-2.0,30]");
    }

    #[test]
    fn test_parse_trace() {
        let trace = parse_trace("[[0,0,0],[10,0,10],[20,0,20]]").unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace[2], Point::new(20.0, 0.0, 20));
    }

    #[test]
    fn test_parse_traces() {
        let traces = parse_traces("[[[0,0,0],[1,1,10]],[[5,5,0]]]").unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1].len(), 1);
    }

    #[test]
    fn test_distance_ignores_time() {
        let a = Point::new(0.0, 0.0, 0);
        let b = Point::new(3.0, 4.0, 1_000);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.displacement_to(&b), (3.0, 4.0));
    }
}
