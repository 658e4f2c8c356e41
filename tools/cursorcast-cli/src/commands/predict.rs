//! Predict where a recorded trace is heading.

use std::path::PathBuf;

use cursorcast_common::config::PredictorConfig;
use cursorcast_prediction_core::{MotionPredictor, PredictionMode};
use cursorcast_trace_model::point::parse_trace;

pub fn run(
    config: &PredictorConfig,
    library: PathBuf,
    trace: PathBuf,
    delta_ms: i64,
    constraint: Option<String>,
) -> anyhow::Result<()> {
    let mode = match constraint.as_deref() {
        Some(value) => parse_constraint(value)?,
        None => PredictionMode::Default,
    };

    let library = super::load_library(&library)?;
    let predictor = MotionPredictor::with_library(config.clone(), library)?;

    let json = std::fs::read_to_string(&trace)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", trace.display()))?;
    let raw = parse_trace(&json).map_err(|e| anyhow::anyhow!("Failed to parse trace: {e}"))?;
    let sampled = predictor.sample_trace(&raw);

    match predictor.predict_position(&sampled, delta_ms, mode)? {
        Some(p) => {
            let horizon = if delta_ms > 0 {
                format!("+{delta_ms}ms")
            } else {
                "endpoint".to_string()
            };
            println!(
                "Prediction ({horizon}): ({:.2}, {:.2}) ± {:.2}",
                p.x, p.y, p.confidence
            );
        }
        None => println!("No prediction"),
    }

    Ok(())
}

/// Parse an `X,Y` direction.
pub fn parse_constraint(value: &str) -> anyhow::Result<PredictionMode> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("constraint must be X,Y, got {value:?}"))?;
    let dx: f64 = x.trim().parse()?;
    let dy: f64 = y.trim().parse()?;
    Ok(PredictionMode::constrained(dx, dy))
}
