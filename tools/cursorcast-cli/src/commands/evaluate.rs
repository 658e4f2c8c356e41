//! Replay recorded traces against a library and measure prediction error.

use std::path::PathBuf;

use cursorcast_common::config::PredictorConfig;
use cursorcast_prediction_core::{Horizon, MotionPredictor, PredictionMode};
use cursorcast_trace_model::point::Point;

/// Error statistics for one trace.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TraceScore {
    pub predictions: usize,
    pub misses: usize,
    pub total_error: f64,
}

impl TraceScore {
    pub fn mean_error(&self) -> Option<f64> {
        (self.predictions > 0).then(|| self.total_error / self.predictions as f64)
    }

    fn absorb(&mut self, other: TraceScore) {
        self.predictions += other.predictions;
        self.misses += other.misses;
        self.total_error += other.total_error;
    }
}

pub fn run(
    config: &PredictorConfig,
    library: PathBuf,
    traces: PathBuf,
    delta_ms: i64,
) -> anyhow::Result<()> {
    let library = super::load_library(&library)?;
    let predictor = MotionPredictor::with_library(config.clone(), library)?;
    let raws = super::load_traces(&traces)?;

    println!("Evaluating {} trace(s), delta = {delta_ms}ms", raws.len());

    let mut overall = TraceScore::default();
    for (i, raw) in raws.iter().enumerate() {
        let sampled = predictor.sample_trace(raw);
        let score = evaluate_trace(&predictor, &sampled, delta_ms)?;
        match score.mean_error() {
            Some(mean) => println!(
                "  #{i}: {} prediction(s), mean error {mean:.2}",
                score.predictions
            ),
            None => println!("  #{i}: no predictions"),
        }
        overall.absorb(score);
    }

    println!();
    println!("Predictions: {}", overall.predictions);
    println!("No prediction: {}", overall.misses);
    if let Some(mean) = overall.mean_error() {
        println!("Mean error: {mean:.2}");
    }

    Ok(())
}

/// Predict from every prefix of `sampled` that has a known outcome.
///
/// With `delta_ms <= 0` the outcome is the trace's last sample; otherwise
/// it is the sample `delta_ms` (rounded up to whole steps) past the prefix.
pub fn evaluate_trace(
    predictor: &MotionPredictor,
    sampled: &[Point],
    delta_ms: i64,
) -> anyhow::Result<TraceScore> {
    let horizon = Horizon::from_delta_ms(delta_ms, predictor.config().sample_interval_ms);
    let mut score = TraceScore::default();

    for end in 3..sampled.len() {
        let target = match horizon {
            Horizon::Endpoint => sampled[sampled.len() - 1],
            Horizon::Steps(steps) => match sampled.get(end - 1 + steps) {
                Some(&p) => p,
                None => break,
            },
        };

        match predictor.predict_position(&sampled[..end], delta_ms, PredictionMode::Default)? {
            Some(p) => {
                score.predictions += 1;
                score.total_error += (p.x - target.x).hypot(p.y - target.y);
            }
            None => score.misses += 1,
        }
    }

    tracing::debug!(?score, "Trace evaluated");
    Ok(score)
}
