//! The predictor facade: configuration plus template library.
//!
//! A [`MotionPredictor`] owns everything a prediction needs, so independent
//! predictors can coexist. It starts without templates; predictions fail
//! with [`CursorcastError::NotReady`] until a library is installed.

use std::sync::Arc;

use cursorcast_common::config::PredictorConfig;
use cursorcast_common::error::{CursorcastError, CursorcastResult};
use cursorcast_trace_model::library::TemplateLibrary;
use cursorcast_trace_model::point::{Point, Trace};
use cursorcast_trace_model::template::Template;

use crate::matcher::TemplateMatcher;
use crate::mode::PredictionMode;
use crate::predictor::{Horizon, PositionPredictor, Prediction};
use crate::profile::ProfileBuilder;
use crate::sampler::{stroke_origin, TraceSampler};

/// Template-matching pointer predictor.
#[derive(Debug, Clone)]
pub struct MotionPredictor {
    config: PredictorConfig,
    sampler: TraceSampler,
    library: Option<Arc<TemplateLibrary>>,
}

impl MotionPredictor {
    /// Create a predictor with no templates yet.
    pub fn new(config: PredictorConfig) -> CursorcastResult<Self> {
        config.validate()?;
        if config.sample_interval_ms == 0 {
            return Err(CursorcastError::config(
                "prediction requires a positive sample interval",
            ));
        }

        Ok(Self {
            sampler: TraceSampler::from_config(&config),
            config,
            library: None,
        })
    }

    /// Create a predictor and install `library` in one step.
    pub fn with_library(
        config: PredictorConfig,
        library: impl Into<Arc<TemplateLibrary>>,
    ) -> CursorcastResult<Self> {
        let mut predictor = Self::new(config)?;
        predictor.install_library(library)?;
        Ok(predictor)
    }

    /// Install the template library, making the predictor ready.
    ///
    /// The library must hold at least `k` templates and every record must be
    /// internally consistent.
    pub fn install_library(
        &mut self,
        library: impl Into<Arc<TemplateLibrary>>,
    ) -> CursorcastResult<()> {
        let library = library.into();

        if library.len() < self.config.k {
            return Err(CursorcastError::config(format!(
                "k = {} exceeds template library size {}",
                self.config.k,
                library.len()
            )));
        }
        library
            .check()
            .map_err(|e| CursorcastError::template(e.to_string()))?;

        tracing::info!(templates = library.len(), k = self.config.k, "Template library installed");
        self.library = Some(library);
        Ok(())
    }

    /// Whether a template library has been installed.
    pub fn is_ready(&self) -> bool {
        self.library.is_some()
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn sampler(&self) -> &TraceSampler {
        &self.sampler
    }

    pub fn library(&self) -> Option<&TemplateLibrary> {
        self.library.as_deref()
    }

    /// Resample a raw trace on this predictor's grid.
    pub fn sample_trace(&self, raw: &[Point]) -> Trace {
        self.sampler.sample_trace(raw)
    }

    /// Predict where `trace` will be `delta_ms` from its last sample, or
    /// where it will come to rest when `delta_ms <= 0`.
    ///
    /// Returns `Ok(None)` when the current stroke is too short to form a
    /// signature or the constraint direction is degenerate.
    pub fn predict_position(
        &self,
        trace: &[Point],
        delta_ms: i64,
        mode: PredictionMode,
    ) -> CursorcastResult<Option<Prediction>> {
        let library = self.library.as_deref().ok_or(CursorcastError::NotReady)?;

        let Some(projection) = mode.projection() else {
            tracing::debug!(?mode, "Degenerate constraint direction, no prediction");
            return Ok(None);
        };

        let stroke = &trace[stroke_origin(trace)..];
        let current = ProfileBuilder::new(projection).build(stroke);
        if current.is_empty() {
            return Ok(None);
        }

        let matches =
            TemplateMatcher::new(self.config.k, projection).find_matches(&current, library);
        let templates: Vec<&Template> = matches
            .iter()
            .filter_map(|m| library.get(m.index))
            .collect();

        let horizon = Horizon::from_delta_ms(delta_ms, self.config.sample_interval_ms);
        let prediction = PositionPredictor::new(self.config.sample_interval_ms, projection)
            .predict(stroke, &current, &templates, horizon);

        tracing::debug!(
            stroke_len = stroke.len(),
            ?horizon,
            best = ?matches.first().map(|m| (m.index, m.score)),
            ?prediction,
            "Prediction computed"
        );

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorcast_trace_model::template::Signature;

    fn p(x: f64, y: f64, t: i64) -> Point {
        Point::new(x, y, t)
    }

    fn straight_template(speed: f64, len: usize) -> Template {
        let trace = (0..len as i64)
            .map(|i| p(i as f64 * speed * 10.0, 0.0, i * 10))
            .collect();
        let n = len - 2;
        Template::new(
            trace,
            Signature {
                vp: vec![speed; n],
                ap: vec![0.0; n],
                vap: vec![speed; n],
            },
            None,
        )
    }

    fn config(k: usize) -> PredictorConfig {
        PredictorConfig {
            k,
            ..Default::default()
        }
    }

    #[test]
    fn test_predict_before_install_fails() {
        let predictor = MotionPredictor::new(config(1)).unwrap();
        assert!(!predictor.is_ready());
        let err = predictor
            .predict_position(&[p(0.0, 0.0, 0)], 0, PredictionMode::Default)
            .unwrap_err();
        assert!(matches!(err, CursorcastError::NotReady));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let cfg = PredictorConfig {
            sample_interval_ms: 0,
            ..config(1)
        };
        assert!(matches!(
            MotionPredictor::new(cfg),
            Err(CursorcastError::Config { .. })
        ));
    }

    #[test]
    fn test_k_larger_than_library_rejected() {
        let library = TemplateLibrary::new(vec![straight_template(1.0, 6)]);
        let err = MotionPredictor::with_library(config(3), library).unwrap_err();
        assert!(err.to_string().contains("exceeds template library size 1"));
    }

    #[test]
    fn test_inconsistent_library_rejected() {
        let mut broken = straight_template(1.0, 6);
        broken.signature.ap.clear();
        let library = TemplateLibrary::new(vec![broken]);
        assert!(matches!(
            MotionPredictor::with_library(config(1), library),
            Err(CursorcastError::Template { .. })
        ));
    }

    #[test]
    fn test_short_trace_yields_no_prediction() {
        let library = TemplateLibrary::new(vec![straight_template(1.0, 6)]);
        let predictor = MotionPredictor::with_library(config(1), library).unwrap();
        let result = predictor
            .predict_position(&[p(0.0, 0.0, 0)], 0, PredictionMode::Default)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_degenerate_constraint_yields_no_prediction() {
        let library = TemplateLibrary::new(vec![straight_template(1.0, 6)]);
        let predictor = MotionPredictor::with_library(config(1), library).unwrap();
        let trace = [p(0.0, 0.0, 0), p(10.0, 0.0, 10), p(20.0, 0.0, 20)];
        let result = predictor
            .predict_position(&trace, 0, PredictionMode::constrained(0.0, 1e-12))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_best_template_drives_prediction() {
        let library = TemplateLibrary::new(vec![
            straight_template(3.0, 8),
            straight_template(1.0, 8),
            straight_template(0.2, 8),
        ]);
        let predictor = MotionPredictor::with_library(config(1), library).unwrap();
        let trace = [p(0.0, 0.0, 0), p(10.0, 0.0, 10), p(20.0, 0.0, 20)];

        let pred = predictor
            .predict_position(&trace, 20, PredictionMode::Default)
            .unwrap()
            .unwrap();
        // Matches the speed-1 template: two steps of 10 units.
        assert!((pred.x - 40.0).abs() < 1e-9);
        assert_eq!(pred.confidence, 0.0);
    }

    #[test]
    fn test_prediction_uses_latest_stroke() {
        let library = TemplateLibrary::new(vec![straight_template(1.0, 8)]);
        let predictor = MotionPredictor::with_library(config(1), library).unwrap();
        // Out to x=40, then back toward the origin.
        let trace = [
            p(0.0, 0.0, 0),
            p(20.0, 0.0, 10),
            p(40.0, 0.0, 20),
            p(30.0, 0.0, 30),
            p(20.0, 0.0, 40),
        ];
        let pred = predictor
            .predict_position(&trace, 10, PredictionMode::Default)
            .unwrap()
            .unwrap();
        // Stroke restarts at x=40, so one 10ms step continues leftward.
        assert!((pred.x - 10.0).abs() < 1e-9);
        assert!(pred.y.abs() < 1e-9);
    }
}
