//! Live prediction session management.
//!
//! A session loads its template library in the background, becomes ready
//! once the library is installed, and only then starts draining its point
//! source into the live trace.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cursorcast_common::config::PredictorConfig;
use cursorcast_common::error::{CursorcastError, CursorcastResult};
use cursorcast_prediction_core::{MotionPredictor, Prediction, PredictionMode};
use cursorcast_trace_model::library::{LibraryError, TemplateLibrary};
use cursorcast_trace_model::point::Point;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::recorder::TraceRecorder;
use crate::PointSource;

type ReadyCallback = Box<dyn FnOnce(&TemplateLibrary) + Send>;

/// Couples a point source, a live trace, and a predictor.
pub struct PredictionSession {
    predictor: MotionPredictor,
    recorder: TraceRecorder,
    source: Box<dyn PointSource>,
    template_source: PathBuf,
    load_task: Option<JoinHandle<CursorcastResult<TemplateLibrary>>>,
    on_ready: Option<ReadyCallback>,
    ready_tx: watch::Sender<bool>,
    stop_flag: Arc<AtomicBool>,
}

impl PredictionSession {
    /// Create a session. Templates are read from `config.template_source`.
    pub fn new(config: PredictorConfig, source: Box<dyn PointSource>) -> CursorcastResult<Self> {
        let template_source = config.template_source.clone();
        let predictor = MotionPredictor::new(config)?;
        let recorder = TraceRecorder::new(*predictor.sampler());
        let (ready_tx, _) = watch::channel(false);

        Ok(Self {
            predictor,
            recorder,
            source,
            template_source,
            load_task: None,
            on_ready: None,
            ready_tx,
            stop_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Register a callback fired once, when the library has been installed.
    pub fn on_ready(&mut self, callback: impl FnOnce(&TemplateLibrary) + Send + 'static) {
        self.on_ready = Some(Box::new(callback));
    }

    /// Start loading the template library in the background.
    ///
    /// Only the first call has any effect. Must be called within a Tokio
    /// runtime.
    pub fn start_loading(&mut self) {
        if self.load_task.is_some() || self.is_ready() {
            tracing::debug!("Template load already started");
            return;
        }

        let path = self.template_source.clone();
        tracing::info!(path = %path.display(), "Loading template library");
        self.load_task = Some(tokio::task::spawn_blocking(move || load_library(&path)));
    }

    /// Wait for the library load to finish and install it.
    ///
    /// Starts the load if nobody has yet. Returns immediately once ready.
    pub async fn wait_ready(&mut self) -> CursorcastResult<()> {
        if self.is_ready() {
            return Ok(());
        }

        self.start_loading();
        let Some(task) = self.load_task.take() else {
            return Err(CursorcastError::NotReady);
        };

        let library = task
            .await
            .map_err(|e| anyhow::anyhow!("template load task failed: {e}"))??;

        self.predictor.install_library(library)?;
        self.ready_tx.send_replace(true);

        if let (Some(callback), Some(library)) = (self.on_ready.take(), self.predictor.library()) {
            callback(library);
        }
        Ok(())
    }

    /// A receiver that observes readiness.
    pub fn ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.predictor.is_ready()
    }

    /// Drain every event the source has available right now.
    ///
    /// Returns the number of events consumed. Fails with `NotReady` before
    /// the library is installed, leaving the source untouched.
    pub fn pump(&mut self) -> CursorcastResult<usize> {
        if !self.is_ready() {
            return Err(CursorcastError::NotReady);
        }

        let mut consumed = 0;
        while let Some(event) = self.source.poll()? {
            self.recorder.handle(&event);
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Load templates, then feed the source into the live trace until
    /// stopped or the source runs dry.
    ///
    /// `on_move` is called after every move event with the session, so the
    /// caller can request predictions as the trace grows.
    pub async fn run<F>(&mut self, mut on_move: F) -> CursorcastResult<u64>
    where
        F: FnMut(&PredictionSession),
    {
        self.wait_ready().await?;
        tracing::info!(source = %self.source.name(), "Prediction session started");

        let mut moves = 0;
        while !self.stop_flag.load(Ordering::Relaxed) {
            match self.source.poll() {
                Ok(Some(event)) => {
                    if self.recorder.handle(&event) {
                        moves += 1;
                        on_move(self);
                    }
                }
                Ok(None) if self.source.is_finished() => break,
                Ok(None) => {
                    tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Point source error");
                }
            }
        }

        tracing::info!(moves, "Prediction session stopped");
        Ok(moves)
    }

    /// Predict from the live trace.
    pub fn predict(
        &self,
        delta_ms: i64,
        mode: PredictionMode,
    ) -> CursorcastResult<Option<Prediction>> {
        self.predictor
            .predict_position(self.recorder.current_trace(), delta_ms, mode)
    }

    /// The live trace.
    pub fn current_trace(&self) -> &[Point] {
        self.recorder.current_trace()
    }

    pub fn predictor(&self) -> &MotionPredictor {
        &self.predictor
    }

    /// Restart the source and drop the live trace.
    pub fn restart(&mut self) -> CursorcastResult<()> {
        self.source.restart()?;
        self.recorder.clear();
        Ok(())
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }
}

fn load_library(path: &Path) -> CursorcastResult<TemplateLibrary> {
    match TemplateLibrary::load(path) {
        Ok(library) => Ok(library),
        Err(LibraryError::IoError { path, source })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            Err(CursorcastError::FileNotFound { path })
        }
        Err(e) => Err(CursorcastError::template(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ReplaySource;
    use cursorcast_trace_model::event::PointerEvent;
    use std::sync::atomic::AtomicUsize;

    fn fixture_templates() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures/sample-templates.json")
    }

    fn config(template_source: PathBuf) -> PredictorConfig {
        PredictorConfig {
            k: 3,
            template_source,
            ..Default::default()
        }
    }

    fn rightward_moves() -> Vec<PointerEvent> {
        (0..6)
            .map(|i| PointerEvent::moved(i * 10, 100.0 + i as f64 * 15.0, 50.0))
            .collect()
    }

    #[tokio::test]
    async fn test_predict_before_ready_fails() {
        let source = Box::new(ReplaySource::new(rightward_moves()));
        let mut session = PredictionSession::new(config(fixture_templates()), source).unwrap();

        assert!(matches!(
            session.predict(0, PredictionMode::Default),
            Err(CursorcastError::NotReady)
        ));
        assert!(matches!(session.pump(), Err(CursorcastError::NotReady)));
    }

    #[tokio::test]
    async fn test_ready_callback_fires_once() {
        let source = Box::new(ReplaySource::new(rightward_moves()));
        let mut session = PredictionSession::new(config(fixture_templates()), source).unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        session.on_ready(move |library| {
            assert_eq!(library.len(), 5);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut ready = session.ready();
        assert!(!*ready.borrow());

        session.start_loading();
        session.start_loading();
        session.wait_ready().await.unwrap();
        session.wait_ready().await.unwrap();

        assert!(session.is_ready());
        assert!(ready.has_changed().unwrap());
        assert!(*ready.borrow_and_update());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_drains_source_and_predicts() {
        let source = Box::new(ReplaySource::new(rightward_moves()));
        let mut session = PredictionSession::new(config(fixture_templates()), source).unwrap();

        let mut predictions = Vec::new();
        let moves = session
            .run(|s| predictions.push(s.predict(20, PredictionMode::Default).unwrap()))
            .await
            .unwrap();

        assert_eq!(moves, 6);
        assert_eq!(session.current_trace().len(), 6);
        // A single sample has no signature; two already do.
        assert!(predictions[0].is_none());
        assert!(predictions[1].is_some());
        let last = predictions.last().copied().flatten().unwrap();
        assert!(last.x > 175.0);
    }

    #[tokio::test]
    async fn test_stop_flag_ends_run() {
        let source = Box::new(ReplaySource::new(rightward_moves()));
        let mut session = PredictionSession::new(config(fixture_templates()), source).unwrap();

        let moves = session
            .run(|s| {
                if s.current_trace().len() == 3 {
                    s.stop_flag().store(true, Ordering::SeqCst);
                }
            })
            .await
            .unwrap();

        assert_eq!(moves, 3);
    }

    #[tokio::test]
    async fn test_pump_and_restart() {
        let source = Box::new(ReplaySource::new(rightward_moves()));
        let mut session = PredictionSession::new(config(fixture_templates()), source).unwrap();
        session.wait_ready().await.unwrap();

        assert_eq!(session.pump().unwrap(), 6);
        assert_eq!(session.pump().unwrap(), 0);

        session.restart().unwrap();
        assert!(session.current_trace().is_empty());
        assert_eq!(session.pump().unwrap(), 6);
    }

    #[tokio::test]
    async fn test_missing_library_reported() {
        let source = Box::new(ReplaySource::new(vec![]));
        let mut session =
            PredictionSession::new(config(PathBuf::from("/nonexistent/templates.json")), source)
                .unwrap();
        let err = session.wait_ready().await.unwrap_err();
        assert!(matches!(err, CursorcastError::FileNotFound { .. }));
        assert!(!session.is_ready());
    }
}
