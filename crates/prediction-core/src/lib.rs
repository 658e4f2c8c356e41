//! Cursorcast Prediction Core
//!
//! Predicts where a pointer trace is heading by comparing its motion
//! signature against a library of recorded templates:
//! - **Sampler:** Resample raw samples onto a fixed time grid, split strokes
//! - **Profile:** Derive velocity/turning-angle signatures
//! - **Matcher:** Score templates elastically and keep the best K
//! - **Predictor:** Replay matched templates forward and average the results
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod engine;
pub mod matcher;
pub mod mode;
pub mod predictor;
pub mod profile;
pub mod sampler;

pub use engine::MotionPredictor;
pub use mode::PredictionMode;
pub use predictor::{Horizon, Prediction};
pub use sampler::TraceSampler;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
