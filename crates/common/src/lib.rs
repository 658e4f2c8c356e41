//! Cursorcast Common Utilities
//!
//! Shared infrastructure for all cursorcast crates:
//! - Error types and result aliases
//! - Millisecond trace clock for stamping live pointer samples
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
