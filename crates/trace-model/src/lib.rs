//! Cursorcast Trace Model
//!
//! Defines the core data contracts shared by the prediction kernel and its
//! collaborators:
//! - **Points:** Timestamped 2-D pointer samples and traces built from them
//! - **Signatures:** Velocity/turning-angle profiles derived from a trace
//! - **Templates:** Recorded reference traces with precomputed signatures
//! - **Events:** Raw pointer events as produced by a live source
//!
//! Coordinates are in source units (usually pixels); timestamps are integer
//! milliseconds.

pub mod event;
pub mod library;
pub mod point;
pub mod template;

pub use event::*;
pub use library::*;
pub use point::*;
pub use template::*;
