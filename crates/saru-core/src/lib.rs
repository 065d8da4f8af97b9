//! saru-core: shared errors, configuration, and media track types.
//!
//! This crate is the foundational dependency for the other saru crates. It
//! carries no I/O beyond reading an optional config file; the track pipeline
//! itself lives in `saru-av` and the root `saru` crate.

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;
