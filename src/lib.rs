//! Saru - media track discovery for video playback
//!
//! This library crate exposes the track service and config loading for the
//! `saru` binary and for integration testing.

pub mod config;
pub mod tracks;
