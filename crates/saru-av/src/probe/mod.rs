//! Stream probing.
//!
//! A probe asks the media inspection tool for the streams of one class
//! (subtitle or audio) and reports the result as a [`ProbeOutcome`]. The
//! outcome keeps "no streams", "tool unavailable", and "tool failed" apart;
//! callers that want the forgiving behavior flatten it with
//! [`ProbeOutcome::into_streams`].

pub mod ffprobe;

pub use self::ffprobe::{parse_probe_output, FfprobeProber};

use std::fmt;

/// Which streams a probe should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamClass {
    Subtitle,
    Audio,
}

impl StreamClass {
    /// ffprobe `-select_streams` specifier.
    pub fn selector(self) -> &'static str {
        match self {
            Self::Subtitle => "s",
            Self::Audio => "a",
        }
    }
}

impl fmt::Display for StreamClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subtitle => write!(f, "subtitle"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// One stream as reported by the inspection tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbedStream {
    /// Container stream index.
    pub index: u32,
    pub codec_name: Option<String>,
    pub channels: Option<u32>,
    pub language: Option<String>,
    pub title: Option<String>,
}

/// Result of probing one stream class of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The tool ran and reported these streams (possibly none).
    Streams(Vec<ProbedStream>),
    /// The tool is not installed or could not be started.
    Unavailable(String),
    /// The tool ran but failed, timed out, or printed unusable output.
    Failed(String),
}

impl ProbeOutcome {
    /// Collapse the outcome to a stream list, treating every failure as
    /// "no streams".
    pub fn into_streams(self) -> Vec<ProbedStream> {
        match self {
            ProbeOutcome::Streams(streams) => streams,
            ProbeOutcome::Unavailable(reason) => {
                tracing::debug!("probe unavailable: {reason}");
                Vec::new()
            }
            ProbeOutcome::Failed(reason) => {
                tracing::debug!("probe failed: {reason}");
                Vec::new()
            }
        }
    }
}
