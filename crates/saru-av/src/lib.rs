//! # saru-av
//!
//! External media tool orchestration for the saru track pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- locate ffmpeg, ffprobe and
//!   yt-dlp through config overrides, a bundled directory, or `PATH`.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Probing** ([`FfprobeProber`]) -- stream metadata for one stream class,
//!   reported as an explicit [`ProbeOutcome`].
//! - **Subtitle extraction** ([`SubtitleExtractor`], [`SubtitleCache`]) --
//!   materialize embedded subtitle streams as cached WebVTT files.
//! - **Sidecar discovery and conversion** ([`sidecar`], [`convert`]) -- find
//!   subtitle files next to a video and turn SRT into WebVTT.
//! - **Audio enumeration** ([`audio`]) -- normalized audio track descriptors.
//! - **Stream resolution** ([`StreamResolver`]) -- turn a page URL into a
//!   directly playable media URL via yt-dlp.

pub mod audio;
pub mod cache;
pub mod command;
pub mod convert;
pub mod extract;
pub mod probe;
pub mod resolve;
pub mod sidecar;
pub mod tools;

// ---- Re-exports for convenience ----

pub use audio::enumerate_audio_tracks;
pub use cache::SubtitleCache;
pub use command::{ToolCommand, ToolOutput};
pub use convert::{convert_srt_file, convert_srt_file_to, srt_to_vtt};
pub use extract::SubtitleExtractor;
pub use probe::{FfprobeProber, ProbeOutcome, ProbedStream, StreamClass};
pub use resolve::{ResolvedStream, StreamResolver};
pub use sidecar::find_external_subtitles;
pub use tools::{ToolInfo, ToolRegistry};
