//! FFprobe-backed stream prober.
//!
//! Shells out to `ffprobe -v quiet -print_format json -show_streams
//! -select_streams <class>` and maps the JSON output into [`ProbedStream`]s.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::{ProbeOutcome, ProbedStream, StreamClass};
use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, FFPROBE};

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    /// Path to the ffprobe binary, if one was found.
    ffprobe_path: Option<PathBuf>,
    timeout: Duration,
}

impl FfprobeProber {
    /// Create a new prober using the given ffprobe path.
    pub fn new(ffprobe_path: PathBuf, timeout: Duration) -> Self {
        Self {
            ffprobe_path: Some(ffprobe_path),
            timeout,
        }
    }

    /// Create a prober from a discovered registry. A missing ffprobe makes
    /// every probe report [`ProbeOutcome::Unavailable`].
    pub fn from_registry(tools: &ToolRegistry, timeout: Duration) -> Self {
        Self {
            ffprobe_path: tools.get(FFPROBE).map(Path::to_path_buf),
            timeout,
        }
    }

    /// Probe `path` for streams of the given class.
    pub async fn probe_streams(&self, path: &Path, class: StreamClass) -> ProbeOutcome {
        let Some(ref ffprobe) = self.ffprobe_path else {
            return ProbeOutcome::Unavailable(format!("{FFPROBE} not found"));
        };

        let mut cmd = ToolCommand::new(ffprobe.clone());
        cmd.args(["-v", "quiet", "-print_format", "json", "-show_streams"]);
        cmd.args(["-select_streams", class.selector()]);
        cmd.arg(path.to_string_lossy().as_ref());
        cmd.timeout(self.timeout);

        let output = match cmd.execute().await {
            Ok(output) => output,
            Err(e) if e.is_unavailable() => return ProbeOutcome::Unavailable(e.to_string()),
            Err(e) => return ProbeOutcome::Failed(e.to_string()),
        };

        match parse_probe_output(&output.stdout) {
            Ok(streams) => {
                tracing::debug!(
                    "found {} {class} stream(s) in {}",
                    streams.len(),
                    path.display()
                );
                ProbeOutcome::Streams(streams)
            }
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: u32,
    codec_name: Option<String>,
    channels: Option<u32>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    language: Option<String>,
    title: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse ffprobe JSON into stream descriptors, preserving stream order.
///
/// A document without a `streams` key is an empty list. Blank tag values
/// count as missing.
pub fn parse_probe_output(json: &str) -> saru_core::Result<Vec<ProbedStream>> {
    let ff: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| saru_core::Error::Probe(format!("ffprobe JSON parse error: {e}")))?;

    Ok(ff
        .streams
        .into_iter()
        .map(|s| ProbedStream {
            index: s.index,
            codec_name: non_blank(s.codec_name),
            channels: s.channels,
            language: non_blank(s.tags.language),
            title: non_blank(s.tags.title),
        })
        .collect())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
