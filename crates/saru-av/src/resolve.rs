//! Remote page URL resolution via yt-dlp.
//!
//! A page URL (a video site link) is turned into a direct media URL that a
//! player can open. Resolution is a single `yt-dlp --get-url` call with a
//! format selector; the first URL printed wins.

use std::path::{Path, PathBuf};
use std::time::Duration;

use saru_core::config::StreamConfig;
use serde::{Deserialize, Serialize};

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, YTDLP};

/// A page URL together with the playable URL it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStream {
    pub page_url: String,
    pub stream_url: String,
}

/// Resolves page URLs to direct media URLs.
#[derive(Debug, Clone)]
pub struct StreamResolver {
    ytdlp_path: Option<PathBuf>,
    format: String,
    timeout: Duration,
}

impl StreamResolver {
    pub fn new(ytdlp_path: Option<PathBuf>, config: &StreamConfig) -> Self {
        Self {
            ytdlp_path,
            format: config.format.clone(),
            timeout: config.resolve_timeout(),
        }
    }

    pub fn from_registry(tools: &ToolRegistry, config: &StreamConfig) -> Self {
        Self::new(tools.get(YTDLP).map(Path::to_path_buf), config)
    }

    /// Resolve `url` to a directly playable stream URL.
    ///
    /// # Errors
    ///
    /// Returns [`saru_core::Error::Resolve`] if yt-dlp is missing, fails,
    /// times out, or prints no URL.
    pub async fn resolve(&self, url: &str) -> saru_core::Result<ResolvedStream> {
        let url = url.trim();
        if url.is_empty() {
            return Err(saru_core::Error::Resolve("empty URL".into()));
        }

        let Some(ref ytdlp) = self.ytdlp_path else {
            return Err(saru_core::Error::Resolve(format!("{YTDLP} not found")));
        };

        let mut cmd = ToolCommand::new(ytdlp.clone());
        cmd.args(["--get-url", "--no-playlist", "--format"]);
        cmd.arg(self.format.as_str());
        cmd.args([
            "--no-check-certificates",
            "--no-warnings",
            "--quiet",
            "--no-cache-dir",
        ]);
        cmd.arg(url);
        cmd.timeout(self.timeout);

        let output = cmd
            .execute()
            .await
            .map_err(|e| saru_core::Error::Resolve(e.to_string()))?;

        let stream_url = first_url(&output.stdout).ok_or_else(|| {
            saru_core::Error::Resolve(format!("{YTDLP} returned no URL for {url}"))
        })?;

        tracing::info!("resolved {url}");
        tracing::debug!("stream URL: {stream_url}");

        Ok(ResolvedStream {
            page_url: url.to_string(),
            stream_url,
        })
    }
}

/// First non-empty line of yt-dlp output. Split formats print one URL per
/// line (video, then audio); the first is the one a player opens.
fn first_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
