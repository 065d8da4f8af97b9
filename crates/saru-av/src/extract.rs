//! Embedded subtitle extraction into the subtitle cache.
//!
//! Each subtitle stream is transcoded to WebVTT by ffmpeg, one process per
//! stream, with all streams of a video in flight at once (up to the
//! configured cap). A stream whose extraction fails is dropped from the
//! result; it never fails the batch.
//!
//! ffmpeg writes into a uniquely named temporary file inside the cache
//! directory which is then renamed onto the final entry name. Two callers
//! racing on the same uncached stream both do the work, but the entry is
//! replaced atomically and a cache lookup never sees a half-written file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;
use saru_core::config::SubtitleConfig;
use saru_core::SubtitleTrack;
use tokio::sync::Semaphore;

use crate::cache::SubtitleCache;
use crate::command::{ToolCommand, DEFAULT_TIMEOUT};
use crate::probe::ProbedStream;
use crate::tools::{ToolRegistry, FFMPEG};

/// Default cap on concurrent ffmpeg processes per video.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Extension of cached subtitle files.
const OUTPUT_EXT: &str = "vtt";

/// Materializes embedded subtitle streams as cached WebVTT files.
#[derive(Debug, Clone)]
pub struct SubtitleExtractor {
    ffmpeg_path: Option<PathBuf>,
    timeout: Duration,
    max_concurrent: usize,
}

impl SubtitleExtractor {
    /// Create an extractor using the given ffmpeg binary. `None` means ffmpeg
    /// is unavailable; only cache hits will produce tracks.
    pub fn new(ffmpeg_path: Option<PathBuf>) -> Self {
        Self {
            ffmpeg_path,
            timeout: DEFAULT_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Create an extractor from a discovered registry and subtitle settings.
    pub fn from_registry(tools: &ToolRegistry, config: &SubtitleConfig) -> Self {
        Self::new(tools.get(FFMPEG).map(Path::to_path_buf))
            .with_timeout(config.extraction_timeout())
            .with_max_concurrent(config.max_concurrent_extractions)
    }

    /// Per-stream ffmpeg time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cap on concurrently running ffmpeg processes. Zero is treated as one.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Produce a track for every stream that can be materialized.
    ///
    /// The result keeps the order of `streams`; failed streams are absent.
    /// The cache directory must already exist (see [`SubtitleCache::ensure`]).
    pub async fn extract_all(
        &self,
        video: &Path,
        streams: &[ProbedStream],
        cache: &SubtitleCache,
    ) -> Vec<SubtitleTrack> {
        let permits = Semaphore::new(self.max_concurrent);

        let jobs = streams
            .iter()
            .enumerate()
            .map(|(position, stream)| self.extract_one(video, stream, position, cache, &permits));

        join_all(jobs).await.into_iter().flatten().collect()
    }

    async fn extract_one(
        &self,
        video: &Path,
        stream: &ProbedStream,
        position: usize,
        cache: &SubtitleCache,
        permits: &Semaphore,
    ) -> Option<SubtitleTrack> {
        let language = stream
            .language
            .clone()
            .unwrap_or_else(|| format!("track{position}"));
        let title = stream
            .title
            .clone()
            .unwrap_or_else(|| format!("Subtitle {}", position + 1));
        let label = format!("{title} ({language})");
        let output = cache.entry_path(video, &language, position, OUTPUT_EXT);

        if cache.lookup(video, &output) {
            tracing::debug!("subtitle cache hit: {}", output.display());
            return Some(SubtitleTrack::subtitles(output, label, language));
        }

        let Some(ref ffmpeg) = self.ffmpeg_path else {
            tracing::warn!(
                "cannot extract subtitle track {position} (stream {}): {FFMPEG} not found",
                stream.index
            );
            return None;
        };

        let _permit = permits.acquire().await.ok()?;

        // Another call may have filled the entry while we waited.
        if cache.lookup(video, &output) {
            tracing::debug!("subtitle cache hit after wait: {}", output.display());
            return Some(SubtitleTrack::subtitles(output, label, language));
        }

        match self.transcode(ffmpeg, video, stream.index, cache.dir(), &output).await {
            Ok(()) => {
                tracing::info!(
                    "extracted subtitle track {position}: {}",
                    output.display()
                );
                Some(SubtitleTrack::subtitles(output, label, language))
            }
            Err(e) => {
                tracing::warn!(
                    "failed to extract subtitle track {position} (stream {}): {e}",
                    stream.index
                );
                None
            }
        }
    }

    async fn transcode(
        &self,
        ffmpeg: &Path,
        video: &Path,
        stream_index: u32,
        cache_dir: &Path,
        output: &Path,
    ) -> saru_core::Result<()> {
        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .suffix(&format!(".{OUTPUT_EXT}"))
            .tempfile_in(cache_dir)?
            .into_temp_path();

        let mut cmd = ToolCommand::new(ffmpeg.to_path_buf());
        cmd.args(["-hide_banner", "-loglevel", "error", "-y", "-i"]);
        cmd.arg(video.to_string_lossy().as_ref());
        cmd.args(["-map".to_string(), format!("0:{stream_index}")]);
        cmd.args(["-c:s", "webvtt", "-f", "webvtt"]);
        cmd.arg(partial.to_string_lossy().as_ref());
        cmd.timeout(self.timeout);
        cmd.execute().await?;

        // The temp file exists from the start, so an empty one means ffmpeg
        // exited cleanly without producing output.
        let written = std::fs::metadata(&partial).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(saru_core::Error::tool(
                FFMPEG,
                format!("no output written for stream {stream_index}"),
            ));
        }

        partial.persist(output).map_err(|e| saru_core::Error::Io { source: e.error })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saru_core::config::CachePolicy;
    use std::fs;

    fn stream(index: u32, language: Option<&str>, title: Option<&str>) -> ProbedStream {
        ProbedStream {
            index,
            codec_name: Some("subrip".into()),
            channels: None,
            language: language.map(Into::into),
            title: title.map(Into::into),
        }
    }

    #[tokio::test]
    async fn cache_hits_need_no_ffmpeg() {
        let tmp = tempfile::tempdir().unwrap();
        let video = tmp.path().join("movie.mkv");
        let cache = SubtitleCache::for_video(&video, ".saru2_subtitles", CachePolicy::Exists);
        cache.ensure().unwrap();

        let cached = cache.entry_path(&video, "eng", 0, "vtt");
        fs::write(&cached, "WEBVTT\n\n").unwrap();

        let extractor = SubtitleExtractor::new(None);
        let streams = [stream(2, Some("eng"), Some("English")), stream(3, None, None)];
        let tracks = extractor.extract_all(&video, &streams, &cache).await;

        // The second stream is uncached and ffmpeg is missing, so it drops out.
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].src, cached);
        assert_eq!(tracks[0].label, "English (eng)");
        assert_eq!(tracks[0].language, "eng");
    }

    #[tokio::test]
    async fn default_labels_use_position() {
        let tmp = tempfile::tempdir().unwrap();
        let video = tmp.path().join("clip.mp4");
        let cache = SubtitleCache::for_video(&video, ".saru2_subtitles", CachePolicy::Exists);
        cache.ensure().unwrap();
        fs::write(cache.entry_path(&video, "track1", 1, "vtt"), "WEBVTT\n\n").unwrap();

        let extractor = SubtitleExtractor::new(None);
        let streams = [stream(7, Some("fre"), None), stream(9, None, None)];
        let tracks = extractor.extract_all(&video, &streams, &cache).await;

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].label, "Subtitle 2 (track1)");
        assert_eq!(tracks[0].language, "track1");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_ffmpeg_drops_stream() {
        let tmp = tempfile::tempdir().unwrap();
        let video = tmp.path().join("movie.mkv");
        let cache = SubtitleCache::for_video(&video, ".saru2_subtitles", CachePolicy::Exists);
        cache.ensure().unwrap();

        let extractor = SubtitleExtractor::new(Some(PathBuf::from("false")));
        let tracks = extractor
            .extract_all(&video, &[stream(2, Some("eng"), None)], &cache)
            .await;
        assert!(tracks.is_empty());

        // No partial files are left behind.
        assert_eq!(fs::read_dir(cache.dir()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn clean_exit_without_output_drops_stream() {
        let tmp = tempfile::tempdir().unwrap();
        let video = tmp.path().join("movie.mkv");
        let cache = SubtitleCache::for_video(&video, ".saru2_subtitles", CachePolicy::Exists);
        cache.ensure().unwrap();

        // `true` exits 0 and writes nothing.
        let extractor = SubtitleExtractor::new(Some(PathBuf::from("true")));
        let tracks = extractor
            .extract_all(&video, &[stream(2, Some("eng"), None)], &cache)
            .await;
        assert!(tracks.is_empty());
        assert!(!cache.entry_path(&video, "eng", 0, "vtt").exists());
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let extractor = SubtitleExtractor::new(None).with_max_concurrent(0);
        assert_eq!(extractor.max_concurrent, 1);
    }
}
