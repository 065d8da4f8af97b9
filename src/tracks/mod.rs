//! Track aggregation.
//!
//! [`TrackService`] is the caller-facing entry point of the pipeline. It
//! probes a video, extracts embedded subtitles into the per-directory cache,
//! scans for sidecar subtitle files and enumerates audio streams.
//!
//! Every operation except [`TrackService::try_subtitles`] is total: probe,
//! extraction and conversion failures are logged and degrade to fewer (or
//! zero) tracks, so playback never waits on a broken track.

use std::path::Path;

use saru_av::{
    enumerate_audio_tracks, find_external_subtitles, FfprobeProber, StreamClass,
    SubtitleCache, SubtitleExtractor, ToolRegistry,
};
use saru_core::config::{CachePolicy, Config};
use saru_core::{AudioSwitchOutcome, AudioTrackDescriptor, SubtitleTrack, VideoSource};
use serde::Serialize;

/// Subtitle and audio tracks of one video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTracks {
    pub subtitles: Vec<SubtitleTrack>,
    pub audio_tracks: Vec<AudioTrackDescriptor>,
}

/// Discovers the subtitle and audio tracks of videos.
#[derive(Debug, Clone)]
pub struct TrackService {
    prober: FfprobeProber,
    extractor: SubtitleExtractor,
    cache_dir_name: String,
    cache_policy: CachePolicy,
}

impl TrackService {
    /// Build a service, discovering the external tools from `config.tools`.
    pub fn new(config: &Config) -> Self {
        let tools = ToolRegistry::discover(&config.tools);
        Self::with_tools(config, &tools)
    }

    /// Build a service around an already discovered tool registry.
    pub fn with_tools(config: &Config, tools: &ToolRegistry) -> Self {
        Self::from_parts(
            FfprobeProber::from_registry(tools, config.probe.timeout()),
            SubtitleExtractor::from_registry(tools, &config.subtitles),
            config,
        )
    }

    pub fn from_parts(prober: FfprobeProber, extractor: SubtitleExtractor, config: &Config) -> Self {
        Self {
            prober,
            extractor,
            cache_dir_name: config.subtitles.effective_cache_dir_name().to_string(),
            cache_policy: config.subtitles.cache_policy,
        }
    }

    /// Embedded subtitle tracks followed by sidecar tracks.
    ///
    /// Never fails. A cache directory that cannot be created is logged and
    /// yields an empty list.
    pub async fn subtitles(&self, source: &VideoSource) -> Vec<SubtitleTrack> {
        match self.try_subtitles(source).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::error!("subtitle discovery failed for {source}: {e}");
                Vec::new()
            }
        }
    }

    /// Like [`subtitles`](Self::subtitles), but reports a cache directory
    /// failure instead of swallowing it.
    ///
    /// # Errors
    ///
    /// Returns [`saru_core::Error::CacheDir`] if the cache directory next to
    /// the video cannot be created. All other failures still degrade to
    /// missing tracks.
    pub async fn try_subtitles(&self, source: &VideoSource) -> saru_core::Result<Vec<SubtitleTrack>> {
        let Some(video) = source.local_path() else {
            tracing::debug!("no subtitle discovery for remote source {source}");
            return Ok(Vec::new());
        };

        let cache = SubtitleCache::for_video(video, &self.cache_dir_name, self.cache_policy);
        cache.ensure()?;

        let streams = self
            .prober
            .probe_streams(video, StreamClass::Subtitle)
            .await
            .into_streams();
        let mut tracks = self.extractor.extract_all(video, &streams, &cache).await;

        tracks.extend(scan_sidecars(video).await);
        Ok(tracks)
    }

    /// Audio tracks in container order. Never fails.
    pub async fn audio_tracks(&self, source: &VideoSource) -> Vec<AudioTrackDescriptor> {
        let Some(video) = source.local_path() else {
            tracing::debug!("no audio discovery for remote source {source}");
            return Vec::new();
        };

        let streams = self
            .prober
            .probe_streams(video, StreamClass::Audio)
            .await
            .into_streams();
        enumerate_audio_tracks(&streams)
    }

    /// Subtitle and audio discovery run concurrently.
    pub async fn media_tracks(&self, source: &VideoSource) -> MediaTracks {
        let (subtitles, audio_tracks) =
            tokio::join!(self.subtitles(source), self.audio_tracks(source));
        MediaTracks {
            subtitles,
            audio_tracks,
        }
    }

    /// Acknowledge an audio track switch.
    ///
    /// Only the request is recorded; no remuxing happens and the outcome is
    /// always successful.
    pub fn switch_audio_track(&self, source: &VideoSource, track_index: usize) -> AudioSwitchOutcome {
        tracing::info!("audio track switch requested: track {track_index} for {source}");
        AudioSwitchOutcome {
            success: true,
            message: format!("Switched to audio track {track_index}"),
        }
    }
}

/// Sidecar scanning does blocking file I/O and may convert an SRT file.
async fn scan_sidecars(video: &Path) -> Vec<SubtitleTrack> {
    let video = video.to_path_buf();
    match tokio::task::spawn_blocking(move || find_external_subtitles(&video)).await {
        Ok(tracks) => tracks,
        Err(e) => {
            tracing::warn!("sidecar scan panicked: {e}");
            Vec::new()
        }
    }
}
