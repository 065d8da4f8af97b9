//! Caller-facing media types: video sources and the normalized track
//! descriptions handed to a playback surface.
//!
//! The serialized field names (`src`, `srclang`, `trackIndex`, ...) are the
//! shape the player UI consumes and must stay stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// VideoSource
// ---------------------------------------------------------------------------

/// Something the player can open: a local file or a remote stream URL.
///
/// Only local files take part in track discovery; remote sources always
/// yield empty track lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "location", rename_all = "lowercase")]
pub enum VideoSource {
    Local(PathBuf),
    Remote(String),
}

impl VideoSource {
    /// Classify user input: `http://` and `https://` URLs are remote,
    /// everything else is treated as a filesystem path.
    ///
    /// Surrounding whitespace is dropped from URLs only; a local path is
    /// taken verbatim since file names may start or end with spaces.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            VideoSource::Remote(trimmed.to_string())
        } else {
            VideoSource::Local(PathBuf::from(input))
        }
    }

    /// The local path, if this is a local source.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            VideoSource::Local(p) => Some(p),
            VideoSource::Remote(_) => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, VideoSource::Remote(_))
    }
}

impl From<PathBuf> for VideoSource {
    fn from(path: PathBuf) -> Self {
        VideoSource::Local(path)
    }
}

impl From<&Path> for VideoSource {
    fn from(path: &Path) -> Self {
        VideoSource::Local(path.to_path_buf())
    }
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(p) => write!(f, "{}", p.display()),
            Self::Remote(u) => write!(f, "{u}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TrackKind
// ---------------------------------------------------------------------------

/// Text track kind, mirroring the HTML `<track kind>` vocabulary.
///
/// Discovery only produces [`TrackKind::Subtitles`] today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Subtitles,
    Captions,
    Descriptions,
    Chapters,
    Metadata,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subtitles => write!(f, "subtitles"),
            Self::Captions => write!(f, "captions"),
            Self::Descriptions => write!(f, "descriptions"),
            Self::Chapters => write!(f, "chapters"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

// ---------------------------------------------------------------------------
// SubtitleTrack
// ---------------------------------------------------------------------------

/// A displayable subtitle file ready for the playback surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Path of the WebVTT file (cache entry or sidecar).
    pub src: PathBuf,
    pub label: String,
    #[serde(rename = "srclang")]
    pub language: String,
    pub kind: TrackKind,
}

impl SubtitleTrack {
    /// Build a subtitle track of kind [`TrackKind::Subtitles`].
    pub fn subtitles(
        src: impl Into<PathBuf>,
        label: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            src: src.into(),
            label: label.into(),
            language: language.into(),
            kind: TrackKind::Subtitles,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioTrackDescriptor
// ---------------------------------------------------------------------------

/// One audio stream of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrackDescriptor {
    /// Container stream index.
    pub index: u32,
    /// Zero-based position among the container's audio streams.
    pub track_index: usize,
    pub label: String,
    pub language: String,
    pub codec: Option<String>,
    pub channels: Option<u32>,
}

// ---------------------------------------------------------------------------
// AudioSwitchOutcome
// ---------------------------------------------------------------------------

/// Acknowledgment returned for an audio track switch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSwitchOutcome {
    pub success: bool,
    pub message: String,
}
