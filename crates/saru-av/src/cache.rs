//! Per-directory subtitle cache.
//!
//! Every video directory gets one hidden cache directory holding extracted
//! subtitle files named `<videoName>_<language>_<position>.<ext>`. The name
//! alone identifies an entry: under [`CachePolicy::Exists`] any file at the
//! derived path is a hit, under [`CachePolicy::SourceModified`] the file must
//! also be at least as new as the video.

use std::fs;
use std::path::{Path, PathBuf};

use saru_core::config::CachePolicy;

/// Cache directory for the subtitles of videos in one directory.
#[derive(Debug, Clone)]
pub struct SubtitleCache {
    dir: PathBuf,
    policy: CachePolicy,
}

impl SubtitleCache {
    /// Cache for the directory containing `video`.
    pub fn for_video(video: &Path, dir_name: &str, policy: CachePolicy) -> Self {
        let parent = video
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self {
            dir: parent.join(dir_name),
            policy,
        }
    }

    /// Cache rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>, policy: CachePolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`saru_core::Error::CacheDir`] if the directory cannot be
    /// created.
    pub fn ensure(&self) -> saru_core::Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| saru_core::Error::CacheDir {
            path: self.dir.clone(),
            source,
        })
    }

    /// Path of the entry for `video`'s subtitle stream at `position` among
    /// its subtitle streams.
    pub fn entry_path(&self, video: &Path, language: &str, position: usize, ext: &str) -> PathBuf {
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());
        self.dir.join(format!(
            "{stem}_{}_{position}.{ext}",
            sanitize_component(language)
        ))
    }

    /// Whether `entry` counts as a cache hit for `video` under this cache's
    /// policy. Content is never inspected.
    pub fn lookup(&self, video: &Path, entry: &Path) -> bool {
        let Ok(entry_meta) = fs::metadata(entry) else {
            return false;
        };
        if !entry_meta.is_file() {
            return false;
        }

        match self.policy {
            CachePolicy::Exists => true,
            CachePolicy::SourceModified => {
                let source_mtime = fs::metadata(video).and_then(|m| m.modified());
                let entry_mtime = entry_meta.modified();
                match (source_mtime, entry_mtime) {
                    (Ok(source), Ok(entry)) => entry >= source,
                    // Without timestamps we cannot prove staleness.
                    _ => true,
                }
            }
        }
    }
}

/// Replace path separators so a tag value can never leave the cache
/// directory.
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}
