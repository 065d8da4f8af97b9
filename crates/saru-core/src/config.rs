//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML by the `saru`
//! binary and carries the sub-configs for tool lookup, probing, subtitle
//! extraction, and remote stream resolution. Every section defaults sensibly
//! so a completely empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub probe: ProbeConfig,
    pub subtitles: SubtitleConfig,
    pub stream: StreamConfig,
}

impl Config {
    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let overrides = [
            ("tools.ffmpeg_path", &self.tools.ffmpeg_path),
            ("tools.ffprobe_path", &self.tools.ffprobe_path),
            ("tools.ytdlp_path", &self.tools.ytdlp_path),
        ];
        for (key, path) in overrides {
            if let Some(p) = path {
                if !p.exists() {
                    warnings.push(format!(
                        "{key} {} does not exist; falling back to lookup",
                        p.display()
                    ));
                }
            }
        }

        if let Some(ref dir) = self.tools.bundled_dir {
            if !dir.is_dir() {
                warnings.push(format!("tools.bundled_dir {} is not a directory", dir.display()));
            }
        }

        if self.subtitles.max_concurrent_extractions == 0 {
            warnings.push(
                "subtitles.max_concurrent_extractions is 0; extractions will run one at a time"
                    .into(),
            );
        }

        let name = &self.subtitles.cache_dir_name;
        if self.subtitles.effective_cache_dir_name() != name.as_str() {
            warnings.push(format!(
                "subtitles.cache_dir_name '{name}' is not a plain directory name; using the default"
            ));
        }

        if self.probe.timeout_secs == 0 {
            warnings.push("probe.timeout_secs is 0; every probe will time out".into());
        }

        if self.stream.resolve_timeout_secs == 0 {
            warnings.push("stream.resolve_timeout_secs is 0; every resolve will time out".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Locations of external CLI tools.
///
/// An explicit `*_path` override wins when it exists. Otherwise the tool is
/// looked up in `bundled_dir` (with the platform executable suffix) and
/// finally on `PATH`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub ytdlp_path: Option<PathBuf>,
    pub bundled_dir: Option<PathBuf>,
}

/// Stream probing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// When a cached subtitle file counts as valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Any existing file at the derived path is a hit.
    #[default]
    Exists,
    /// A file is a hit only if it is at least as new as the video.
    SourceModified,
}

/// Embedded subtitle extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    /// Name of the hidden cache directory created next to each video.
    pub cache_dir_name: String,
    pub max_concurrent_extractions: usize,
    pub extraction_timeout_secs: u64,
    pub cache_policy: CachePolicy,
}

pub const DEFAULT_CACHE_DIR_NAME: &str = ".saru2_subtitles";

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            cache_dir_name: DEFAULT_CACHE_DIR_NAME.into(),
            max_concurrent_extractions: 4,
            extraction_timeout_secs: 300,
            cache_policy: CachePolicy::Exists,
        }
    }
}

impl SubtitleConfig {
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// The cache directory name, or the default if the configured one is not
    /// a plain single-component name.
    pub fn effective_cache_dir_name(&self) -> &str {
        let name = self.cache_dir_name.as_str();
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if plain {
            name
        } else {
            DEFAULT_CACHE_DIR_NAME
        }
    }
}

/// Remote stream resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub resolve_timeout_secs: u64,
    /// yt-dlp format selector.
    pub format: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_secs: 30,
            format: "best[height<=720]".into(),
        }
    }
}

impl StreamConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = Config::default();
        assert_eq!(cfg.subtitles.cache_dir_name, ".saru2_subtitles");
        assert_eq!(cfg.subtitles.max_concurrent_extractions, 4);
        assert_eq!(cfg.subtitles.cache_policy, CachePolicy::Exists);
        assert_eq!(cfg.probe.timeout(), Duration::from_secs(60));
        assert_eq!(cfg.stream.resolve_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.stream.format, "best[height<=720]");
        assert!(cfg.tools.ffprobe_path.is_none());
    }

    #[test]
    fn default_config_no_warnings() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn missing_tool_override_warns() {
        let mut cfg = Config::default();
        cfg.tools.ffprobe_path = Some(PathBuf::from("/definitely/not/here/ffprobe"));
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("tools.ffprobe_path")));
    }

    #[test]
    fn zero_concurrency_warns() {
        let mut cfg = Config::default();
        cfg.subtitles.max_concurrent_extractions = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("max_concurrent_extractions")));
    }

    #[test]
    fn nested_cache_dir_name_falls_back() {
        let mut cfg = Config::default();
        cfg.subtitles.cache_dir_name = "../escape".into();
        assert!(cfg.validate().iter().any(|w| w.contains("cache_dir_name")));
        assert_eq!(cfg.subtitles.effective_cache_dir_name(), DEFAULT_CACHE_DIR_NAME);

        cfg.subtitles.cache_dir_name = ".subs".into();
        assert_eq!(cfg.subtitles.effective_cache_dir_name(), ".subs");
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.subtitles.cache_dir_name, ".saru2_subtitles");
        assert_eq!(cfg.stream.resolve_timeout_secs, 30);
    }

    #[test]
    fn parse_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
            [subtitles]
            max_concurrent_extractions = 2
            cache_policy = "source_modified"

            [tools]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.subtitles.max_concurrent_extractions, 2);
        assert_eq!(cfg.subtitles.cache_policy, CachePolicy::SourceModified);
        assert_eq!(cfg.subtitles.extraction_timeout_secs, 300);
        assert_eq!(
            cfg.tools.ffmpeg_path,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
    }

    #[test]
    fn config_roundtrips_through_json() {
        let cfg = Config::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.subtitles.cache_dir_name, cfg.subtitles.cache_dir_name);
    }
}
