//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external
//! CLI tools the pipeline drives (ffmpeg, ffprobe, yt-dlp) and provides
//! lookup methods for the rest of the crate.
//!
//! Lookup never hardcodes an OS layout. For each tool the registry tries, in
//! order: the explicit path override from [`ToolsConfig`], the configured
//! bundled directory (with the platform executable suffix, e.g. `.exe` on
//! Windows), and finally `PATH` via [`which`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use saru_core::config::ToolsConfig;
use serde::{Deserialize, Serialize};

pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";
pub const YTDLP: &str = "yt-dlp";

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &[FFMPEG, FFPROBE, YTDLP];

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `--version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, PathBuf>,
}

impl ToolRegistry {
    /// Discover tools using config overrides, the bundled directory, and
    /// `PATH`. Tools that are not found are silently omitted.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                FFMPEG => tools_config.ffmpeg_path.as_deref(),
                FFPROBE => tools_config.ffprobe_path.as_deref(),
                YTDLP => tools_config.ytdlp_path.as_deref(),
                _ => None,
            };

            let bundled_dir = tools_config.bundled_dir.as_deref();
            if let Some(path) = resolve_tool(name, custom_path, bundled_dir) {
                tracing::debug!("resolved {name} at {}", path.display());
                tools.insert(name.to_string(), path);
            } else {
                tracing::debug!("{name} not found");
            }
        }

        Self { tools }
    }

    /// Location of the given tool, if it was found during discovery.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.tools.get(name).map(PathBuf::as_path)
    }

    /// Location of the given tool, or [`saru_core::Error::ToolUnavailable`]
    /// if the tool was not found during discovery.
    pub fn require(&self, name: &str) -> saru_core::Result<&Path> {
        self.get(name).ok_or_else(|| {
            saru_core::Error::tool_unavailable(
                name,
                format!("{name} not found; is it installed and in PATH?"),
            )
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(path) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(name, path),
                    path: Some(path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

fn resolve_tool(
    name: &str,
    custom_path: Option<&Path>,
    bundled_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(p) = custom_path {
        if p.exists() {
            return Some(p.to_path_buf());
        }
        tracing::warn!(
            "configured {name} path {} does not exist; falling back",
            p.display()
        );
    }

    if let Some(dir) = bundled_dir {
        let candidate = dir.join(executable_name(name));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    which::which(name).ok()
}

/// File name of an executable on the current platform.
pub fn executable_name(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

/// Run `<tool> --version` (or `-version` for ffmpeg/ffprobe) and return the
/// first line of stdout.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        FFMPEG | FFPROBE => "-version",
        _ => "--version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_with_default_config() {
        let cfg = ToolsConfig::default();
        let registry = ToolRegistry::discover(&cfg);
        // We cannot guarantee any tool is installed in CI,
        // but the call itself must not panic.
        let _ = registry.check_all();
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::default();
        let err = registry.require(FFPROBE).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn check_all_returns_known_tools() {
        let registry = ToolRegistry::default();
        let infos = registry.check_all();
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["ffmpeg", "ffprobe", "yt-dlp"]);
        assert!(infos.iter().all(|i| !i.available));
    }

    #[test]
    fn override_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("my-ffprobe");
        std::fs::write(&fake, b"").unwrap();

        let cfg = ToolsConfig {
            ffprobe_path: Some(fake.clone()),
            ..Default::default()
        };
        let registry = ToolRegistry::discover(&cfg);
        assert_eq!(registry.get(FFPROBE), Some(fake.as_path()));
    }

    #[test]
    fn bundled_dir_uses_platform_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let bundled = dir.path().join(executable_name(YTDLP));
        std::fs::write(&bundled, b"").unwrap();

        let cfg = ToolsConfig {
            ytdlp_path: Some(dir.path().join("missing")),
            bundled_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let registry = ToolRegistry::discover(&cfg);
        assert_eq!(registry.require(YTDLP).unwrap(), bundled.as_path());
    }

    #[test]
    fn executable_name_suffix() {
        let name = executable_name(FFMPEG);
        if cfg!(windows) {
            assert_eq!(name, "ffmpeg.exe");
        } else {
            assert_eq!(name, "ffmpeg");
        }
    }
}
