//! Unified error type for the saru track pipeline.
//!
//! Most failures inside the pipeline are absorbed close to where they happen
//! (a broken subtitle stream simply yields no track). The variants below are
//! what remains visible at component boundaries; [`Error::is_cache_dir`]
//! lets callers single out the one failure kind that aborts subtitle
//! discovery instead of degrading it.

use std::path::PathBuf;
use std::time::Duration;

/// Unified error type covering all failure modes in saru.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool is not installed or could not be started.
    #[error("Tool unavailable [{tool}]: {message}")]
    ToolUnavailable {
        /// Name of the tool that could not be run.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An external tool ran but reported failure.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An external tool exceeded its time budget and was killed.
    #[error("Tool timeout [{tool}]: timed out after {after:?}")]
    Timeout {
        /// Name of the tool that timed out.
        tool: String,
        /// The timeout that elapsed.
        after: Duration,
    },

    /// Probe output could not be interpreted.
    #[error("Probe error: {0}")]
    Probe(String),

    /// The subtitle cache directory could not be created.
    #[error("Cache directory error at {}: {source}", path.display())]
    CacheDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A subtitle file could not be converted.
    #[error("Conversion error for {}: {message}", path.display())]
    Conversion {
        /// The source subtitle file.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// A remote stream URL could not be resolved to a playable media URL.
    #[error("Resolve error: {0}")]
    Resolve(String),
}

impl Error {
    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::ToolUnavailable`].
    pub fn tool_unavailable(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ToolUnavailable {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Conversion`].
    pub fn conversion(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Conversion {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True when the error means the tool could not be run at all, as opposed
    /// to having run and failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::ToolUnavailable { .. })
    }

    /// True for cache directory failures, the only error that aborts subtitle
    /// discovery for a video.
    pub fn is_cache_dir(&self) -> bool {
        matches!(self, Error::CacheDir { .. })
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
