//! Sidecar subtitle discovery.
//!
//! A sidecar is a subtitle file next to the video sharing its base name
//! (`movie.mkv` → `movie.srt`). Extensions are checked in a fixed priority
//! order. SRT sidecars are converted to WebVTT, WebVTT sidecars are used as
//! they are, and ASS/SSA sidecars are detected but not surfaced because no
//! converter exists for them yet.
//!
//! A converted SRT normally lands on `<stem>.vtt`. When the user already has
//! a `.vtt` sidecar it goes to `<stem>.srt.vtt` instead, so the user's file
//! is never overwritten.

use std::path::{Path, PathBuf};

use saru_core::SubtitleTrack;

use crate::convert::convert_srt_file_to;

/// Sidecar extensions in priority order.
pub const SIDECAR_EXTENSIONS: [&str; 4] = ["srt", "vtt", "ass", "ssa"];

/// Language reported for sidecar tracks, which carry no language metadata.
const UNKNOWN_LANGUAGE: &str = "unknown";

/// Find sidecar subtitles for `video`.
///
/// Presence of every extension is checked before any conversion runs, so a
/// `.vtt` written by converting the `.srt` is not reported a second time.
/// No de-duplication happens across extensions: a pre-existing `.srt` and
/// `.vtt` both produce a track, each backed by its own file.
pub fn find_external_subtitles(video: &Path) -> Vec<SubtitleTrack> {
    let present: Vec<(&str, PathBuf)> = SIDECAR_EXTENSIONS
        .iter()
        .map(|&ext| (ext, video.with_extension(ext)))
        .filter(|(_, path)| path.is_file())
        .collect();

    let has_vtt = present.iter().any(|(ext, _)| *ext == "vtt");

    let mut tracks = Vec::new();
    for (ext, path) in present {
        let label = format!("External Subtitles (.{ext})");
        match ext {
            "srt" => {
                let vtt_path = if has_vtt {
                    path.with_extension("srt.vtt")
                } else {
                    path.with_extension("vtt")
                };
                match convert_srt_file_to(&path, &vtt_path) {
                    Ok(()) => {
                        tracks.push(SubtitleTrack::subtitles(vtt_path, label, UNKNOWN_LANGUAGE));
                    }
                    Err(e) => tracing::warn!("skipping sidecar {}: {e}", path.display()),
                }
            }
            "vtt" => tracks.push(SubtitleTrack::subtitles(path, label, UNKNOWN_LANGUAGE)),
            _ => tracing::debug!(
                "found .{ext} sidecar {} but .{ext} is not supported yet",
                path.display()
            ),
        }
    }

    tracks
}
