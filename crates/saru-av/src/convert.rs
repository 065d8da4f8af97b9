//! SRT to WebVTT conversion.
//!
//! The conversion is textual and deliberately shallow: it adds the WebVTT
//! header, switches the millisecond separator of every `H:MM:SS,mmm`
//! timestamp from comma to dot, and blanks out cue number lines. Cue text,
//! styling tags and blank-line structure pass through untouched.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Header line every WebVTT document must start with.
pub const VTT_HEADER: &str = "WEBVTT";

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Word boundaries keep the rewrite off longer digit runs such as
    // "1234:56:78,9012", while still matching timestamps anywhere in a line.
    RE.get_or_init(|| Regex::new(r"\b(\d+:\d{2}:\d{2}),(\d{3})\b").expect("valid regex"))
}

fn cue_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\d+\s*$").expect("valid regex"))
}

/// Convert SRT text to WebVTT text.
pub fn srt_to_vtt(srt: &str) -> String {
    let srt = srt.strip_prefix('\u{feff}').unwrap_or(srt);
    let body = timestamp_re().replace_all(srt, "$1.$2");
    let body = cue_number_re().replace_all(&body, "");

    let mut vtt = String::with_capacity(VTT_HEADER.len() + 2 + body.len());
    vtt.push_str(VTT_HEADER);
    vtt.push_str("\n\n");
    vtt.push_str(&body);
    vtt
}

/// Convert an `.srt` file to a sibling `.vtt` file and return its path.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected. An
/// existing `.vtt` with the same stem is overwritten; use
/// [`convert_srt_file_to`] to pick another output.
///
/// # Errors
///
/// Returns [`saru_core::Error::Conversion`] if the source cannot be read or
/// the output cannot be written.
pub fn convert_srt_file(srt_path: &Path) -> saru_core::Result<PathBuf> {
    let vtt_path = srt_path.with_extension("vtt");
    convert_srt_file_to(srt_path, &vtt_path)?;
    Ok(vtt_path)
}

/// Convert an `.srt` file, writing the WebVTT document to `vtt_path`.
///
/// # Errors
///
/// Same as [`convert_srt_file`].
pub fn convert_srt_file_to(srt_path: &Path, vtt_path: &Path) -> saru_core::Result<()> {
    let bytes = fs::read(srt_path)
        .map_err(|e| saru_core::Error::conversion(srt_path, format!("read failed: {e}")))?;
    let vtt = srt_to_vtt(&String::from_utf8_lossy(&bytes));

    fs::write(vtt_path, vtt)
        .map_err(|e| saru_core::Error::conversion(srt_path, format!("write failed: {e}")))
}
