//! Shared test harness for integration tests.
//!
//! Provides [`FakeTools`], a scratch directory holding shell-script stand-ins
//! for ffprobe and ffmpeg. The fake ffprobe answers with canned JSON per
//! stream class; the fake ffmpeg writes a small WebVTT file to its last
//! argument. Both append their arguments to a log file so tests can count
//! invocations. While writing, the fake ffmpeg holds a lock directory; a run
//! that finds the lock taken records an overlap.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use saru::tracks::TrackService;
use saru_core::config::Config;
use tempfile::TempDir;

pub const EMPTY_STREAMS: &str = r#"{"streams": []}"#;

pub const TWO_SUBTITLES: &str = r#"{"streams": [
    {"index": 2, "codec_name": "subrip", "codec_type": "subtitle",
     "tags": {"language": "eng", "title": "English"}},
    {"index": 3, "codec_name": "ass", "codec_type": "subtitle"}
]}"#;

pub const ONE_SUBTITLE: &str = r#"{"streams": [
    {"index": 2, "codec_name": "subrip", "codec_type": "subtitle",
     "tags": {"language": "eng"}}
]}"#;

pub const THREE_SUBTITLES: &str = r#"{"streams": [
    {"index": 2, "codec_name": "subrip", "tags": {"language": "eng"}},
    {"index": 3, "codec_name": "subrip", "tags": {"language": "fre"}},
    {"index": 4, "codec_name": "subrip", "tags": {"language": "ger"}}
]}"#;

pub const THREE_AUDIO: &str = r#"{"streams": [
    {"index": 1, "codec_name": "truehd", "channels": 8, "tags": {"language": "eng", "title": "Atmos"}},
    {"index": 4, "codec_name": "ac3", "channels": 6, "tags": {"language": "jpn"}},
    {"index": 6, "codec_name": "aac", "channels": 2}
]}"#;

pub const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:02,500\nHello\n";

/// Fake media tools living in a temporary directory.
pub struct FakeTools {
    pub dir: TempDir,
    pub ffprobe: PathBuf,
    pub ffmpeg: PathBuf,
    ffmpeg_log: PathBuf,
    overlap_log: PathBuf,
}

/// How the fake tools behave.
#[derive(Debug, Clone)]
pub struct FakeSetup {
    pub subtitle_json: String,
    pub audio_json: String,
    pub probe_exit: i32,
    /// Stream index the fake ffmpeg refuses to extract.
    pub failing_stream: Option<u32>,
    /// Seconds the fake ffmpeg sleeps before writing output.
    pub ffmpeg_delay: f32,
}

impl Default for FakeSetup {
    fn default() -> Self {
        Self {
            subtitle_json: EMPTY_STREAMS.into(),
            audio_json: EMPTY_STREAMS.into(),
            probe_exit: 0,
            failing_stream: None,
            ffmpeg_delay: 0.0,
        }
    }
}

impl FakeTools {
    pub fn new(setup: FakeSetup) -> Self {
        let dir = tempfile::tempdir().expect("failed to create tool dir");
        let root = dir.path();

        let subs_json = root.join("subtitles.json");
        let audio_json = root.join("audio.json");
        fs::write(&subs_json, &setup.subtitle_json).unwrap();
        fs::write(&audio_json, &setup.audio_json).unwrap();

        let ffprobe_log = root.join("ffprobe.log");
        let ffmpeg_log = root.join("ffmpeg.log");
        let overlap_log = root.join("overlap.log");
        let lock_dir = root.join("ffmpeg.lock");

        let ffprobe = root.join("ffprobe");
        write_script(
            &ffprobe,
            &format!(
                r#"#!/bin/sh
echo "$@" >> "{log}"
sel=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-select_streams" ]; then sel="$2"; fi
  shift
done
if [ {exit} -ne 0 ]; then
  echo "probe failure" >&2
  exit {exit}
fi
case "$sel" in
  s) cat "{subs}" ;;
  a) cat "{audio}" ;;
  *) echo '{{"streams": []}}' ;;
esac
"#,
                log = ffprobe_log.display(),
                exit = setup.probe_exit,
                subs = subs_json.display(),
                audio = audio_json.display(),
            ),
        );

        let fail_map = setup
            .failing_stream
            .map(|i| format!("0:{i}"))
            .unwrap_or_else(|| "none".into());
        let ffmpeg = root.join("ffmpeg");
        write_script(
            &ffmpeg,
            &format!(
                r#"#!/bin/sh
echo "$@" >> "{log}"
for arg in "$@"; do
  if [ "$arg" = "{fail_map}" ]; then
    echo "Stream map '{fail_map}' matches no streams." >&2
    exit 1
  fi
done
for last; do :; done
if mkdir "{lock}" 2>/dev/null; then
  held=1
else
  held=0
  echo overlap >> "{overlap}"
fi
sleep {delay}
printf 'WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n' > "$last"
if [ $held -eq 1 ]; then rmdir "{lock}"; fi
"#,
                log = ffmpeg_log.display(),
                fail_map = fail_map,
                lock = lock_dir.display(),
                overlap = overlap_log.display(),
                delay = setup.ffmpeg_delay,
            ),
        );

        Self {
            dir,
            ffprobe,
            ffmpeg,
            ffmpeg_log,
            overlap_log,
        }
    }

    /// Config pointing the tool overrides at the fakes.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.tools.ffprobe_path = Some(self.ffprobe.clone());
        config.tools.ffmpeg_path = Some(self.ffmpeg.clone());
        config
    }

    pub fn service(&self) -> TrackService {
        TrackService::new(&self.config())
    }

    /// Number of times the fake ffmpeg has been run.
    pub fn ffmpeg_calls(&self) -> usize {
        count_lines(&self.ffmpeg_log)
    }

    /// Number of fake ffmpeg runs that started while another was running.
    pub fn ffmpeg_overlaps(&self) -> usize {
        count_lines(&self.overlap_log)
    }
}

fn count_lines(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// A scratch directory holding an (empty) video file.
pub fn video_dir(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create video dir");
    let video = dir.path().join(name);
    fs::write(&video, b"").unwrap();
    (dir, video)
}

/// File names in `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
