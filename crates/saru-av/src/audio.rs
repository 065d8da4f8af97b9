//! Audio track enumeration.

use saru_core::AudioTrackDescriptor;

use crate::probe::ProbedStream;

/// Normalize probed audio streams into display descriptors.
///
/// Output order and length match `streams`. Missing language tags become
/// `track<i>` and missing titles `Audio <i+1>`, where `i` is the position
/// among the audio streams.
pub fn enumerate_audio_tracks(streams: &[ProbedStream]) -> Vec<AudioTrackDescriptor> {
    streams
        .iter()
        .enumerate()
        .map(|(position, stream)| {
            let language = stream
                .language
                .clone()
                .unwrap_or_else(|| format!("track{position}"));
            let title = stream
                .title
                .clone()
                .unwrap_or_else(|| format!("Audio {}", position + 1));

            AudioTrackDescriptor {
                index: stream.index,
                track_index: position,
                label: format!("{title} ({language})"),
                language,
                codec: stream.codec_name.clone(),
                channels: stream.channels,
            }
        })
        .collect()
}
