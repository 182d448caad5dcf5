/*!
 * Transcript segmentation.
 *
 * Turns the raw provider segments of a transcript into the ordered,
 * time-coded segments the rest of the pipeline works with. Consecutive
 * segments are stitched so that each one ends exactly where the next one
 * starts; the provider-reported bounds are kept alongside for offset math.
 */

use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::SegmentError;
use crate::timecode;

/// A raw segment as reported by a speech-to-text provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Spoken text, untrimmed
    pub text: String,
    /// Start in seconds
    pub start: f64,
    /// End in seconds
    pub end: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// One transcript unit after boundary stitching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Trimmed text
    pub text: String,
    /// Playback start
    pub start: Duration,
    /// Playback end; `None` for the last segment of a movie
    pub end: Option<Duration>,
    /// Start as originally reported by the provider
    pub duration_start: Duration,
    /// End as originally reported by the provider
    pub duration_end: Duration,
}

impl Segment {
    /// Concrete end used when cutting media
    pub fn playback_end(&self) -> Duration {
        self.end.unwrap_or(self.duration_end)
    }
}

/// Build stitched segments from provider output
///
/// Every segment's `end` is rewritten to the next segment's `start`; the last
/// segment keeps no `end`. Segments reported out of order are put back in start
/// order first, so stitched ends never precede their starts. Empty input means
/// the transcript is missing.
pub fn segment(provider_segments: &[TranscriptSegment]) -> Result<Vec<Segment>, SegmentError> {
    if provider_segments.is_empty() {
        return Err(SegmentError::MissingTranscript);
    }

    let mut segments: Vec<Segment> = provider_segments
        .iter()
        .map(|raw| {
            let start = timecode::from_seconds_f64(raw.start);
            let end = timecode::from_seconds_f64(raw.end);
            Segment {
                text: raw.text.trim().to_string(),
                start,
                end: Some(end),
                duration_start: start,
                duration_end: end,
            }
        })
        .collect();

    if segments.windows(2).any(|pair| pair[1].start < pair[0].start) {
        warn!("Transcript segments are out of order; sorting them by start time");
        segments.sort_by_key(|segment| segment.start);
    }

    let starts: Vec<Duration> = segments.iter().skip(1).map(|s| s.start).collect();
    for (segment, next_start) in segments.iter_mut().zip(starts) {
        segment.end = Some(next_start);
    }
    if let Some(last) = segments.last_mut() {
        last.end = None;
    }

    Ok(segments)
}
