//! Value types produced by trimming and decoding.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One detected sub-segment of a reference PN segment.
///
/// Built once by the decoder and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioSegment {
    content_id: String,
    duration: f64,
    media_time: f64,
    audio_segment_timing: f64,
}

impl AudioSegment {
    /// Create a segment record.
    #[must_use]
    pub fn new(
        content_id: impl Into<String>,
        duration: f64,
        media_time: f64,
        audio_segment_timing: f64,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            duration,
            media_time,
            audio_segment_timing,
        }
    }

    /// Index of the reference segment this record came from, as text
    #[must_use]
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// Length of the matched template (seconds)
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Nominal position on the expected playback timeline (seconds)
    #[must_use]
    pub const fn media_time(&self) -> f64 {
        self.media_time
    }

    /// Measured position within the untrimmed recording (milliseconds)
    #[must_use]
    pub const fn audio_segment_timing(&self) -> f64 {
        self.audio_segment_timing
    }
}

/// How the front boundary reports the window that reached consensus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorMode {
    /// Extrapolate back to where the reference segment starts, compensating
    /// for the windows skipped before consensus was reached.
    #[default]
    Compensated,
    /// Report the measured offset of the first agreeing window as is.
    Exact,
}

/// Front and tail boundaries of the watermarked region of a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimBoundaries {
    /// First sample kept (inclusive)
    pub trim_from: usize,
    /// End of the kept region (exclusive)
    pub trim_to: usize,
}

impl TrimBoundaries {
    /// Number of samples between the boundaries, zero when they cross.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.trim_to.saturating_sub(self.trim_from)
    }

    /// Whether the boundaries enclose no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample range to copy out of the recording.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        if self.is_empty() {
            self.trim_from..self.trim_from
        } else {
            self.trim_from..self.trim_to
        }
    }
}

/// Result of decoding a recording against a list of reference segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeOutcome {
    /// Front trim offset (samples) of the first reference segment, used to
    /// line audio up with other modalities. `None` only without references.
    pub first_offset: Option<usize>,
    /// Detected sub-segments in reference order, then sub-segment order
    pub segments: Vec<AudioSegment>,
}

impl DecodeOutcome {
    /// Segments that came from one reference segment.
    pub fn segments_for<'a>(
        &'a self,
        content_id: &'a str,
    ) -> impl Iterator<Item = &'a AudioSegment> {
        self.segments
            .iter()
            .filter(move |s| s.content_id() == content_id)
    }
}
