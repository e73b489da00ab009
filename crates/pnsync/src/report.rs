//! Summaries of a decode run for people and downstream tooling.

use crate::config::SampleTiming;
use crate::types::{AudioSegment, DecodeOutcome};
use serde::Serialize;
use std::fmt::Write as _;

/// Per-reference summary inside a [`DecodeReport`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentSummary {
    /// Reference segment index as text
    pub content_id: String,
    /// Sub-segments detected for this reference
    pub segment_count: usize,
    /// Timing of the first sub-segment (ms)
    pub first_timing_ms: f64,
    /// Timing of the last sub-segment (ms)
    pub last_timing_ms: f64,
}

/// Decode outcome plus derived figures used by reporting layers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodeReport {
    /// Sample rate of the run (Hz)
    pub sample_rate: u32,
    /// Observation window length (seconds)
    pub audio_sample_length: f64,
    /// Front trim of the first reference segment (samples)
    pub first_offset: Option<usize>,
    /// Same offset in milliseconds, for aligning with other modalities
    pub first_offset_ms: Option<f64>,
    /// Total sub-segments detected
    pub segment_count: usize,
    /// One entry per reference segment, in decode order
    pub contents: Vec<ContentSummary>,
    /// Every detected sub-segment
    pub segments: Vec<AudioSegment>,
}

impl DecodeReport {
    /// Build a report from a decode outcome.
    #[must_use]
    pub fn new(outcome: &DecodeOutcome, timing: SampleTiming) -> Self {
        let mut contents: Vec<ContentSummary> = Vec::new();
        for segment in &outcome.segments {
            let timing_ms = segment.audio_segment_timing();
            match contents.last_mut() {
                Some(summary) if summary.content_id == segment.content_id() => {
                    summary.segment_count += 1;
                    summary.last_timing_ms = timing_ms;
                }
                _ => contents.push(ContentSummary {
                    content_id: segment.content_id().to_string(),
                    segment_count: 1,
                    first_timing_ms: timing_ms,
                    last_timing_ms: timing_ms,
                }),
            }
        }

        Self {
            sample_rate: timing.sample_rate,
            audio_sample_length: timing.audio_sample_length,
            first_offset: outcome.first_offset,
            first_offset_ms: outcome
                .first_offset
                .map(|o| timing.offset_to_ms(o as isize)),
            segment_count: outcome.segments.len(),
            contents,
            segments: outcome.segments.clone(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report; `detailed` adds one line per sub-segment.
    #[must_use]
    pub fn render_text(&self, detailed: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Audio decode: {} segments ({} Hz, {}s windows)",
            self.segment_count, self.sample_rate, self.audio_sample_length
        );
        match (self.first_offset, self.first_offset_ms) {
            (Some(samples), Some(ms)) => {
                let _ = writeln!(out, "First offset: {samples} samples ({ms:.3}ms)");
            }
            _ => out.push_str("First offset: none\n"),
        }

        for content in &self.contents {
            let _ = writeln!(
                out,
                "  content {}: {} segments, {:.3}ms .. {:.3}ms",
                content.content_id,
                content.segment_count,
                content.first_timing_ms,
                content.last_timing_ms
            );
            if detailed {
                for segment in self
                    .segments
                    .iter()
                    .filter(|s| s.content_id() == content.content_id)
                {
                    let _ = writeln!(
                        out,
                        "    media {:>9.3}s  timing {:>11.3}ms  duration {:.3}s",
                        segment.media_time(),
                        segment.audio_segment_timing(),
                        segment.duration()
                    );
                }
            }
        }
        out
    }
}
