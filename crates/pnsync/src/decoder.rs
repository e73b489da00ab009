//! Segment Decoder: timestamp every sub-segment of every reference segment.
//!
//! For each reference segment the recording is trimmed (see [`crate::trim`]),
//! then the reference is cut into observation-period templates. Each template
//! is only searched for in a neighborhood around its expected position in the
//! trimmed buffer, which keeps the cost per template independent of the
//! recording length.
//!
//! ```text
//! reference j   | t0 | t1 | t2 | ... | t(k-1) + leftover |
//! trimmed       [........................................]
//!                  ├──neighborhood──┤
//!                         └─ correlate t1 here only
//! ```

use crate::config::{AlignmentConfig, SampleTiming};
use crate::correlation::Correlator;
use crate::result::{SyncError, SyncResult};
use crate::trim::{TrimPlotSink, Trimmer};
use crate::types::{AudioSegment, DecodeOutcome};
use std::ops::Range;
use tracing::{debug, info};

/// Decodes a recording against an ordered list of reference segments.
pub struct SegmentDecoder<'a, C: ?Sized> {
    correlator: &'a C,
    config: &'a AlignmentConfig,
    plot_sink: Option<&'a dyn TrimPlotSink>,
}

impl<C: ?Sized> std::fmt::Debug for SegmentDecoder<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentDecoder")
            .field("config", &self.config)
            .field("plot_sink", &self.plot_sink.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, C: Correlator + ?Sized> SegmentDecoder<'a, C> {
    /// Create a decoder
    pub fn new(correlator: &'a C, config: &'a AlignmentConfig) -> Self {
        Self {
            correlator,
            config,
            plot_sink: None,
        }
    }

    /// Forward a diagnostic sink to every trim.
    #[must_use]
    pub fn with_plot_sink(mut self, sink: &'a dyn TrimPlotSink) -> Self {
        self.plot_sink = Some(sink);
        self
    }

    /// Locate every sub-segment of `references` inside `subject`.
    ///
    /// Records come out grouped by reference index (the `content_id`) and,
    /// within a group, in sub-segment order. `start_media_time` is the
    /// nominal playback position (seconds) of the first reference segment.
    ///
    /// # Errors
    ///
    /// [`SyncError::Alignment`] when any reference segment cannot be
    /// trimmed or its trimmed region is shorter than one neighborhood; the
    /// whole decode is abandoned in both cases.
    ///
    /// [`SyncError::InvalidConfig`] when the settings or timing are unusable,
    /// including a neighborhood narrower than one sample.
    pub fn decode<R: AsRef<[f32]>>(
        &self,
        start_media_time: f64,
        references: &[R],
        subject: &[f32],
        timing: SampleTiming,
    ) -> SyncResult<DecodeOutcome> {
        self.config.validate()?;
        timing.validate_neighborhood(self.config)?;

        let mut trimmer = Trimmer::new(self.correlator, self.config);
        if let Some(sink) = self.plot_sink {
            trimmer = trimmer.with_plot_sink(sink);
        }

        let period = timing.observation_period();
        let neighborhood = timing.neighborhood_samples(self.config);
        let window_secs = timing.audio_sample_length;

        let mut media_start = start_media_time;
        let mut outcome = DecodeOutcome::default();

        for (index, reference) in references.iter().enumerate() {
            let reference = reference.as_ref();
            let trimmed = trimmer.trim(subject, reference, timing, index)?;
            let anchor = trimmed.trim_from();
            outcome.first_offset.get_or_insert(anchor);

            let max_segments = reference.len() / period;
            info!(
                index,
                trim_from = anchor,
                trim_to = trimmed.boundaries.trim_to,
                sub_segments = max_segments,
                "reference segment trimmed"
            );

            let content_id = index.to_string();
            for i in 0..max_segments {
                if trimmed.samples.len() < neighborhood {
                    return Err(SyncError::alignment(format!(
                        "Too little valid data in the recorded audio: {} samples after trimming \
                         reference segment {index}, need at least {neighborhood}",
                        trimmed.samples.len()
                    )));
                }

                let window = neighborhood_window(i * period, neighborhood, trimmed.samples.len());
                let is_last = i + 1 == max_segments;
                let template = if is_last {
                    &reference[i * period..]
                } else {
                    &reference[i * period..(i + 1) * period]
                };

                let duration = timing.samples_to_secs(template.len());
                let media_time = media_start + i as f64 * window_secs;
                if is_last {
                    media_start += duration - window_secs;
                }

                let local = self
                    .correlator
                    .find_offset(&trimmed.samples[window.clone()], template);
                let position = local + window.start as isize + anchor as isize;
                let timing_ms = timing.offset_to_ms(position);
                debug!(index, sub_segment = i, position, timing_ms, "sub-segment matched");

                outcome.segments.push(AudioSegment::new(
                    content_id.clone(),
                    duration,
                    media_time,
                    timing_ms,
                ));
            }

            media_start += max_segments as f64 * window_secs;
        }

        Ok(outcome)
    }
}

/// Search window of `width` samples centred on `center` inside `0..len`.
///
/// The window is shifted, never shrunk, to stay inside the buffer. When
/// `len < width` the whole buffer is returned.
#[must_use]
pub fn neighborhood_window(center: usize, width: usize, len: usize) -> Range<usize> {
    if len <= width {
        return 0..len;
    }
    let start = center.saturating_sub(width / 2).min(len - width);
    start..start + width
}
