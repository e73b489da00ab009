//! Trim-boundary search by multi-window consensus.
//!
//! A single correlation peak is not trustworthy: silence, noise and the
//! self-similarity of PN audio all produce spurious matches. The search
//! therefore splits the reference into consecutive observation windows and
//! only trusts an offset once three adjacent windows land in the recording
//! with the spacing the reference has, within the configured tolerance.
//!
//! ```text
//! reference  |  w0  |  w1  |  w2  |  w3  | ...
//!                 │      │      │
//! recording  ─────▼──────▼──────▼──────────────
//!              o0 ──gap── o1 ──gap── o2        gap ≈ observation period
//! ```

use crate::config::{AlignmentConfig, SampleTiming};
use crate::correlation::Correlator;
use crate::result::{SyncError, SyncResult};
use crate::types::AnchorMode;
use tracing::debug;

/// Adjacent-gap checks that must pass within one consensus pass.
const REQUIRED_ALIGNMENTS: usize = 2;

/// Locates the first and last reliable occurrence of a reference segment.
#[derive(Debug)]
pub struct BoundaryFinder<'a, C: ?Sized> {
    correlator: &'a C,
    timing: SampleTiming,
    config: &'a AlignmentConfig,
}

impl<'a, C: Correlator + ?Sized> BoundaryFinder<'a, C> {
    /// Create a finder for one timing/configuration pair.
    pub fn new(correlator: &'a C, timing: SampleTiming, config: &'a AlignmentConfig) -> Self {
        Self {
            correlator,
            timing,
            config,
        }
    }

    /// Offset in `subject` where the watermarked region starts.
    ///
    /// Pass `count` examines windows `count`, `count + 1` and `count + 2`
    /// from the front of `segment`. In [`AnchorMode::Compensated`] the first
    /// agreeing window's offset is moved back by `count` periods so it points
    /// at the start of the reference; [`AnchorMode::Exact`] keeps it as
    /// measured. The result is clamped to `0..=subject.len()`.
    pub fn find_trim_from(
        &self,
        subject: &[f32],
        segment: &[f32],
        mode: AnchorMode,
    ) -> SyncResult<usize> {
        let period = self.timing.observation_period();

        for count in 0..self.config.check_count {
            let mut offsets = WindowOffsets::new(self.correlator, subject, |i| {
                front_window(segment, period, i)
            });
            if let Some(first) = self.consensus(&mut offsets, count, Gap::Forward) {
                let anchor = match mode {
                    AnchorMode::Exact => first,
                    AnchorMode::Compensated => first - (period * count) as isize,
                };
                let trim_from = anchor.clamp(0, subject.len() as isize) as usize;
                debug!(count, first, anchor, trim_from, "front boundary found");
                return Ok(trim_from);
            }
        }

        Err(SyncError::alignment(format!(
            "Unable to align the start of the reference PN data with the recorded audio \
             after {} checks",
            self.config.check_count
        )))
    }

    /// Offset in `subject` where the watermarked region ends (exclusive).
    ///
    /// Mirrors [`Self::find_trim_from`] from the tail of `segment`: pass
    /// `count` (starting at 1) examines the `count`-th, `count + 1`-th and
    /// `count + 2`-th window from the end. The offset is always extrapolated
    /// to the end of the reference and clamped to `subject.len()`.
    pub fn find_trim_to(&self, subject: &[f32], segment: &[f32]) -> SyncResult<usize> {
        let period = self.timing.observation_period();

        for count in 1..=self.config.check_count {
            let mut offsets = WindowOffsets::new(self.correlator, subject, |i| {
                tail_window(segment, period, i)
            });
            if let Some(first) = self.consensus(&mut offsets, count, Gap::Backward) {
                let anchor = first + (period * count) as isize;
                let trim_to = anchor.clamp(0, subject.len() as isize) as usize;
                debug!(count, first, anchor, trim_to, "tail boundary found");
                return Ok(trim_to);
            }
        }

        Err(SyncError::alignment(format!(
            "Unable to align the end of the reference PN data with the recorded audio \
             after {} checks",
            self.config.check_count
        )))
    }

    /// Run one consensus pass starting at window `count`.
    ///
    /// Returns the measured offset of window `count` when two consecutive
    /// gaps agree with the observation period.
    fn consensus<'s, F>(
        &self,
        offsets: &mut WindowOffsets<'s, C, F>,
        count: usize,
        direction: Gap,
    ) -> Option<isize>
    where
        F: Fn(usize) -> Option<&'s [f32]>,
    {
        let period = self.timing.observation_period();
        let tolerance = self.timing.tolerance_samples(self.config);

        let mut alignment_count = 0;
        for i in count..count + REQUIRED_ALIGNMENTS {
            let (Some(o1), Some(o2)) = (offsets.get(i), offsets.get(i + 1)) else {
                debug!(count, window = i, "window outside reference");
                break;
            };
            let gap = match direction {
                Gap::Forward => o2 - o1,
                Gap::Backward => o1 - o2,
            };
            if !gap_consistent(gap, period, tolerance) {
                debug!(count, window = i, o1, o2, gap, period, tolerance, "gap rejected");
                break;
            }
            alignment_count += 1;
        }

        if alignment_count >= REQUIRED_ALIGNMENTS {
            offsets.get(count)
        } else {
            None
        }
    }
}

/// Which way the reference windows run through the recording.
#[derive(Clone, Copy, Debug)]
enum Gap {
    /// Window `i + 1` follows window `i`
    Forward,
    /// Window `i + 1` precedes window `i`
    Backward,
}

/// Whether a measured gap matches the observation period.
///
/// Negative gaps (windows out of order) never match.
pub(crate) fn gap_consistent(gap: isize, period: usize, tolerance: usize) -> bool {
    gap >= 0 && (gap - period as isize).unsigned_abs() <= tolerance
}

/// Window `index` counted from the front: `[index*p, (index+1)*p)`.
///
/// A short final window is kept; a window starting past the end is `None`.
pub(crate) fn front_window(segment: &[f32], period: usize, index: usize) -> Option<&[f32]> {
    let start = period.checked_mul(index)?;
    if start >= segment.len() {
        return None;
    }
    let end = start.saturating_add(period).min(segment.len());
    Some(&segment[start..end])
}

/// Window `index` (1-based) counted from the tail:
/// `[len - index*p, len - (index-1)*p)`, clamped at the start.
pub(crate) fn tail_window(segment: &[f32], period: usize, index: usize) -> Option<&[f32]> {
    let len = segment.len();
    let start = len.saturating_sub(period.saturating_mul(index));
    let end = len.saturating_sub(period.saturating_mul(index.saturating_sub(1)));
    if index == 0 || start >= end {
        return None;
    }
    Some(&segment[start..end])
}

/// Memoised offsets of reference windows within one pass.
///
/// Adjacent checks share a window, so each window is correlated once.
struct WindowOffsets<'s, C: ?Sized, F> {
    correlator: &'s C,
    subject: &'s [f32],
    window: F,
    cache: Vec<(usize, Option<isize>)>,
}

impl<'s, C, F> WindowOffsets<'s, C, F>
where
    C: Correlator + ?Sized,
    F: Fn(usize) -> Option<&'s [f32]>,
{
    fn new(correlator: &'s C, subject: &'s [f32], window: F) -> Self {
        Self {
            correlator,
            subject,
            window,
            cache: Vec::with_capacity(3),
        }
    }

    fn get(&mut self, index: usize) -> Option<isize> {
        if let Some(&(_, offset)) = self.cache.iter().find(|(i, _)| *i == index) {
            return offset;
        }
        let offset = (self.window)(index).map(|w| self.correlator.find_offset(self.subject, w));
        self.cache.push((index, offset));
        offset
    }
}
