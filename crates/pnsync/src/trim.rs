//! Trim Orchestrator: cut a recording down to the watermarked region.
//!
//! Runs both boundary searches, copies the enclosed samples out and hands
//! the untouched recording to an optional [`TrimPlotSink`] for diagnostics.

use crate::boundary::BoundaryFinder;
use crate::config::{AlignmentConfig, SampleTiming};
use crate::correlation::Correlator;
use crate::result::SyncResult;
use crate::types::{AnchorMode, TrimBoundaries};
use tracing::{debug, warn, Level};

/// Diagnostic output for a computed trim.
///
/// Implementations receive the full recording and both boundaries. Errors
/// are logged and dropped by the caller; they never fail a trim.
pub trait TrimPlotSink {
    /// Persist a rendering of `subject` with markers at the boundaries.
    ///
    /// `index` is the position of the reference segment in the decode run.
    fn export(&self, index: usize, subject: &[f32], boundaries: TrimBoundaries) -> SyncResult<()>;
}

/// Samples cut out of a recording, with the boundaries that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct Trimmed {
    /// Independent copy of `subject[trim_from..trim_to]`
    pub samples: Vec<f32>,
    /// Boundaries found in the recording
    pub boundaries: TrimBoundaries,
}

impl Trimmed {
    /// Front offset of the kept region within the recording.
    #[must_use]
    pub const fn trim_from(&self) -> usize {
        self.boundaries.trim_from
    }
}

/// Trims a recording against one reference segment at a time.
pub struct Trimmer<'a, C: ?Sized> {
    correlator: &'a C,
    config: &'a AlignmentConfig,
    plot_sink: Option<&'a dyn TrimPlotSink>,
}

impl<C: ?Sized> std::fmt::Debug for Trimmer<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trimmer")
            .field("config", &self.config)
            .field("plot_sink", &self.plot_sink.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, C: Correlator + ?Sized> Trimmer<'a, C> {
    /// Create a trimmer without a diagnostic sink.
    pub fn new(correlator: &'a C, config: &'a AlignmentConfig) -> Self {
        Self {
            correlator,
            config,
            plot_sink: None,
        }
    }

    /// Install a diagnostic sink, used only while debug logging is enabled.
    #[must_use]
    pub fn with_plot_sink(mut self, sink: &'a dyn TrimPlotSink) -> Self {
        self.plot_sink = Some(sink);
        self
    }

    /// Front and tail boundaries of `segment` inside `subject`.
    ///
    /// The front boundary is extrapolated to the start of the reference.
    pub fn boundaries(
        &self,
        subject: &[f32],
        segment: &[f32],
        timing: SampleTiming,
    ) -> SyncResult<TrimBoundaries> {
        let finder = BoundaryFinder::new(self.correlator, timing, self.config);
        let trim_from = finder.find_trim_from(subject, segment, AnchorMode::Compensated)?;
        let trim_to = finder.find_trim_to(subject, segment)?;
        Ok(TrimBoundaries { trim_from, trim_to })
    }

    /// Copy the region of `subject` occupied by `segment`.
    ///
    /// `index` only labels diagnostic output.
    pub fn trim(
        &self,
        subject: &[f32],
        segment: &[f32],
        timing: SampleTiming,
        index: usize,
    ) -> SyncResult<Trimmed> {
        let boundaries = self.boundaries(subject, segment, timing)?;
        if boundaries.is_empty() {
            warn!(
                index,
                trim_from = boundaries.trim_from,
                trim_to = boundaries.trim_to,
                "trim range is empty"
            );
        }

        self.export_plot(index, subject, boundaries);

        Ok(Trimmed {
            samples: subject[boundaries.range()].to_vec(),
            boundaries,
        })
    }

    fn export_plot(&self, index: usize, subject: &[f32], boundaries: TrimBoundaries) {
        let Some(sink) = self.plot_sink else {
            return;
        };
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }
        match sink.export(index, subject, boundaries) {
            Ok(()) => debug!(index, "trim plot exported"),
            Err(e) => warn!(index, error = %e, "failed to export trim plot"),
        }
    }
}
