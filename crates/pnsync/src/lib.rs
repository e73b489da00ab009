//! pnsync: sample-accurate alignment of recorded audio against PN watermarks.
//!
//! A conformance capture contains the watermarked (PN) audio somewhere in
//! the middle of silence, noise and jitter. pnsync finds where each
//! reference PN segment starts and ends in the capture, trims the dead air
//! and timestamps every observation window of every reference segment.
//!
//! # Architecture
//!
//! ```text
//! recording ──┐
//!             ├──→ boundary::BoundaryFinder ──→ trim::Trimmer ──→ Trimmed
//! reference ──┘      (multi-window consensus)      │        │
//!                                                  │        └──→ TrimPlotSink (debug only)
//!                                                  ▼
//!                              decoder::SegmentDecoder (neighborhood search)
//!                                                  │
//!                                                  ▼
//!                               DecodeOutcome ──→ report::DecodeReport
//! ```
//!
//! All signal matching goes through the [`Correlator`] trait;
//! [`FftCorrelator`] is the default implementation.
//!
//! # Example
//!
//! ```no_run
//! use pnsync::{AlignmentConfig, FftCorrelator, SampleTiming, SegmentDecoder};
//!
//! # fn run(references: Vec<Vec<f32>>, recording: Vec<f32>) -> pnsync::SyncResult<()> {
//! let config = AlignmentConfig::default();
//! let timing = SampleTiming::new(48000, 0.02);
//! let decoder = SegmentDecoder::new(&FftCorrelator, &config);
//! let outcome = decoder.decode(0.0, &references, &recording, timing)?;
//! for segment in &outcome.segments {
//!     println!("{} @ {}ms", segment.content_id(), segment.audio_segment_timing());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod boundary;
pub mod config;
pub mod correlation;
pub mod decoder;
pub mod extraction;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;
pub mod result;
pub mod trim;
pub mod types;

pub use boundary::BoundaryFinder;
pub use config::{
    AlignmentConfig, SampleTiming, DEFAULT_CHECK_COUNT, DEFAULT_NEIGHBORHOOD_SECS,
    DEFAULT_TOLERANCE_SECS,
};
pub use correlation::{Correlator, DirectCorrelator, FftCorrelator};
pub use decoder::{neighborhood_window, SegmentDecoder};
pub use extraction::{extract_audio, load_audio, DEFAULT_SAMPLE_RATE};
#[cfg(feature = "plot")]
pub use plot::PngTrimPlot;
pub use report::{ContentSummary, DecodeReport};
pub use result::{SyncError, SyncResult};
pub use trim::{TrimPlotSink, Trimmed, Trimmer};
pub use types::{AnchorMode, AudioSegment, DecodeOutcome, TrimBoundaries};
