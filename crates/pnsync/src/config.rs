//! Alignment configuration and sample/time conversions.

use crate::result::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};

/// Default gap tolerance between adjacent windows (seconds)
pub const DEFAULT_TOLERANCE_SECS: f64 = 0.02;

/// Default number of consensus passes before giving up
pub const DEFAULT_CHECK_COUNT: usize = 10;

/// Default neighborhood searched around each expected sub-segment (seconds)
pub const DEFAULT_NEIGHBORHOOD_SECS: f64 = 1.0;

/// Guards float products such as `48000 * 0.02` against landing a hair
/// below the integer they represent before flooring.
const SAMPLE_EPSILON: f64 = 1e-9;

/// Immutable alignment settings passed into every search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Allowed deviation of a measured window gap from the observation period (seconds)
    pub tolerance_secs: f64,
    /// Number of consensus passes tried per boundary
    pub check_count: usize,
    /// Width of the search window around each expected sub-segment (seconds)
    pub neighborhood_secs: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            check_count: DEFAULT_CHECK_COUNT,
            neighborhood_secs: DEFAULT_NEIGHBORHOOD_SECS,
        }
    }
}

impl AlignmentConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap tolerance in seconds.
    #[must_use]
    pub const fn with_tolerance_secs(mut self, tolerance_secs: f64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Set the number of consensus passes.
    #[must_use]
    pub const fn with_check_count(mut self, check_count: usize) -> Self {
        self.check_count = check_count;
        self
    }

    /// Set the neighborhood width in seconds.
    #[must_use]
    pub const fn with_neighborhood_secs(mut self, neighborhood_secs: f64) -> Self {
        self.neighborhood_secs = neighborhood_secs;
        self
    }

    /// Reject values the search cannot work with.
    pub fn validate(&self) -> SyncResult<()> {
        if self.check_count == 0 {
            return Err(SyncError::invalid_config("check_count must be at least 1"));
        }
        if !self.tolerance_secs.is_finite() || self.tolerance_secs < 0.0 {
            return Err(SyncError::invalid_config(format!(
                "tolerance_secs must be a non-negative number, got {}",
                self.tolerance_secs
            )));
        }
        if !self.neighborhood_secs.is_finite() || self.neighborhood_secs <= 0.0 {
            return Err(SyncError::invalid_config(format!(
                "neighborhood_secs must be positive, got {}",
                self.neighborhood_secs
            )));
        }
        Ok(())
    }
}

/// Sample rate and watermark window length of one alignment run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleTiming {
    /// Samples per second of both the recording and the references
    pub sample_rate: u32,
    /// Length of one observation window (seconds)
    pub audio_sample_length: f64,
}

impl SampleTiming {
    /// Create a timing description.
    #[must_use]
    pub const fn new(sample_rate: u32, audio_sample_length: f64) -> Self {
        Self {
            sample_rate,
            audio_sample_length,
        }
    }

    /// Reject timings that produce an empty observation window.
    pub fn validate(&self) -> SyncResult<()> {
        if self.sample_rate == 0 {
            return Err(SyncError::invalid_config("sample_rate must be positive"));
        }
        if !self.audio_sample_length.is_finite() || self.audio_sample_length <= 0.0 {
            return Err(SyncError::invalid_config(format!(
                "audio_sample_length must be positive, got {}",
                self.audio_sample_length
            )));
        }
        if self.observation_period() == 0 {
            return Err(SyncError::invalid_config(format!(
                "observation period of {}s at {} Hz is shorter than one sample",
                self.audio_sample_length, self.sample_rate
            )));
        }
        Ok(())
    }

    /// Validate the timing together with the neighborhood it will search.
    ///
    /// A neighborhood that floors to zero samples would hand the correlator
    /// an empty window and report nominal positions as measured ones.
    pub fn validate_neighborhood(&self, config: &AlignmentConfig) -> SyncResult<()> {
        self.validate()?;
        if self.neighborhood_samples(config) == 0 {
            return Err(SyncError::invalid_config(format!(
                "neighborhood of {}s at {} Hz is shorter than one sample",
                config.neighborhood_secs, self.sample_rate
            )));
        }
        Ok(())
    }

    /// Samples spanned by one observation window.
    #[must_use]
    pub fn observation_period(&self) -> usize {
        (f64::from(self.sample_rate) * self.audio_sample_length).round() as usize
    }

    /// Largest accepted deviation of a window gap, in whole samples.
    ///
    /// Gaps are integral, so `|d| <= floor(rate * tol)` is the same test
    /// as `|d| <= rate * tol`.
    #[must_use]
    pub fn tolerance_samples(&self, config: &AlignmentConfig) -> usize {
        (f64::from(self.sample_rate) * config.tolerance_secs + SAMPLE_EPSILON).floor() as usize
    }

    /// Width of the sub-segment search window, in samples.
    #[must_use]
    pub fn neighborhood_samples(&self, config: &AlignmentConfig) -> usize {
        (f64::from(self.sample_rate) * config.neighborhood_secs + SAMPLE_EPSILON).floor() as usize
    }

    /// Convert a sample count to seconds.
    #[must_use]
    pub fn samples_to_secs(&self, samples: usize) -> f64 {
        samples as f64 / f64::from(self.sample_rate)
    }

    /// Convert a (possibly negative) sample offset to milliseconds.
    #[must_use]
    pub fn offset_to_ms(&self, offset: isize) -> f64 {
        offset as f64 / f64::from(self.sample_rate) * 1000.0
    }
}
