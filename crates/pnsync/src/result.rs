//! Result and error types for pnsync.

use thiserror::Error;

/// Result type for pnsync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while aligning a recording
#[derive(Debug, Error)]
pub enum SyncError {
    /// The recording could not be aligned with the reference PN data.
    ///
    /// Raised when the consensus search exhausts its check count, or when
    /// the trimmed recording is too short for a neighborhood search.
    #[error("Alignment failed: {message}")]
    Alignment {
        /// Error message
        message: String,
    },

    /// Configuration or timing values are unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Audio extraction through ffmpeg failed
    #[error("ffmpeg error: {message}")]
    Ffmpeg {
        /// Error message
        message: String,
    },

    /// Diagnostic plot could not be rendered or written
    #[error("Plot export failed: {message}")]
    Plot {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Create an alignment error
    #[must_use]
    pub fn alignment(message: impl Into<String>) -> Self {
        Self::Alignment {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a plot export error
    #[must_use]
    pub fn plot(message: impl Into<String>) -> Self {
        Self::Plot {
            message: message.into(),
        }
    }

    /// Whether this is the alignment failure raised by the core search
    #[must_use]
    pub const fn is_alignment(&self) -> bool {
        matches!(self, Self::Alignment { .. })
    }
}
