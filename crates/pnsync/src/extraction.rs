//! Loading recordings and reference segments as mono f32 samples.
//!
//! Raw little-endian `f32` files (`.f32`, `.raw`) are read directly; any
//! other container goes through ffmpeg, which downmixes to mono and
//! resamples so every buffer in a run shares one sample rate.

use crate::result::{SyncError, SyncResult};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Default extraction rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Extensions read as headerless mono f32le PCM
const RAW_EXTENSIONS: [&str; 2] = ["f32", "raw"];

/// Arguments for a mono f32le ffmpeg extraction to stdout.
#[must_use]
pub fn build_ffmpeg_args(input: &Path, sample_rate: u32) -> Vec<String> {
    vec![
        "-nostdin".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-f".to_string(),
        "f32le".to_string(),
        "-acodec".to_string(),
        "pcm_f32le".to_string(),
        "-ac".to_string(),
        "1".to_string(),
        "-ar".to_string(),
        sample_rate.to_string(),
        "pipe:1".to_string(),
    ]
}

/// Whether `path` is read as raw PCM instead of through ffmpeg.
#[must_use]
pub fn is_raw_pcm(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RAW_EXTENSIONS.iter().any(|r| e.eq_ignore_ascii_case(r)))
}

/// Decode little-endian f32 samples.
///
/// # Errors
///
/// [`SyncError::Ffmpeg`] when the byte count is not a multiple of 4.
pub fn decode_f32le(bytes: &[u8]) -> SyncResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(SyncError::Ffmpeg {
            message: format!("PCM length {} is not a multiple of 4 bytes", bytes.len()),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Encode samples as little-endian f32 bytes.
#[must_use]
pub fn encode_f32le(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Extract mono f32 audio from any container ffmpeg understands.
///
/// # Errors
///
/// [`SyncError::Ffmpeg`] if ffmpeg cannot be started, exits with an error
/// or produces malformed output.
pub fn extract_audio(input: &Path, sample_rate: u32) -> SyncResult<Vec<f32>> {
    let args = build_ffmpeg_args(input, sample_rate);
    debug!(input = %input.display(), sample_rate, "extracting audio with ffmpeg");

    let output = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| SyncError::Ffmpeg {
            message: format!("Failed to execute ffmpeg: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SyncError::Ffmpeg {
            message: format!("ffmpeg exited with {}: {}", output.status, stderr.trim()),
        });
    }

    decode_f32le(&output.stdout)
}

/// Load a recording or reference segment.
///
/// Raw PCM files must already be mono at `sample_rate`.
///
/// # Errors
///
/// [`SyncError::Io`] for unreadable raw files, [`SyncError::Ffmpeg`] for
/// failed extraction or malformed PCM.
pub fn load_audio(path: &Path, sample_rate: u32) -> SyncResult<Vec<f32>> {
    if is_raw_pcm(path) {
        let bytes = std::fs::read(path)?;
        let samples = decode_f32le(&bytes)?;
        debug!(path = %path.display(), samples = samples.len(), "loaded raw PCM");
        Ok(samples)
    } else {
        extract_audio(path, sample_rate)
    }
}
