//! Smoke tests for the pnsync CLI
//!
//! Fixtures are raw mono f32le files, so no ffmpeg is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use pnsync::extraction::encode_f32le;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command for the pnsync binary
fn pnsync() -> Command {
    let mut cmd = Command::cargo_bin("pnsync").expect("pnsync binary should exist");
    cmd.env_remove("RUST_LOG").env_remove("PNSYNC_CONFIG");
    cmd
}

fn noise(len: usize, seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state >> 40) as f32 / (1u64 << 24) as f32) - 0.5
        })
        .collect()
}

fn write_raw(dir: &Path, name: &str, samples: &[f32]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, encode_f32le(samples)).unwrap();
    path
}

/// Two 1.2 s references recorded after 0.3 s of silence, at 1 kHz.
fn fixture(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let ref0 = noise(1200, 1);
    let ref1 = noise(1200, 2);
    let mut subject = vec![0.0f32; 300];
    subject.extend_from_slice(&ref0);
    subject.extend_from_slice(&ref1);
    subject.extend(vec![0.0f32; 400]);
    (
        write_raw(dir, "subject.f32", &subject),
        write_raw(dir, "ref_0.f32", &ref0),
        write_raw(dir, "ref_1.f32", &ref1),
    )
}

const TIMING_ARGS: [&str; 6] = [
    "--sample-rate",
    "1000",
    "--sample-length",
    "0.1",
    "--neighborhood",
    "0.4",
];

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    pnsync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    pnsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("trim"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    pnsync().assert().failure();
}

// ============================================================================
// Config Command
// ============================================================================

#[test]
fn test_config_defaults() {
    pnsync()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Check count: 10"));
}

#[test]
fn test_config_yaml_with_override() {
    pnsync()
        .args(["config", "--format", "yaml", "--check-count", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("check_count: 4"))
        .stdout(predicate::str::contains("tolerance_secs: 0.02"));
}

#[test]
fn test_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("align.yaml");
    fs::write(&path, "neighborhood_secs: 0.5\n").unwrap();

    pnsync()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Neighborhood: 0.5s"));
}

#[test]
fn test_config_rejects_zero_check_count() {
    pnsync()
        .args(["config", "--check-count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("check_count"));
}

// ============================================================================
// Decode Command
// ============================================================================

#[test]
fn test_decode_json() {
    let dir = TempDir::new().unwrap();
    let (subject, ref0, ref1) = fixture(dir.path());

    let output = pnsync()
        .arg("decode")
        .arg(&subject)
        .arg("-r")
        .arg(&ref0)
        .arg("-r")
        .arg(&ref1)
        .args(TIMING_ARGS)
        .args(["--format", "json", "--color", "never"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["segment_count"], 24);
    assert_eq!(report["first_offset"], 300);
    assert_eq!(report["contents"][1]["content_id"], "1");
}

#[test]
fn test_decode_text_to_file() {
    let dir = TempDir::new().unwrap();
    let (subject, ref0, _) = fixture(dir.path());
    let out = dir.path().join("report.txt");

    pnsync()
        .arg("decode")
        .arg(&subject)
        .arg("-r")
        .arg(&ref0)
        .args(TIMING_ARGS)
        .arg("--detailed")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("content 0: 12 segments"));
    assert_eq!(text.matches("media").count(), 12);
}

#[test]
fn test_decode_missing_recording() {
    let dir = TempDir::new().unwrap();
    let (_, ref0, _) = fixture(dir.path());

    pnsync()
        .arg("decode")
        .arg(dir.path().join("absent.f32"))
        .arg("-r")
        .arg(&ref0)
        .args(TIMING_ARGS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Recording file not found"));
}

#[test]
fn test_decode_silent_recording_fails_alignment() {
    let dir = TempDir::new().unwrap();
    let (_, ref0, _) = fixture(dir.path());
    let silent = write_raw(dir.path(), "silent.f32", &vec![0.0; 4000]);

    pnsync()
        .arg("decode")
        .arg(&silent)
        .arg("-r")
        .arg(&ref0)
        .args(TIMING_ARGS)
        .args(["--check-count", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Alignment failed"));
}

#[test]
fn test_decode_debug_plot() {
    let dir = TempDir::new().unwrap();
    let (subject, ref0, _) = fixture(dir.path());
    let prefix = format!("{}/", dir.path().display());

    pnsync()
        .arg("-vv")
        .arg("decode")
        .arg(&subject)
        .arg("-r")
        .arg(&ref0)
        .args(TIMING_ARGS)
        .arg("--plot-prefix")
        .arg(&prefix)
        .assert()
        .success();

    assert!(dir.path().join("subject_data_0.png").exists());
}

// ============================================================================
// Trim Command
// ============================================================================

#[test]
fn test_trim_json_and_samples() {
    let dir = TempDir::new().unwrap();
    let (subject, _, ref1) = fixture(dir.path());
    let samples = dir.path().join("trimmed.f32");

    let output = pnsync()
        .arg("trim")
        .arg(&subject)
        .arg("-r")
        .arg(&ref1)
        .args(["--sample-rate", "1000", "--sample-length", "0.1"])
        .args(["--format", "json"])
        .arg("--write-samples")
        .arg(&samples)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["trim_from"], 1500);
    assert_eq!(summary["trim_to"], 2700);
    assert_eq!(fs::metadata(&samples).unwrap().len(), 1200 * 4);
}

#[test]
fn test_trim_invalid_timing() {
    let dir = TempDir::new().unwrap();
    let (subject, ref0, _) = fixture(dir.path());

    pnsync()
        .arg("trim")
        .arg(&subject)
        .arg("-r")
        .arg(&ref0)
        .args(["--sample-rate", "10", "--sample-length", "0.01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("observation period"));
}
