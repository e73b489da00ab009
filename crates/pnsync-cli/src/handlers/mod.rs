//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests

pub mod config;
pub mod decode;
pub mod trim;

pub use config::{execute_config, render_config};
pub use decode::{execute_decode, render_report, run_decode};
pub use trim::{execute_trim, run_trim, TrimSummary};

use crate::error::{CliError, CliResult};
use pnsync::{load_audio, PngTrimPlot};
use std::path::Path;
use tracing::info;

/// Load an audio file after checking it exists.
pub(crate) fn load_input(path: &Path, sample_rate: u32, what: &str) -> CliResult<Vec<f32>> {
    if !path.exists() {
        return Err(CliError::invalid_argument(format!(
            "{what} file not found: {}",
            path.display()
        )));
    }
    let samples = load_audio(path, sample_rate)?;
    info!(path = %path.display(), samples = samples.len(), "{what} loaded");
    Ok(samples)
}

/// Write output to file or stdout.
pub(crate) fn write_output(content: &str, out_path: Option<&Path>) -> CliResult<()> {
    out_path.map_or_else(
        || {
            print!("{content}");
            Ok(())
        },
        |path| {
            std::fs::write(path, content)
                .map_err(|e| CliError::report_generation(format!("Failed to write report: {e}")))
        },
    )
}

/// Plot sink for `--plot-prefix`, which only renders under debug logging.
pub(crate) fn plot_sink(
    prefix: Option<&str>,
    config: &crate::config::CliConfig,
    printer: &crate::output::StatusPrinter,
) -> Option<PngTrimPlot> {
    let prefix = prefix?;
    if !config.verbosity.is_debug() {
        printer.warning("--plot-prefix only writes plots with debug logging (-vv)");
    }
    Some(PngTrimPlot::new(prefix))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_input_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_input(&dir.path().join("rec.f32"), 1000, "Recording").unwrap_err();
        assert!(err.to_string().contains("Recording file not found"));
    }

    #[test]
    fn test_load_input_raw() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rec.f32");
        std::fs::write(&path, pnsync::extraction::encode_f32le(&[0.5; 8])).unwrap();
        assert_eq!(load_input(&path, 1000, "Recording").unwrap().len(), 8);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        write_output("hello\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_write_output_bad_path() {
        let dir = TempDir::new().unwrap();
        let err = write_output("x", Some(&dir.path().join("no/such/dir.txt"))).unwrap_err();
        assert!(matches!(err, CliError::ReportGeneration { .. }));
    }

    #[test]
    fn test_plot_sink_without_prefix() {
        let config = crate::config::CliConfig::new();
        let printer = crate::output::StatusPrinter::new(&config);
        assert!(plot_sink(None, &config, &printer).is_none());
        assert!(plot_sink(Some("out_"), &config, &printer).is_some());
    }
}
