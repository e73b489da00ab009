//! Trim command handler.

use super::{load_input, plot_sink, write_output};
use crate::commands::{OutputFormat, TrimArgs};
use crate::config::{load_alignment_config, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::StatusPrinter;
use pnsync::extraction::encode_f32le;
use pnsync::{AlignmentConfig, FftCorrelator, SampleTiming, TrimPlotSink, Trimmed, Trimmer};
use serde::Serialize;

/// Boundaries of one trim, in samples and milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrimSummary {
    /// First kept sample
    pub trim_from: usize,
    /// End of the kept region (exclusive)
    pub trim_to: usize,
    /// Samples kept
    pub samples: usize,
    /// `trim_from` in milliseconds
    pub trim_from_ms: f64,
    /// `trim_to` in milliseconds
    pub trim_to_ms: f64,
}

impl TrimSummary {
    /// Summarise a trim.
    #[must_use]
    pub fn new(trimmed: &Trimmed, timing: SampleTiming) -> Self {
        let b = trimmed.boundaries;
        Self {
            trim_from: b.trim_from,
            trim_to: b.trim_to,
            samples: trimmed.samples.len(),
            trim_from_ms: timing.offset_to_ms(b.trim_from as isize),
            trim_to_ms: timing.offset_to_ms(b.trim_to as isize),
        }
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> CliResult<String> {
        match format {
            OutputFormat::Text => Ok(format!(
                "trim_from: {} ({:.3}ms)\ntrim_to:   {} ({:.3}ms)\nsamples:   {}\n",
                self.trim_from, self.trim_from_ms, self.trim_to, self.trim_to_ms, self.samples
            )),
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map(|json| json + "\n")
                .map_err(|e| CliError::report_generation(format!("JSON serialization error: {e}"))),
        }
    }
}

/// Execute the trim command.
pub fn execute_trim(config: &CliConfig, args: &TrimArgs) -> CliResult<()> {
    let printer = StatusPrinter::new(config);
    let alignment =
        load_alignment_config(args.alignment.config.as_deref(), &args.alignment.overrides())?;
    let timing = args.timing.sample_timing()?;

    let subject = load_input(&args.subject, timing.sample_rate, "Recording")?;
    let reference = load_input(&args.reference, timing.sample_rate, "Reference")?;

    let plot = plot_sink(args.plot_prefix.as_deref(), config, &printer);
    let trimmed = run_trim(
        &alignment,
        timing,
        &subject,
        &reference,
        args.index,
        plot.as_ref().map(|p| p as &dyn TrimPlotSink),
    )?;

    if trimmed.samples.is_empty() {
        printer.warning("Trim boundaries cross; no samples kept");
    }
    if let Some(path) = &args.write_samples {
        std::fs::write(path, encode_f32le(&trimmed.samples))?;
        printer.success(&format!("Wrote trimmed samples to {}", path.display()));
    }

    let summary = TrimSummary::new(&trimmed, timing);
    write_output(&summary.render(args.format)?, None)
}

/// Trim loaded audio with the FFT correlator.
pub fn run_trim(
    alignment: &AlignmentConfig,
    timing: SampleTiming,
    subject: &[f32],
    reference: &[f32],
    index: usize,
    plot: Option<&dyn TrimPlotSink>,
) -> CliResult<Trimmed> {
    let mut trimmer = Trimmer::new(&FftCorrelator, alignment);
    if let Some(sink) = plot {
        trimmer = trimmer.with_plot_sink(sink);
    }
    trimmer
        .trim(subject, reference, timing, index)
        .map_err(|e| CliError::decode(e.to_string()))
}
