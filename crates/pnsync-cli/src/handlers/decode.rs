//! Decode command handler.
//!
//! Orchestrates: load audio -> decode every reference segment -> render report.

use super::{load_input, plot_sink, write_output};
use crate::commands::{DecodeArgs, OutputFormat};
use crate::config::{load_alignment_config, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::StatusPrinter;
use pnsync::{
    AlignmentConfig, DecodeOutcome, DecodeReport, FftCorrelator, SampleTiming, SegmentDecoder,
    TrimPlotSink,
};

/// Execute the decode command.
pub fn execute_decode(config: &CliConfig, args: &DecodeArgs) -> CliResult<()> {
    let printer = StatusPrinter::new(config);
    let alignment =
        load_alignment_config(args.alignment.config.as_deref(), &args.alignment.overrides())?;
    let timing = args.timing.sample_timing()?;

    let subject = load_input(&args.subject, timing.sample_rate, "Recording")?;
    let references = args
        .references
        .iter()
        .map(|path| load_input(path, timing.sample_rate, "Reference"))
        .collect::<CliResult<Vec<_>>>()?;

    let plot = plot_sink(args.plot_prefix.as_deref(), config, &printer);
    let outcome = run_decode(
        &alignment,
        timing,
        args.start_media_time,
        &references,
        &subject,
        plot.as_ref().map(|p| p as &dyn TrimPlotSink),
    )?;

    let report = DecodeReport::new(&outcome, timing);
    let rendered = render_report(&report, args.format, args.detailed)?;
    write_output(&rendered, args.output.as_deref())?;

    printer.success(&format!(
        "Decoded {} segments from {} reference segments",
        report.segment_count,
        references.len()
    ));
    Ok(())
}

/// Decode loaded audio with the FFT correlator.
pub fn run_decode(
    alignment: &AlignmentConfig,
    timing: SampleTiming,
    start_media_time: f64,
    references: &[Vec<f32>],
    subject: &[f32],
    plot: Option<&dyn TrimPlotSink>,
) -> CliResult<DecodeOutcome> {
    let mut decoder = SegmentDecoder::new(&FftCorrelator, alignment);
    if let Some(sink) = plot {
        decoder = decoder.with_plot_sink(sink);
    }
    decoder
        .decode(start_media_time, references, subject, timing)
        .map_err(|e| CliError::decode(e.to_string()))
}

/// Render a decode report in the requested format.
pub fn render_report(
    report: &DecodeReport,
    format: OutputFormat,
    detailed: bool,
) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(report.render_text(detailed)),
        OutputFormat::Json => report
            .to_json()
            .map(|json| json + "\n")
            .map_err(|e| CliError::report_generation(format!("JSON serialization error: {e}"))),
    }
}
