//! CLI command definitions using clap

use crate::config::AlignmentOverrides;
use crate::error::{CliError, CliResult};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pnsync::{SampleTiming, DEFAULT_SAMPLE_RATE};
use std::path::PathBuf;

/// pnsync: align recorded audio against PN watermark segments
#[derive(Parser, Debug)]
#[command(name = "pnsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug and diagnostic plots)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Timestamp every sub-segment of the reference segments in a recording
    Decode(DecodeArgs),

    /// Find the watermarked region of a recording for one reference segment
    Trim(TrimArgs),

    /// Show the effective alignment configuration
    Config(ConfigArgs),
}

/// Sample rate and observation window
#[derive(Args, Debug, Clone)]
pub struct TimingArgs {
    /// Sample rate all audio is extracted at (Hz)
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Observation window length (seconds)
    #[arg(long, default_value = "0.02")]
    pub sample_length: f64,
}

impl TimingArgs {
    /// Validated sample timing
    pub fn sample_timing(&self) -> CliResult<SampleTiming> {
        let timing = SampleTiming::new(self.sample_rate, self.sample_length);
        timing
            .validate()
            .map_err(|e| CliError::invalid_argument(e.to_string()))?;
        Ok(timing)
    }
}

/// Alignment configuration file and overrides
#[derive(Args, Debug, Clone, Default)]
pub struct AlignmentArgs {
    /// Alignment settings file (YAML or JSON)
    #[arg(short, long, env = "PNSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Allowed window gap deviation (seconds)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Consensus passes per boundary
    #[arg(long)]
    pub check_count: Option<usize>,

    /// Search neighborhood around each sub-segment (seconds)
    #[arg(long)]
    pub neighborhood: Option<f64>,
}

impl AlignmentArgs {
    /// Overrides given on the command line
    #[must_use]
    pub fn overrides(&self) -> AlignmentOverrides {
        AlignmentOverrides {
            tolerance_secs: self.tolerance,
            check_count: self.check_count,
            neighborhood_secs: self.neighborhood,
        }
    }
}

/// Arguments for the decode command
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Recorded audio (any ffmpeg input, or raw mono f32le `.f32`/`.raw`)
    pub subject: PathBuf,

    /// Reference PN segments in playback order
    #[arg(short, long = "reference", required = true)]
    pub references: Vec<PathBuf>,

    /// Media time of the first reference segment (seconds)
    #[arg(long, default_value = "0.0")]
    pub start_media_time: f64,

    /// Timing options
    #[command(flatten)]
    pub timing: TimingArgs,

    /// Alignment options
    #[command(flatten)]
    pub alignment: AlignmentArgs,

    /// Prefix for trim plots (`<prefix>subject_data_<n>.png`), needs -vv
    #[arg(long)]
    pub plot_prefix: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// List every sub-segment in text output
    #[arg(long)]
    pub detailed: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the trim command
#[derive(Parser, Debug)]
pub struct TrimArgs {
    /// Recorded audio (any ffmpeg input, or raw mono f32le `.f32`/`.raw`)
    pub subject: PathBuf,

    /// Reference PN segment
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Timing options
    #[command(flatten)]
    pub timing: TimingArgs,

    /// Alignment options
    #[command(flatten)]
    pub alignment: AlignmentArgs,

    /// Index used to name the trim plot
    #[arg(long, default_value = "0")]
    pub index: usize,

    /// Prefix for the trim plot (`<prefix>subject_data_<index>.png`), needs -vv
    #[arg(long)]
    pub plot_prefix: Option<String>,

    /// Write the trimmed samples as raw mono f32le
    #[arg(long)]
    pub write_samples: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Alignment options
    #[command(flatten)]
    pub alignment: AlignmentArgs,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ConfigFormat,
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Config output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Human-readable text
    #[default]
    Text,
    /// YAML, loadable with --config
    Yaml,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    mod decode_args_tests {
        use super::*;

        #[test]
        fn test_parse_decode() {
            let cli = Cli::try_parse_from([
                "pnsync", "decode", "rec.mp4", "-r", "a.wav", "-r", "b.wav",
            ])
            .unwrap();
            let Commands::Decode(args) = cli.command else {
                panic!("expected decode");
            };
            assert_eq!(args.subject, PathBuf::from("rec.mp4"));
            assert_eq!(args.references.len(), 2);
            assert_eq!(args.timing.sample_rate, 48000);
            assert!((args.timing.sample_length - 0.02).abs() < f64::EPSILON);
            assert_eq!(args.format, OutputFormat::Text);
        }

        #[test]
        fn test_decode_requires_reference() {
            assert!(Cli::try_parse_from(["pnsync", "decode", "rec.mp4"]).is_err());
        }

        #[test]
        fn test_alignment_overrides() {
            let cli = Cli::try_parse_from([
                "pnsync",
                "decode",
                "rec.f32",
                "-r",
                "a.f32",
                "--tolerance",
                "0.01",
                "--check-count",
                "3",
            ])
            .unwrap();
            let Commands::Decode(args) = cli.command else {
                panic!("expected decode");
            };
            let overrides = args.alignment.overrides();
            assert_eq!(overrides.tolerance_secs, Some(0.01));
            assert_eq!(overrides.check_count, Some(3));
            assert_eq!(overrides.neighborhood_secs, None);
        }
    }

    mod global_args_tests {
        use super::*;

        #[test]
        fn test_verbosity_count() {
            let cli = Cli::try_parse_from(["pnsync", "-vv", "config"]).unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(!cli.quiet);
        }

        #[test]
        fn test_color_arg_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        }
    }

    mod timing_args_tests {
        use super::*;

        #[test]
        fn test_valid_timing() {
            let args = TimingArgs {
                sample_rate: 1000,
                sample_length: 0.1,
            };
            assert_eq!(args.sample_timing().unwrap().observation_period(), 100);
        }

        #[test]
        fn test_invalid_timing() {
            let args = TimingArgs {
                sample_rate: 0,
                sample_length: 0.1,
            };
            assert!(matches!(
                args.sample_timing().unwrap_err(),
                CliError::InvalidArgument { .. }
            ));
        }
    }
}
