//! pnsync CLI library
//!
//! Command-line front end for the pnsync audio alignment library.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    AlignmentArgs, Cli, ColorArg, Commands, ConfigArgs, ConfigFormat, DecodeArgs, OutputFormat,
    TimingArgs, TrimArgs,
};
pub use config::{
    load_alignment_config, parse_alignment_config, AlignmentOverrides, CliConfig, ColorChoice,
    Verbosity,
};
pub use error::{CliError, CliResult};
pub use output::StatusPrinter;
