//! pnsync CLI: align recorded audio against PN watermark segments
//!
//! ## Usage
//!
//! ```bash
//! pnsync decode capture.mp4 -r pn_0.wav -r pn_1.wav   # Timestamp sub-segments
//! pnsync trim capture.mp4 -r pn_0.wav --format json   # Show trim boundaries
//! pnsync config --format yaml > align.yaml            # Dump effective settings
//! ```

use clap::Parser;
use pnsync_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    config.init_tracing();

    match cli.command {
        Commands::Decode(args) => handlers::execute_decode(&config, &args),
        Commands::Trim(args) => handlers::execute_trim(&config, &args),
        Commands::Config(args) => handlers::execute_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_json(cli.log_json)
}
