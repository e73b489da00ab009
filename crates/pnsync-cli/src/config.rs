//! CLI configuration: verbosity, colors, logging and alignment settings.

use crate::error::{CliError, CliResult};
use pnsync::AlignmentConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - progress logs
    Verbose,
    /// Debug - per-window logs and diagnostic plots
    Debug,
}

impl Verbosity {
    /// Build from the `-q` flag and the `-v` count.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Check if debug mode
    #[must_use]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set JSON log output
    #[must_use]
    pub const fn with_log_json(mut self, log_json: bool) -> Self {
        self.log_json = log_json;
        self
    }

    /// Install the global `tracing` subscriber on stderr.
    ///
    /// `RUST_LOG` takes precedence over the verbosity flags. Calling this
    /// twice is harmless.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.verbosity.log_filter()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);
        let _ = if self.log_json {
            builder.json().try_init()
        } else {
            builder.with_ansi(self.color.should_color()).try_init()
        };
    }
}

/// Command-line overrides for the alignment settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentOverrides {
    /// Gap tolerance (seconds)
    pub tolerance_secs: Option<f64>,
    /// Consensus passes
    pub check_count: Option<usize>,
    /// Neighborhood width (seconds)
    pub neighborhood_secs: Option<f64>,
}

impl AlignmentOverrides {
    /// Apply the overrides that were given.
    #[must_use]
    pub fn apply(&self, mut config: AlignmentConfig) -> AlignmentConfig {
        if let Some(tolerance) = self.tolerance_secs {
            config = config.with_tolerance_secs(tolerance);
        }
        if let Some(count) = self.check_count {
            config = config.with_check_count(count);
        }
        if let Some(neighborhood) = self.neighborhood_secs {
            config = config.with_neighborhood_secs(neighborhood);
        }
        config
    }
}

/// Parse an alignment document; YAML or JSON.
pub fn parse_alignment_config(content: &str) -> CliResult<AlignmentConfig> {
    if content.trim().is_empty() {
        return Ok(AlignmentConfig::default());
    }
    serde_yaml_ng::from_str(content)
        .map_err(|e| CliError::config(format!("Failed to parse alignment config: {e}")))
}

/// Effective alignment settings: defaults, then `path`, then overrides.
pub fn load_alignment_config(
    path: Option<&Path>,
    overrides: &AlignmentOverrides,
) -> CliResult<AlignmentConfig> {
    let base = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                CliError::config(format!("Failed to read {}: {e}", path.display()))
            })?;
            parse_alignment_config(&content)?
        }
        None => AlignmentConfig::default(),
    };

    let config = overrides.apply(base);
    config
        .validate()
        .map_err(|e| CliError::config(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 3), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
        }

        #[test]
        fn test_predicates() {
            assert!(Verbosity::Quiet.is_quiet());
            assert!(Verbosity::Verbose.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
            assert!(Verbosity::Debug.is_debug());
            assert!(!Verbosity::Normal.is_verbose());
        }

        #[test]
        fn test_log_filter() {
            assert_eq!(Verbosity::Quiet.log_filter(), "error");
            assert_eq!(Verbosity::Normal.log_filter(), "warn");
            assert_eq!(Verbosity::Verbose.log_filter(), "info");
            assert_eq!(Verbosity::Debug.log_filter(), "debug");
        }
    }

    mod cli_config_tests {
        use super::*;

        #[test]
        fn test_builders() {
            let config = CliConfig::new()
                .with_verbosity(Verbosity::Debug)
                .with_color(ColorChoice::Never)
                .with_log_json(true);
            assert_eq!(config.verbosity, Verbosity::Debug);
            assert_eq!(config.color, ColorChoice::Never);
            assert!(config.log_json);
        }

        #[test]
        fn test_color_choice() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod alignment_tests {
        use super::*;

        #[test]
        fn test_parse_yaml() {
            let config = parse_alignment_config("tolerance_secs: 0.01\ncheck_count: 4\n").unwrap();
            assert!((config.tolerance_secs - 0.01).abs() < f64::EPSILON);
            assert_eq!(config.check_count, 4);
            assert!((config.neighborhood_secs - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_parse_json() {
            let config = parse_alignment_config(r#"{"neighborhood_secs": 0.5}"#).unwrap();
            assert!((config.neighborhood_secs - 0.5).abs() < f64::EPSILON);
        }

        #[test]
        fn test_parse_empty_document() {
            assert_eq!(parse_alignment_config("  \n").unwrap(), AlignmentConfig::default());
        }

        #[test]
        fn test_parse_invalid_document() {
            let err = parse_alignment_config("check_count: many").unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
        }

        #[test]
        fn test_overrides_win_over_file() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("align.yaml");
            std::fs::write(&path, "check_count: 4\ntolerance_secs: 0.05\n").unwrap();
            let overrides = AlignmentOverrides {
                check_count: Some(7),
                ..AlignmentOverrides::default()
            };

            let config = load_alignment_config(Some(&path), &overrides).unwrap();
            assert_eq!(config.check_count, 7);
            assert!((config.tolerance_secs - 0.05).abs() < f64::EPSILON);
        }

        #[test]
        fn test_invalid_override_rejected() {
            let overrides = AlignmentOverrides {
                check_count: Some(0),
                ..AlignmentOverrides::default()
            };
            let err = load_alignment_config(None, &overrides).unwrap_err();
            assert!(err.to_string().contains("check_count"));
        }

        #[test]
        fn test_missing_file() {
            let dir = TempDir::new().unwrap();
            let err = load_alignment_config(
                Some(&dir.path().join("nope.yaml")),
                &AlignmentOverrides::default(),
            )
            .unwrap_err();
            assert!(err.to_string().contains("Failed to read"));
        }
    }
}
