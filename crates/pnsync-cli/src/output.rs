//! Terminal status lines

use crate::config::CliConfig;
use console::{style, Term};

/// Writes status lines to stderr so stdout stays machine-readable.
#[derive(Debug)]
pub struct StatusPrinter {
    term: Term,
    use_color: bool,
    quiet: bool,
}

impl StatusPrinter {
    /// Create a printer honoring the color and quiet settings
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        Self {
            term: Term::stderr(),
            use_color: config.color.should_color(),
            quiet: config.verbosity.is_quiet(),
        }
    }

    /// Prefix for a successful step.
    #[must_use]
    pub fn success_prefix(&self) -> String {
        if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        }
    }

    /// Prefix for a warning.
    #[must_use]
    pub fn warning_prefix(&self) -> String {
        if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self
            .term
            .write_line(&format!("{} {message}", self.success_prefix()));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self
            .term
            .write_line(&format!("{} {message}", self.warning_prefix()));
    }
}
