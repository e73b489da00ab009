//! Config command handler

use crate::commands::{ConfigArgs, ConfigFormat};
use crate::config::{load_alignment_config, CliConfig};
use crate::error::{CliError, CliResult};
use pnsync::AlignmentConfig;

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    let alignment =
        load_alignment_config(args.alignment.config.as_deref(), &args.alignment.overrides())?;
    if config.verbosity.is_verbose() {
        if let Some(path) = &args.alignment.config {
            eprintln!("Loaded alignment settings from {}", path.display());
        }
    }
    print!("{}", render_config(&alignment, args.format)?);
    Ok(())
}

/// Render the alignment configuration
pub fn render_config(alignment: &AlignmentConfig, format: ConfigFormat) -> CliResult<String> {
    match format {
        ConfigFormat::Text => Ok(format!(
            "Alignment configuration:\n  Tolerance: {}s\n  Check count: {}\n  Neighborhood: {}s\n",
            alignment.tolerance_secs, alignment.check_count, alignment.neighborhood_secs
        )),
        ConfigFormat::Yaml => serde_yaml_ng::to_string(alignment)
            .map_err(|e| CliError::config(format!("YAML serialization error: {e}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::parse_alignment_config;

    #[test]
    fn test_render_text() {
        let text = render_config(&AlignmentConfig::default(), ConfigFormat::Text).unwrap();
        assert!(text.contains("Tolerance: 0.02s"));
        assert!(text.contains("Check count: 10"));
        assert!(text.contains("Neighborhood: 1s"));
    }

    #[test]
    fn test_yaml_round_trips_through_loader() {
        let expected = AlignmentConfig::new()
            .with_check_count(6)
            .with_tolerance_secs(0.015);
        let yaml = render_config(&expected, ConfigFormat::Yaml).unwrap();
        assert!(yaml.contains("check_count: 6"));
        assert_eq!(parse_alignment_config(&yaml).unwrap(), expected);
    }
}
