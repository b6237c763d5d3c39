//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates an `argus.toml` configuration from a project directory.
///
/// Reads `<project_dir>/argus.toml`, parses it, and validates field values.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("argus.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `argus.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.fix.max_passes == 0 {
        return Err(ConfigError::ValidationError(
            "fix.max_passes must be at least 1".to_string(),
        ));
    }
    if config.rules.settings.max_line_length == 0 {
        return Err(ConfigError::ValidationError(
            "rules.settings.max_line_length must be at least 1".to_string(),
        ));
    }
    if config.rules.settings.tab_width == 0 {
        return Err(ConfigError::ValidationError(
            "rules.settings.tab_width must be at least 1".to_string(),
        ));
    }
    Ok(())
}
