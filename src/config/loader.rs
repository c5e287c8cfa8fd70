//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{LogFormat, VaultConfig};
use crate::domain::errors::VaultError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VaultConfig
/// 4. Applies environment variable overrides (DESIGNVAULT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use designvault::config::loader::load_config;
///
/// let config = load_config("designvault.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VaultConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VaultError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VaultError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: VaultConfig = toml::from_str(&contents)
        .map_err(|e| VaultError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        VaultError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VaultError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VaultError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using DESIGNVAULT_* prefix
///
/// Environment variables follow the pattern: DESIGNVAULT_<SECTION>_<KEY>
/// For example: DESIGNVAULT_EXPORT_OUTPUT_ROOT, DESIGNVAULT_EXPORT_FORMATS
fn apply_env_overrides(config: &mut VaultConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("DESIGNVAULT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("DESIGNVAULT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Export overrides
    if let Ok(val) = std::env::var("DESIGNVAULT_EXPORT_OUTPUT_ROOT") {
        config.export.output_root = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("DESIGNVAULT_EXPORT_FORMATS") {
        config.export.formats = split_list(&val);
    }
    if let Ok(val) = std::env::var("DESIGNVAULT_EXPORT_ARCHIVE_EXTENSIONS") {
        config.export.archive_extensions = split_list(&val);
    }
    if let Ok(val) = std::env::var("DESIGNVAULT_EXPORT_MAX_COMPONENT_DEPTH") {
        config.export.max_component_depth = val.parse().map_err(|_| {
            VaultError::Configuration(format!(
                "DESIGNVAULT_EXPORT_MAX_COMPONENT_DEPTH must be a number, got '{val}'"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("DESIGNVAULT_EXPORT_EXPORT_BODIES") {
        config.export.export_bodies = val.parse().unwrap_or(true);
    }

    // Source overrides
    if let Ok(val) = std::env::var("DESIGNVAULT_SOURCE_MANIFEST") {
        config.source.manifest = Some(PathBuf::from(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("DESIGNVAULT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("DESIGNVAULT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("DESIGNVAULT_LOGGING_LOCAL_FORMAT") {
        config.logging.local_format = match val.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" => LogFormat::Text,
            other => {
                return Err(VaultError::Configuration(format!(
                    "Invalid DESIGNVAULT_LOGGING_LOCAL_FORMAT '{other}'. Must be text or json"
                )))
            }
        };
    }

    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("DV_TEST_VAR", "test_value");
        let input = "output_root = \"${DV_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "output_root = \"test_value\"\n");
        std::env::remove_var("DV_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("DV_MISSING_VAR");
        let input = "output_root = \"${DV_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("DV_COMMENTED_VAR");
        let input = "# output_root = \"${DV_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("step, stl,,dxf "), vec!["step", "stl", "dxf"]);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(VaultError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[export]
output_root = "/srv/vault"
formats = ["step", "dxf"]
export_bodies = false

[source]
manifest = "vault.json"

[logging]
local_format = "json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.export.output_root, PathBuf::from("/srv/vault"));
        assert_eq!(config.export.formats, vec!["step", "dxf"]);
        assert!(!config.export.export_bodies);
        assert_eq!(config.source.manifest, Some(PathBuf::from("vault.json")));
        assert_eq!(config.logging.local_format, LogFormat::Json);
    }
}
