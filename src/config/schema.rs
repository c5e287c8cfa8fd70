//! Configuration schema types
//!
//! This module defines the configuration structure for Design Vault.

use crate::core::export::options::DEFAULT_MAX_COMPONENT_DEPTH;
use crate::domain::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Main Design Vault configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Design source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VaultConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.source.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Path of the file log: `logging.local_path`, or `output.log` in the output root
    pub fn log_file_path(&self) -> PathBuf {
        match &self.logging.local_path {
            Some(path) => path.clone(),
            None => self.export.output_root.join(DEFAULT_LOG_FILE_NAME),
        }
    }
}

/// File name of the run log inside the output root
pub const DEFAULT_LOG_FILE_NAME: &str = "output.log";

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (evaluate staleness, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the vault tree is mirrored into
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Per-component formats (step, stl, iges, dxf); the archive is always written
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,

    /// File extensions treated as exportable documents
    #[serde(default = "default_archive_extensions")]
    pub archive_extensions: Vec<String>,

    /// Component nesting deeper than this is reported like a cycle
    #[serde(default = "default_max_component_depth")]
    pub max_component_depth: usize,

    /// Also write one STL per body
    #[serde(default = "default_true")]
    pub export_bodies: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            formats: default_formats(),
            archive_extensions: default_archive_extensions(),
            max_component_depth: default_max_component_depth(),
            export_bodies: true,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_root.as_os_str().is_empty() {
            return Err("export.output_root cannot be empty".to_string());
        }

        for format in &self.formats {
            match ExportFormat::from_str(format) {
                Ok(ExportFormat::Archive) => {
                    return Err(
                        "export.formats cannot list 'archive'; the archive is always written"
                            .to_string(),
                    );
                }
                Ok(_) => {}
                Err(_) => {
                    return Err(format!(
                        "Invalid export format '{format}'. Must be one of: step, stl, iges, dxf"
                    ));
                }
            }
        }

        if self.archive_extensions.is_empty() {
            return Err("export.archive_extensions cannot be empty".to_string());
        }

        if self.max_component_depth == 0 {
            return Err("export.max_component_depth must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Design source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Manifest describing the vault
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.manifest {
            if path.as_os_str().is_empty() {
                return Err("source.manifest cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Log file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Log file path; defaults to `output.log` in the output root
    #[serde(default)]
    pub local_path: Option<PathBuf>,

    /// Log file format
    #[serde(default)]
    pub local_format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: None,
            local_format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.local_path {
            if path.as_os_str().is_empty() {
                return Err("logging.local_path cannot be empty".to_string());
            }
            if path.is_dir() {
                return Err(format!(
                    "logging.local_path '{}' is a directory",
                    path.display()
                ));
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_root() -> PathBuf {
    PathBuf::from("./export")
}

fn default_formats() -> Vec<String> {
    ExportFormat::SELECTABLE
        .iter()
        .map(|format| format.as_str().to_string())
        .collect()
}

fn default_archive_extensions() -> Vec<String> {
    vec!["f3d".to_string(), "f3z".to_string()]
}

fn default_max_component_depth() -> usize {
    DEFAULT_MAX_COMPONENT_DEPTH
}

fn default_true() -> bool {
    true
}
