//! Configuration management for Design Vault.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Design Vault uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DESIGNVAULT_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use designvault::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("designvault.toml")?;
//!
//! println!("Output root: {}", config.export.output_root.display());
//! println!("Formats: {:?}", config.export.formats);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`ExportConfig`] - Output root, formats, exportable extensions, depth limit
//! - [`SourceConfig`] - Where the design source is read from
//! - [`LoggingConfig`] - File log location and format
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! output_root = "${HOME}/vault-backup"
//! formats = ["step", "stl", "iges", "dxf"]
//! archive_extensions = ["f3d", "f3z"]
//!
//! [source]
//! manifest = "vault.json"
//!
//! [logging]
//! local_enabled = true
//! local_format = "text"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, LogFormat, LoggingConfig, SourceConfig, VaultConfig,
    DEFAULT_LOG_FILE_NAME,
};
