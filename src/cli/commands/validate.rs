//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Design Vault configuration file.

use crate::config::load_config;
use crate::core::export::ExportOptions;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let options = match ExportOptions::from_config(&config.export, config.application.dry_run) {
            Ok(o) => o,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Output Root: {}", config.export.output_root.display());
        println!(
            "  Formats: archive, {}",
            options
                .formats
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("  Document Extensions: {}", options.archive_extensions.join(", "));
        println!("  Max Component Depth: {}", options.max_component_depth);
        println!("  Body STL: {}", options.export_bodies);
        match &config.source.manifest {
            Some(path) => println!("  Manifest: {}", path.display()),
            None => println!("  Manifest: (not set, pass --manifest to export)"),
        }
        if config.logging.local_enabled {
            println!(
                "  Log File: {} ({:?})",
                config.log_file_path().display(),
                config.logging.local_format
            );
        } else {
            println!("  Log File: disabled");
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[export]\noutput_root = \"/srv/vault\"\n").unwrap();
        file.flush().unwrap();

        let path = file.path().to_string_lossy().to_string();
        assert_eq!(ValidateArgs {}.execute(&path).await.unwrap(), 0);
    }
}
