//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "designvault.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Design Vault configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your output root and manifest", self.output);
                println!("  2. Validate configuration: designvault validate-config");
                println!("  3. Preview: designvault export --dry-run");
                println!("  4. Run export: designvault export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Design Vault Configuration File

[application]
log_level = "info"
dry_run = false

[export]
output_root = "./export"
formats = ["step", "stl", "iges", "dxf"]

[source]
manifest = "vault.json"

[logging]
local_enabled = true
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Design Vault Configuration File
#
# Every option with its default. Values may reference environment
# variables with ${VAR_NAME}; DESIGNVAULT_<SECTION>_<KEY> variables
# override any value (e.g. DESIGNVAULT_EXPORT_OUTPUT_ROOT).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode: report stale designs, write nothing
dry_run = false

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Directory the vault is mirrored into:
#   Hub <hub>/Project <project>/<folders>/<design>.<ext>/...
output_root = "./export"

# Per-component formats. The full-document archive is always written.
formats = ["step", "stl", "iges", "dxf"]

# File extensions treated as exportable designs; other files are skipped
archive_extensions = ["f3d", "f3z"]

# Component nesting deeper than this is reported as a cycle
max_component_depth = 64

# Write one STL per body next to the component STL
export_bodies = true

# ============================================================================
# Design Source
# ============================================================================
[source]
# JSON manifest describing hubs, projects, folders and designs
manifest = "vault.json"

# ============================================================================
# Logging
# ============================================================================
[logging]
# Write a run log file
local_enabled = true

# Log file path (default: output.log in the output root)
# local_path = "/var/log/designvault/output.log"

# Log file format (text or json)
local_format = "text"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaultConfig;

    #[test]
    fn test_generated_configs_parse_and_validate() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: VaultConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config.export.formats.len(), 4);
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("designvault.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    }
}
