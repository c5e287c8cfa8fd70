//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod init;
pub mod status;
pub mod validate;

use crate::config::{load_config, VaultConfig};
use crate::domain::Result;
use std::path::Path;

/// Load the config file, falling back to defaults when it is absent and the
/// command line supplies what is needed
pub(crate) fn load_or_default(config_path: &str, allow_default: bool) -> Result<VaultConfig> {
    if allow_default && !Path::new(config_path).exists() {
        tracing::debug!(config_path = %config_path, "Configuration file not found, using defaults");
        return Ok(VaultConfig::default());
    }
    load_config(config_path)
}

/// Ask for confirmation on stdin
pub(crate) fn confirm(prompt: &str) -> anyhow::Result<bool> {
    use std::io::{self, Write};

    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
