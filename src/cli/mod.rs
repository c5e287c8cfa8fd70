//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Design Vault using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Design Vault - incremental bulk export of a CAD design vault
#[derive(Parser, Debug)]
#[command(name = "designvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "designvault.toml", env = "DESIGNVAULT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DESIGNVAULT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every stale design in the vault
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List failure markers left by earlier runs
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
