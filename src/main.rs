// Design Vault - Incremental bulk export of a CAD design vault
// Copyright (c) 2025 Design Vault Contributors
// Licensed under the MIT License

use clap::Parser;
use designvault::cli::{Cli, Commands};
use designvault::config::LoggingConfig;
use designvault::logging::init_logging;
use std::path::PathBuf;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Export runs log to a file (output.log in the output root by default);
    // every other command logs to the console only
    let (config_level, logging_config, log_file) = logging_settings(&cli);
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let logging_guard = match init_logging(&log_level, &logging_config, log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Design Vault - incremental design export"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), cancelling after the current design...");
                    println!("\n⚠️  Cancel requested, finishing the current design...");
                    let _ = shutdown_tx.send(true);
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, cancelling after the current design...");
                    println!("\n⚠️  Cancel requested, finishing the current design...");
                    let _ = shutdown_tx.send(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), cancelling after the current design...");
                println!("\n⚠️  Cancel requested, finishing the current design...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Flush the file log before exiting
    drop(logging_guard);
    process::exit(exit_code);
}

/// Log level, logging config and log file for this invocation
fn logging_settings(cli: &Cli) -> (Option<String>, LoggingConfig, Option<PathBuf>) {
    let console_only = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };

    let Commands::Export(args) = &cli.command else {
        return (None, console_only, None);
    };

    // Configuration errors are reported by the export command itself
    match args.resolve_config(&cli.config) {
        Ok(config) => {
            // A dry run creates nothing in the output root, log file included
            let log_file = if config.application.dry_run && config.logging.local_path.is_none() {
                None
            } else {
                Some(config.log_file_path())
            };
            (
                Some(config.application.log_level.clone()),
                config.logging.clone(),
                log_file,
            )
        }
        Err(_) => (None, console_only, None),
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
