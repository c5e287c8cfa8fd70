//! Export command implementation
//!
//! This module implements the `export` command: mirror every stale design of
//! the vault into the output root.

use crate::adapters::manifest::ManifestSource;
use crate::cli::commands::{confirm, load_or_default};
use crate::config::VaultConfig;
use crate::core::export::{ExportCoordinator, ExportOptions, RunOutcome, RunSummary, TracingProgress};
use crate::domain::{Result, VaultError};
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - report what would be exported without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override the output root
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the manifest describing the vault
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
}

impl ExportArgs {
    /// Configuration for this run: the config file with CLI overrides applied
    ///
    /// A missing config file is accepted when `--output` and `--manifest` are
    /// both given.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if loading or validation fails.
    pub fn resolve_config(&self, config_path: &str) -> Result<VaultConfig> {
        let allow_default = self.output.is_some() && self.manifest.is_some();
        let mut config = load_or_default(config_path, allow_default)?;

        if let Some(output) = &self.output {
            config.export.output_root = output.clone();
        }
        if let Some(manifest) = &self.manifest {
            config.source.manifest = Some(manifest.clone());
        }
        if self.dry_run {
            config.application.dry_run = true;
        }

        config.validate().map_err(|e| {
            VaultError::Configuration(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match self.resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration failed");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let Some(manifest_path) = config.source.manifest.clone() else {
            eprintln!("No design source configured: set source.manifest or pass --manifest");
            return Ok(2);
        };

        let dry_run = config.application.dry_run;
        let options = match ExportOptions::from_config(&config.export, dry_run) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };
        let output_root = config.export.output_root.clone();

        if dry_run {
            tracing::info!("Dry run mode enabled - nothing will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        if !self.yes && !dry_run {
            println!("Export Configuration:");
            println!("  Manifest: {}", manifest_path.display());
            println!("  Output root: {}", output_root.display());
            println!("  Formats: {}", config.export.formats.join(", "));
            println!();
            if !confirm("Proceed with export?")? {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        println!("🚀 Starting export...");
        println!();

        let result = tokio::task::spawn_blocking(move || -> Result<RunSummary> {
            let source = ManifestSource::from_file(&manifest_path)?;
            let coordinator = ExportCoordinator::new(&source, options);
            coordinator.run(&output_root, shutdown_signal, &mut TracingProgress)
        })
        .await?;

        let summary = match result {
            Ok(s) => s,
            Err(e @ VaultError::Manifest(_)) => {
                tracing::error!(error = %e, "Failed to load design source");
                eprintln!("Failed to load design source: {e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary);

        Ok(exit_code(summary.outcome()))
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Run: {}", summary.run_id);
    println!("  Hubs: {}", summary.hubs_visited);
    println!("  Projects: {}", summary.projects_visited);
    println!("  Designs found: {}", summary.files_discovered);
    if summary.dry_run {
        println!("  Would export: {}", summary.files_pending_export);
    } else {
        println!("  Designs exported: {}", summary.files_exported);
        println!("  Artifacts written: {}", summary.artifacts_written);
    }
    println!("  Unchanged: {}", summary.files_up_to_date);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.pending_recovery.is_empty() {
        println!("⚠️  Skipped after an earlier failure (fix, then delete the marker):");
        for marker in &summary.pending_recovery {
            println!("  - {}", marker.display());
        }
        println!();
    }

    if !summary.issues.is_empty() {
        println!("⚠️  Issues encountered:");
        for issue in &summary.issues {
            println!("  - {:?}: {}", issue.kind, issue.message);
            if let Some(context) = &issue.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }

    println!("{}", summary.outcome().message());
}

/// Process exit code for a finished run
pub fn exit_code(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Success => 0,
        RunOutcome::CompletedWithIssues(_) => 1,
        // SIGINT exit code (standard Unix convention)
        RunOutcome::Cancelled => 130,
    }
}
