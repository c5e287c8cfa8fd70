//! Status command implementation
//!
//! This module implements the `status` command: list the `.failed` markers
//! left below the output root and optionally clear them.

use crate::cli::commands::{confirm, load_or_default};
use crate::core::state::marker::{artifact_for_marker, clear_markers, find_markers};
use crate::core::state::staleness::stored_timestamp;
use clap::Args;
use std::path::{Path, PathBuf};

/// What a leftover marker guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    /// The artifact exists but was never stamped: a partial or interrupted write
    Unconfirmed,
    /// No artifact next to the marker: the export failed before writing or
    /// produced nothing (e.g. a component without geometry)
    NeverWritten,
}

impl MarkerState {
    /// Classifies the marker of `artifact`
    pub fn of(artifact: &Path) -> Self {
        match stored_timestamp(artifact) {
            Some(_) => MarkerState::Unconfirmed,
            None => MarkerState::NeverWritten,
        }
    }
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the output root to inspect
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Delete the markers so the next export retries those artifacts
    #[arg(long)]
    pub clear: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        let output_root = match &self.output {
            Some(output) => output.clone(),
            None => match load_or_default(config_path, false) {
                Ok(config) => config.export.output_root,
                Err(e) => {
                    println!("❌ Failed to load configuration file");
                    println!("   Error: {e}");
                    return Ok(2);
                }
            },
        };

        println!("📊 Export Status: {}", output_root.display());
        println!();

        if !output_root.exists() {
            println!("No export found at {}.", output_root.display());
            println!("Run 'designvault export' to start exporting designs.");
            return Ok(0);
        }

        let markers = match find_markers(&output_root) {
            Ok(m) => m,
            Err(e) => {
                println!("❌ Failed to scan output root");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        if markers.is_empty() {
            println!("✅ No failure markers. Every artifact finished its last export.");
            return Ok(0);
        }

        let (unconfirmed, never_written): (Vec<_>, Vec<_>) = markers
            .iter()
            .map(|marker| {
                let artifact = artifact_for_marker(marker).unwrap_or_else(|| marker.clone());
                let state = MarkerState::of(&artifact);
                (artifact, state)
            })
            .partition(|(_, state)| *state == MarkerState::Unconfirmed);

        if !unconfirmed.is_empty() {
            println!(
                "⚠️  {} artifact(s) failed or were interrupted in an earlier run:",
                unconfirmed.len()
            );
            for (artifact, _) in &unconfirmed {
                println!("  - {}", artifact.display());
            }
            println!();
        }

        if !never_written.is_empty() {
            println!(
                "ℹ️  {} artifact(s) were never written (export failed early or had nothing to write):",
                never_written.len()
            );
            for (artifact, _) in &never_written {
                println!("  - {}", artifact.display());
            }
            println!();
        }

        if !self.clear {
            println!("These are skipped until their marker is deleted.");
            println!("Fix the cause, then run 'designvault status --clear'.");
            return Ok(0);
        }

        if !self.yes && !confirm("Delete these markers?")? {
            println!("Markers kept.");
            return Ok(0);
        }

        match clear_markers(&markers) {
            Ok(removed) => {
                println!("✅ Removed {removed} marker(s). The next export retries them.");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear markers");
                println!("❌ Failed to clear markers");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_clears_markers() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("Hub A/Widget.stp.failed");
        fs::create_dir_all(marker.parent().unwrap()).unwrap();
        fs::write(&marker, b"").unwrap();

        let args = StatusArgs {
            output: Some(dir.path().to_path_buf()),
            clear: true,
            yes: true,
        };
        let code = args.execute("does-not-exist.toml").await.unwrap();

        assert_eq!(code, 0);
        assert!(!marker.exists());
    }

    #[test]
    fn test_marker_state_distinguishes_partial_writes() {
        let dir = TempDir::new().unwrap();
        let partial = dir.path().join("Widget.stp");
        fs::write(&partial, b"ISO-10303-21;").unwrap();
        let missing = dir.path().join("Widget.stl");

        assert_eq!(MarkerState::of(&partial), MarkerState::Unconfirmed);
        assert_eq!(MarkerState::of(&missing), MarkerState::NeverWritten);
    }

    #[tokio::test]
    async fn test_status_without_clear_keeps_markers() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("Widget.f3d.failed");
        fs::write(&marker, b"").unwrap();

        let args = StatusArgs {
            output: Some(dir.path().to_path_buf()),
            clear: false,
            yes: false,
        };
        assert_eq!(args.execute("does-not-exist.toml").await.unwrap(), 0);
        assert!(marker.exists());
    }
}
