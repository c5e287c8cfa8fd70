//! Integration tests for graceful shutdown functionality
//!
//! These tests verify that:
//! - Shutdown signals are properly handled
//! - Cancellation is honoured between files, never in the middle of one
//! - Later projects and hubs are skipped once cancelled
//! - Files finished before the signal stay exported and stamped
//! - A cancelled run resumes where it stopped on the next run

use designvault::adapters::manifest::ManifestSource;
use designvault::core::export::{
    ExportCoordinator, ExportOptions, FileReport, ProgressObserver, ProjectProgress, RunOutcome,
    RunStatus, SilentProgress,
};
use designvault::core::state::is_up_to_date;
use designvault::domain::{DataFileRef, SourceTimestamp};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use tokio::sync::watch;

const CREATED: i64 = 1_650_000_000;

fn five_designs() -> ManifestSource {
    let files: Vec<_> = (1..=5)
        .map(|i| {
            json!({
                "name": format!("Design{i}"),
                "created": CREATED,
                "design": {
                    "root": format!("Design{i}"),
                    "components": [{ "name": format!("Design{i}"), "bodies": [{ "name": "B" }] }]
                }
            })
        })
        .collect();
    let manifest = json!({
        "hubs": [{
            "name": "A",
            "projects": [{ "name": "P", "root": { "name": "Root", "files": files } }]
        }]
    });
    ManifestSource::from_json(&manifest.to_string()).unwrap()
}

fn archive(root: &Path, i: usize) -> std::path::PathBuf {
    root.join(format!("Hub A/Project P/Root/Design{i}.f3d/Design{i}.f3d"))
}

/// Requests shutdown once the given file position has finished
struct CancelAfter {
    position: usize,
    shutdown_tx: watch::Sender<bool>,
    finished: Vec<String>,
}

impl ProgressObserver for CancelAfter {
    fn file_finished(
        &mut self,
        _project: &ProjectProgress,
        position: usize,
        file: &DataFileRef,
        _report: &FileReport,
    ) {
        self.finished.push(file.name.clone());
        if position == self.position {
            self.shutdown_tx.send(true).unwrap();
        }
    }
}

#[tokio::test]
async fn test_shutdown_signal_channel_creation() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Initially, shutdown should be false
    assert!(!*shutdown_rx.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx.borrow());
}

#[test]
fn test_cancel_between_files() {
    let out = TempDir::new().unwrap();
    let source = five_designs();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut observer = CancelAfter {
        position: 2,
        shutdown_tx,
        finished: Vec::new(),
    };

    let summary = ExportCoordinator::new(&source, ExportOptions::default())
        .run(out.path(), shutdown_rx, &mut observer)
        .unwrap();

    assert_eq!(summary.status, RunStatus::Cancelled);
    assert_eq!(summary.outcome(), RunOutcome::Cancelled);
    assert_eq!(source.open_attempts(), 2);
    assert_eq!(observer.finished, vec!["Design1", "Design2"]);

    let ts = SourceTimestamp::from_unix_seconds(CREATED);
    assert!(is_up_to_date(archive(out.path(), 1), ts));
    assert!(is_up_to_date(archive(out.path(), 2), ts));
    assert!(!archive(out.path(), 3).exists());
}

#[test]
fn test_resume_after_cancel() {
    let out = TempDir::new().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut observer = CancelAfter {
        position: 3,
        shutdown_tx,
        finished: Vec::new(),
    };
    ExportCoordinator::new(&five_designs(), ExportOptions::default())
        .run(out.path(), shutdown_rx, &mut observer)
        .unwrap();

    let source = five_designs();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let summary = ExportCoordinator::new(&source, ExportOptions::default())
        .run(out.path(), shutdown_rx, &mut SilentProgress)
        .unwrap();

    assert_eq!(summary.outcome(), RunOutcome::Success);
    assert_eq!(summary.files_up_to_date, 3);
    assert_eq!(summary.files_exported, 2);
    assert_eq!(source.open_attempts(), 2);
}

#[test]
fn test_cancel_before_start_exports_nothing() {
    let out = TempDir::new().unwrap();
    let source = five_designs();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let summary = ExportCoordinator::new(&source, ExportOptions::default())
        .run(out.path(), shutdown_rx, &mut SilentProgress)
        .unwrap();

    assert_eq!(summary.status, RunStatus::Cancelled);
    assert_eq!(summary.files_exported, 0);
    assert_eq!(source.open_attempts(), 0);
}

#[tokio::test]
async fn test_cancel_from_async_task() {
    let out = TempDir::new().unwrap();
    let root = out.path().to_path_buf();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Signal arrives before the blocking export picks up its first project
    shutdown_tx.send(true).unwrap();

    let (summary, open_attempts) = tokio::task::spawn_blocking(move || {
        let source = five_designs();
        let summary = ExportCoordinator::new(&source, ExportOptions::default())
            .run(&root, shutdown_rx, &mut SilentProgress)?;
        Ok::<_, designvault::domain::VaultError>((summary, source.open_attempts()))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(summary.outcome(), RunOutcome::Cancelled);
    assert_eq!(open_attempts, 0);
    drop(shutdown_tx);
}

#[test]
fn test_cancel_skips_remaining_projects_and_hubs() {
    let design = |name: &str| {
        json!({
            "name": name,
            "created": CREATED,
            "design": {
                "root": name,
                "components": [{ "name": name, "bodies": [{ "name": "B" }] }]
            }
        })
    };
    let manifest = json!({
        "hubs": [
            {
                "name": "A",
                "projects": [
                    { "name": "P", "root": { "name": "Root", "files": [design("Bracket"), design("Hinge")] } },
                    { "name": "Q", "root": { "name": "Root", "files": [design("Lever")] } }
                ]
            },
            {
                "name": "B",
                "projects": [
                    { "name": "R", "root": { "name": "Root", "files": [design("Spring")] } }
                ]
            }
        ]
    });
    let source = ManifestSource::from_json(&manifest.to_string()).unwrap();
    let out = TempDir::new().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Cancel once the last file of the first project has finished
    let mut observer = CancelAfter {
        position: 2,
        shutdown_tx,
        finished: Vec::new(),
    };

    let summary = ExportCoordinator::new(&source, ExportOptions::default())
        .run(out.path(), shutdown_rx, &mut observer)
        .unwrap();

    assert_eq!(summary.status, RunStatus::Cancelled);
    assert_eq!(observer.finished, vec!["Bracket", "Hinge"]);
    assert_eq!(source.open_attempts(), 2);
    assert_eq!(summary.hubs_visited, 1);
    assert_eq!(summary.projects_visited, 1);
    assert!(!out.path().join("Hub A/Project Q").exists());
    assert!(!out.path().join("Hub B").exists());
}
