//! Run state and export summary
//!
//! [`RunState`] is created when a run starts and threaded by reference through
//! the traversal and the dispatcher. It owns the cumulative [`RunSummary`], the
//! cancellation receiver and the last directory being written.

use crate::domain::{IssueKind, VaultError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    NotStarted,
    Running,
    Completed,
    Cancelled,
}

/// Final verdict shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Finished with no issues
    Success,
    /// Stopped by a cancellation request
    Cancelled,
    /// Finished with this many issues
    CompletedWithIssues(usize),
}

impl RunOutcome {
    /// Operator-facing summary line
    pub fn message(&self) -> String {
        match self {
            RunOutcome::Success => "Export finished completely successfully!".to_string(),
            RunOutcome::Cancelled => "Cancelled!".to_string(),
            RunOutcome::CompletedWithIssues(count) => format!(
                "The exporting process ran into {count} issue{}. Please check the log for more information",
                if *count > 1 { "s" } else { "" }
            ),
        }
    }
}

/// An issue recorded during the run
#[derive(Debug, Clone)]
pub struct ExportIssue {
    /// Category of the issue
    pub kind: IssueKind,

    /// Error message
    pub message: String,

    /// Optional context (file, component or artifact)
    pub context: Option<String>,
}

impl ExportIssue {
    /// Create a new issue
    pub fn new(kind: IssueKind, message: String) -> Self {
        Self {
            kind,
            message,
            context: None,
        }
    }

    /// Add context to the issue
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifier attached to every log event of the run
    pub run_id: Uuid,

    pub status: RunStatus,

    /// Dry-run mode: nothing was written
    pub dry_run: bool,

    pub hubs_visited: usize,

    pub projects_visited: usize,

    /// Exportable files found across all visited projects
    pub files_discovered: usize,

    /// Files whose document was opened and exported
    pub files_exported: usize,

    /// Files skipped because their archive was current
    pub files_up_to_date: usize,

    /// Files a dry run would have exported
    pub files_pending_export: usize,

    /// Artifacts written and stamped this run
    pub artifacts_written: usize,

    /// Artifacts skipped because they were current
    pub artifacts_current: usize,

    /// Markers left by an earlier run; those artifacts were skipped
    pub pending_recovery: Vec<PathBuf>,

    /// Artifacts whose export returned without producing a file
    pub empty_artifacts: Vec<PathBuf>,

    /// Issues encountered during the run
    pub issues: Vec<ExportIssue>,

    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::NotStarted,
            dry_run,
            hubs_visited: 0,
            projects_visited: 0,
            files_discovered: 0,
            files_exported: 0,
            files_up_to_date: 0,
            files_pending_export: 0,
            artifacts_written: 0,
            artifacts_current: 0,
            pending_recovery: Vec::new(),
            empty_artifacts: Vec::new(),
            issues: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of issues recorded
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Whether the run stopped on a cancellation request
    pub fn cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }

    /// Final verdict of the run
    pub fn outcome(&self) -> RunOutcome {
        if self.cancelled() {
            RunOutcome::Cancelled
        } else if self.issues.is_empty() {
            RunOutcome::Success
        } else {
            RunOutcome::CompletedWithIssues(self.issues.len())
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            status = ?self.status,
            dry_run = self.dry_run,
            hubs = self.hubs_visited,
            projects = self.projects_visited,
            files_discovered = self.files_discovered,
            files_exported = self.files_exported,
            files_up_to_date = self.files_up_to_date,
            artifacts_written = self.artifacts_written,
            artifacts_current = self.artifacts_current,
            pending_recovery = self.pending_recovery.len(),
            issues = self.issues.len(),
            duration_secs = self.duration.as_secs(),
            "Done exporting!"
        );

        for marker in &self.pending_recovery {
            tracing::warn!(
                marker = %marker.display(),
                "Artifact skipped: a previous export failed here. Fix the problem and delete the marker"
            );
        }

        for issue in &self.issues {
            tracing::warn!(
                kind = ?issue.kind,
                message = %issue.message,
                context = issue.context.as_deref().unwrap_or(""),
                "Export issue"
            );
        }
    }
}

/// Mutable state of one run
pub struct RunState {
    pub summary: RunSummary,
    output_root: PathBuf,
    cancel: watch::Receiver<bool>,
    last_location: Option<PathBuf>,
}

impl RunState {
    /// Create the state for a run writing below `output_root`
    pub fn new(output_root: &Path, cancel: watch::Receiver<bool>, dry_run: bool) -> Self {
        Self {
            summary: RunSummary::new(dry_run),
            output_root: output_root.to_path_buf(),
            cancel,
            last_location: None,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Whether cancellation has been requested
    pub fn is_cancel_requested(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Record an issue and log it
    pub fn record_issue(&mut self, error: &VaultError, context: impl Into<String>) {
        let context = context.into();
        tracing::error!(
            run_id = %self.summary.run_id,
            error = %error,
            context = %context,
            "Export issue"
        );
        self.summary
            .issues
            .push(ExportIssue::new(error.issue_kind(), error.to_string()).with_context(context));
    }

    pub fn issue_count(&self) -> usize {
        self.summary.issue_count()
    }

    /// Remember the directory currently being written
    pub fn set_location(&mut self, location: &Path) {
        self.last_location = Some(location.to_path_buf());
    }

    /// Last directory written to, or the output root before any
    pub fn last_location(&self) -> &Path {
        self.last_location.as_deref().unwrap_or(&self.output_root)
    }

    /// Consume the state, yielding the summary
    pub fn into_summary(self) -> RunSummary {
        self.summary
    }
}
