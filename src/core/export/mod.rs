//! Export orchestration
//!
//! This module provides the export engine:
//! - Traversal of hubs, projects and folders ([`coordinator`])
//! - Per-file and per-component artifact writing ([`dispatcher`])
//! - Run state, summary and progress reporting

pub mod coordinator;
pub mod dispatcher;
pub mod options;
pub mod progress;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use dispatcher::{ArtifactOutcome, ExportDispatcher, FileOutcome, FileReport};
pub use options::ExportOptions;
pub use progress::{ProgressObserver, ProjectProgress, SilentProgress, TracingProgress};
pub use summary::{ExportIssue, RunOutcome, RunState, RunStatus, RunSummary};
