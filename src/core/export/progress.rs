//! Progress reporting seam
//!
//! The engine reports where it is; rendering (a progress bar, a dialog, log
//! lines) belongs to whoever implements [`ProgressObserver`].

use crate::core::export::dispatcher::FileReport;
use crate::domain::DataFileRef;

/// Position of the project currently being exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProgress {
    /// 1-based hub position
    pub hub_position: usize,
    pub hub_count: usize,
    /// 1-based project position within the hub
    pub project_position: usize,
    pub project_count: usize,
    pub hub_name: String,
    pub project_name: String,
    /// Exportable files found in the project
    pub file_count: usize,
}

impl ProjectProgress {
    /// Counter line for the given 1-based file position
    pub fn message(&self, file_position: usize) -> String {
        format!(
            "Hub: {} of {} | Project: {} of {} | Exporting design {} of {}",
            self.hub_position,
            self.hub_count,
            self.project_position,
            self.project_count,
            file_position,
            self.file_count
        )
    }
}

/// Receives progress events from the traversal engine
pub trait ProgressObserver {
    /// A project's file list has been collected
    fn project_started(&mut self, _project: &ProjectProgress) {}

    /// A file is about to be exported (`position` is 1-based)
    fn file_started(&mut self, _project: &ProjectProgress, _position: usize, _file: &DataFileRef) {}

    /// A file has been handled
    fn file_finished(
        &mut self,
        _project: &ProjectProgress,
        _position: usize,
        _file: &DataFileRef,
        _report: &FileReport,
    ) {
    }
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {}

/// Observer that emits progress as debug log events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn project_started(&mut self, project: &ProjectProgress) {
        tracing::debug!(
            hub = %project.hub_name,
            project = %project.project_name,
            files = project.file_count,
            "Project file list collected"
        );
    }

    fn file_started(&mut self, project: &ProjectProgress, position: usize, file: &DataFileRef) {
        tracing::debug!(file = %file.name, "{}", project.message(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_message() {
        let progress = ProjectProgress {
            hub_position: 1,
            hub_count: 2,
            project_position: 3,
            project_count: 4,
            hub_name: "A".to_string(),
            project_name: "P".to_string(),
            file_count: 10,
        };
        assert_eq!(
            progress.message(5),
            "Hub: 1 of 2 | Project: 3 of 4 | Exporting design 5 of 10"
        );
    }
}
