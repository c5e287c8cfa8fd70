//! Export coordinator - walks the design tree and drives the dispatcher
//!
//! Hubs and projects are visited in the order the source returns them. Each
//! project's exportable files are collected depth-first (a folder's files
//! before its subfolders) and handed to the [`ExportDispatcher`] one at a time.
//! A cancellation request is honoured between files, never in the middle of
//! one.

use crate::core::export::dispatcher::ExportDispatcher;
use crate::core::export::options::ExportOptions;
use crate::core::export::progress::{ProgressObserver, ProjectProgress};
use crate::core::export::summary::{RunState, RunStatus, RunSummary};
use crate::domain::{DataFileRef, DesignSource, FolderRef, ProjectRef, Result, VaultError};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator<'s, S: DesignSource + ?Sized> {
    source: &'s S,
    options: ExportOptions,
}

impl<'s, S: DesignSource + ?Sized> ExportCoordinator<'s, S> {
    /// Create a coordinator reading from `source`
    pub fn new(source: &'s S, options: ExportOptions) -> Self {
        Self { source, options }
    }

    /// Execute the export below `output_root`
    ///
    /// Per-file failures end up in the summary's issues. Only a failure to
    /// enumerate hubs, projects or folders (or to create the output root) ends
    /// the run early.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Aborted`] carrying the last directory written to
    /// when enumeration fails.
    pub fn run(
        &self,
        output_root: &Path,
        cancel: watch::Receiver<bool>,
        progress: &mut dyn ProgressObserver,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut state = RunState::new(output_root, cancel, self.options.dry_run);
        state.summary.status = RunStatus::Running;

        tracing::info!(
            run_id = %state.summary.run_id,
            output_root = %output_root.display(),
            dry_run = self.options.dry_run,
            "Starting export!"
        );

        if !self.options.dry_run {
            fs::create_dir_all(output_root).map_err(|source| VaultError::DirectoryCreation {
                path: output_root.to_path_buf(),
                source,
            })?;
        }

        if let Err(e) = self.traverse(output_root, &mut state, progress) {
            let last_location = state.last_location().display().to_string();
            tracing::error!(
                error = %e,
                last_location = %last_location,
                "Export aborted"
            );
            return Err(VaultError::Aborted {
                last_location,
                source: Box::new(e),
            });
        }

        if state.summary.status == RunStatus::Running {
            state.summary.status = RunStatus::Completed;
        }

        let summary = state.into_summary().with_duration(start_time.elapsed());
        summary.log_summary();
        tracing::info!("{}", summary.outcome().message());

        Ok(summary)
    }

    fn traverse(
        &self,
        output_root: &Path,
        state: &mut RunState,
        progress: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let dispatcher = ExportDispatcher::new(&self.options);

        let hubs = self.source.hubs()?;
        let hub_count = hubs.len();

        for (hub_index, hub) in hubs.iter().enumerate() {
            tracing::info!(hub = %hub.name, "Exporting hub");
            state.summary.hubs_visited += 1;

            let projects = self.source.projects(hub)?;
            let project_count = projects.len();

            for (project_index, project) in projects.iter().enumerate() {
                if state.is_cancel_requested() {
                    Self::cancel(state);
                    return Ok(());
                }

                tracing::info!(hub = %hub.name, project = %project.name, "Exporting project");
                state.summary.projects_visited += 1;

                let files = self.collect_files(project)?;
                if files.is_empty() {
                    tracing::info!(project = %project.name, "No files to export for this project");
                    continue;
                }
                state.summary.files_discovered += files.len();

                let position = ProjectProgress {
                    hub_position: hub_index + 1,
                    hub_count,
                    project_position: project_index + 1,
                    project_count,
                    hub_name: hub.name.clone(),
                    project_name: project.name.clone(),
                    file_count: files.len(),
                };
                progress.project_started(&position);

                for (file_index, file) in files.iter().enumerate() {
                    if state.is_cancel_requested() {
                        Self::cancel(state);
                        return Ok(());
                    }

                    let file_position = file_index + 1;
                    tracing::info!("{}", position.message(file_position));
                    progress.file_started(&position, file_position, file);

                    let report = dispatcher.export_file(self.source, output_root, file, state);

                    tracing::debug!(
                        file = %file.name,
                        outcome = ?report.outcome,
                        issues = report.issues,
                        "File handled"
                    );
                    progress.file_finished(&position, file_position, file, &report);
                }

                tracing::info!(project = %project.name, "Finished exporting project");
            }

            tracing::info!(hub = %hub.name, "Finished exporting hub");
        }

        Ok(())
    }

    fn cancel(state: &mut RunState) {
        tracing::info!("The process was cancelled!");
        state.summary.status = RunStatus::Cancelled;
    }

    /// Exportable files of a project, depth-first from its root folder
    pub fn collect_files(&self, project: &Arc<ProjectRef>) -> Result<Vec<DataFileRef>> {
        let root = self.source.root_folder(project)?;
        let mut files = Vec::new();
        self.collect_folder(&root, &mut files)?;
        Ok(files)
    }

    fn collect_folder(&self, folder: &Arc<FolderRef>, files: &mut Vec<DataFileRef>) -> Result<()> {
        for file in self.source.files(folder)? {
            if self.options.is_exportable_extension(&file.file_extension) {
                files.push(file);
            } else {
                tracing::info!(
                    file = %file.name,
                    extension = %file.file_extension,
                    "Not exporting file"
                );
            }
        }

        for sub_folder in self.source.sub_folders(folder)? {
            self.collect_folder(&sub_folder, files)?;
        }

        Ok(())
    }
}
