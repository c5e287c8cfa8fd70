//! Per-file export fan-out
//!
//! [`ExportDispatcher`] exports one document: the full archive, then every
//! component of its structural tree as STEP, STL (component and bodies), IGES
//! and one DXF per sketch. Every artifact goes through the same gate: skip when
//! an earlier run left a failure marker, skip when current, otherwise write
//! inside a marker scope.
//!
//! The archive's marker scope spans the whole document. The archive is only
//! stamped when every artifact below it finished without a recorded issue, so
//! a partially exported document is opened again on the next run.
//!
//! # Layout
//!
//! ```text
//! <root>/Hub <hub>/Project <project>/<folder>/.../<file>.<ext>/
//!     <file>.<version ext>           archive
//!     <component>.stp / .stl / .igs
//!     <component>/<sketch>.dxf
//!     <component>/<body>.stl
//!     <component>/<child>.stp ...    child components, recursively
//! ```

use crate::core::export::options::ExportOptions;
use crate::core::export::summary::RunState;
use crate::core::naming::{sanitize, sanitize_as_base_name};
use crate::core::state::marker::{
    guarded_write, marker_path, ArtifactGuard, Completion, GuardOutcome, MarkerScope,
};
use crate::core::state::staleness::is_up_to_date;
use crate::domain::{
    Component, DataFileRef, DesignSource, Document, ExportFormat, HostError, HostResult, Result,
    SourceTimestamp, VaultError,
};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Extension is not an exportable document type
    NotExportable,
    /// Archive was current; the document was not opened
    UpToDate,
    /// An earlier run left the archive's marker behind
    PendingRecovery,
    /// Dry run: the archive is stale and would be exported
    WouldExport,
    /// Document opened and exported
    Exported,
    /// The file was aborted or finished with issues
    Failed,
}

/// Outcome of one file plus the issues it added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileReport {
    pub outcome: FileOutcome,
    pub issues: usize,
}

/// What happened to a single artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// Already stamped with the source timestamp
    Current,
    /// Written and stamped
    Written,
    /// Export returned without producing a file
    NothingWritten,
    /// Skipped because of a marker left by an earlier run
    PreviousCrash,
}

/// Appends `.ext` to the full file name, keeping any dots already in it
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Directory that receives every artifact of `file`
pub fn destination_dir(output_root: &Path, file: &DataFileRef) -> PathBuf {
    let mut path = output_root
        .join(format!("Hub {}", sanitize_as_base_name(&file.hub().name)))
        .join(format!(
            "Project {}",
            sanitize_as_base_name(&file.project().name)
        ));
    for folder in file.parent_folder.ancestry_names() {
        path.push(sanitize_as_base_name(folder));
    }
    path.push(format!(
        "{}.{}",
        sanitize_as_base_name(&file.name),
        file.file_extension
    ));
    path
}

/// Path of the full-document archive inside the file's directory
pub fn archive_path(file_dir: &Path, file: &DataFileRef) -> PathBuf {
    file_dir.join(format!(
        "{}.{}",
        sanitize_as_base_name(&file.name),
        file.latest_version_extension
    ))
}

fn file_context(file: &DataFileRef) -> String {
    format!(
        "hub={}, project={}, file={}",
        file.hub().name,
        file.project().name,
        file.name
    )
}

/// An opened document that is closed on every exit path
///
/// [`OpenDocument::close`] reports the close result; if the value is dropped
/// instead (early return, panic) the document is still closed and a failure
/// is only logged.
pub struct OpenDocument<'a> {
    document: Box<dyn Document + 'a>,
    closed: bool,
}

impl<'a> OpenDocument<'a> {
    pub fn new(document: Box<dyn Document + 'a>) -> Self {
        Self {
            document,
            closed: false,
        }
    }

    pub fn document(&self) -> &(dyn Document + 'a) {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> &mut (dyn Document + 'a) {
        self.document.as_mut()
    }

    /// Closes the document without saving
    pub fn close(mut self) -> HostResult<()> {
        self.closed = true;
        self.document.close(false)
    }
}

impl Drop for OpenDocument<'_> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.document.close(false) {
                tracing::warn!(error = %e, "Failed to close document during cleanup");
            }
        }
    }
}

/// Exports documents and their component trees
pub struct ExportDispatcher<'o> {
    options: &'o ExportOptions,
}

impl<'o> ExportDispatcher<'o> {
    pub fn new(options: &'o ExportOptions) -> Self {
        Self { options }
    }

    /// Export one file below `output_root`
    ///
    /// Failures are recorded in `state` and never propagate; the returned
    /// report says how many issues this file added.
    pub fn export_file<S>(
        &self,
        source: &S,
        output_root: &Path,
        file: &DataFileRef,
        state: &mut RunState,
    ) -> FileReport
    where
        S: DesignSource + ?Sized,
    {
        let issues_before = state.issue_count();
        let outcome = self.export_file_inner(source, output_root, file, state);
        FileReport {
            outcome,
            issues: state.issue_count() - issues_before,
        }
    }

    fn export_file_inner<S>(
        &self,
        source: &S,
        output_root: &Path,
        file: &DataFileRef,
        state: &mut RunState,
    ) -> FileOutcome
    where
        S: DesignSource + ?Sized,
    {
        if !self.options.is_exportable_extension(&file.file_extension) {
            tracing::info!(file = %file.name, extension = %file.file_extension, "Not exporting file");
            return FileOutcome::NotExportable;
        }

        tracing::info!(file = %file.name, "Exporting file");

        let file_dir = destination_dir(output_root, file);
        let archive = archive_path(&file_dir, file);
        let modified = file.latest_version_created;

        if self.options.dry_run {
            return self.preview_file(&archive, modified, state);
        }

        if let Err(source_err) = fs::create_dir_all(&file_dir) {
            let err = VaultError::DirectoryCreation {
                path: file_dir.clone(),
                source: source_err,
            };
            state.record_issue(&err, file_context(file));
            return FileOutcome::Failed;
        }
        state.set_location(&file_dir);

        if is_up_to_date(&archive, modified) {
            tracing::info!(file = %file.name, "Model has not changed");
            state.summary.files_up_to_date += 1;
            return FileOutcome::UpToDate;
        }

        let guard = match ArtifactGuard::enter(&archive, modified) {
            Ok(MarkerScope::Armed(guard)) => guard,
            Ok(MarkerScope::PreviousCrash { marker }) => {
                state.summary.pending_recovery.push(marker);
                return FileOutcome::PendingRecovery;
            }
            Err(e) => {
                state.record_issue(&e, file_context(file));
                return FileOutcome::Failed;
            }
        };

        let document = match source.open(file) {
            Ok(Some(document)) => document,
            Ok(None) => {
                let err = VaultError::Open {
                    file: file.name.clone(),
                    source: HostError::new("Documents.open returned None"),
                };
                state.record_issue(&err, file_context(file));
                guard.abandon();
                return FileOutcome::Failed;
            }
            Err(source_err) => {
                let err = VaultError::Open {
                    file: file.name.clone(),
                    source: source_err,
                };
                state.record_issue(&err, file_context(file));
                guard.abandon();
                return FileOutcome::Failed;
            }
        };

        let mut session = OpenDocument::new(document);
        let issues_before = state.issue_count();
        let result = self.export_document(&mut session, &file_dir, &archive, file, state);
        let clean = result.is_ok() && state.issue_count() == issues_before;

        if let Err(e) = &result {
            tracing::error!(file = %file.name, "Failed while working on file");
            state.record_issue(e, file_context(file));
        }

        if let Err(source_err) = session.close() {
            let err = VaultError::Close {
                file: file.name.clone(),
                source: source_err,
            };
            state.record_issue(&err, file_context(file));
        }

        if !clean {
            tracing::warn!(
                file = %file.name,
                marker = %guard.marker().display(),
                "Document exported with issues, leaving archive marker"
            );
            guard.abandon();
            return FileOutcome::Failed;
        }

        match guard.complete() {
            Ok(Completion::Stamped) => {
                state.summary.artifacts_written += 1;
                state.summary.files_exported += 1;
                tracing::info!(file = %file.name, "Finished exporting file");
                FileOutcome::Exported
            }
            Ok(Completion::NothingWritten) => {
                tracing::warn!(
                    archive = %archive.display(),
                    "Archive export produced no file, marker kept"
                );
                state.summary.empty_artifacts.push(archive);
                state.summary.files_exported += 1;
                FileOutcome::Exported
            }
            Err(e) => {
                state.record_issue(&e, file_context(file));
                FileOutcome::Failed
            }
        }
    }

    fn preview_file(
        &self,
        archive: &Path,
        modified: SourceTimestamp,
        state: &mut RunState,
    ) -> FileOutcome {
        if is_up_to_date(archive, modified) {
            state.summary.files_up_to_date += 1;
            return FileOutcome::UpToDate;
        }

        let marker = marker_path(archive);
        if marker.exists() {
            tracing::info!(marker = %marker.display(), "Previous export failed here, would skip");
            state.summary.pending_recovery.push(marker);
            return FileOutcome::PendingRecovery;
        }

        tracing::info!(archive = %archive.display(), "Would export");
        state.summary.files_pending_export += 1;
        FileOutcome::WouldExport
    }

    fn export_document(
        &self,
        session: &mut OpenDocument<'_>,
        file_dir: &Path,
        archive: &Path,
        file: &DataFileRef,
        state: &mut RunState,
    ) -> Result<()> {
        session
            .document_mut()
            .activate()
            .map_err(|source| VaultError::Open {
                file: file.name.clone(),
                source,
            })?;

        tracing::info!(directory = %file_dir.display(), "Writing to directory");

        let document = session.document();
        document
            .export_archive(archive)
            .map_err(|source| VaultError::FormatExport {
                format: ExportFormat::Archive,
                path: archive.to_path_buf(),
                source,
            })?;

        let root = document
            .root_component()
            .map_err(|source| VaultError::ComponentResolution {
                parent: file.name.clone(),
                source,
            })?;

        let mut lineage = Vec::new();
        self.export_component(
            file_dir,
            root.as_ref(),
            file.latest_version_created,
            state,
            &mut lineage,
        );

        Ok(())
    }

    /// Export one component and, recursively, its children
    ///
    /// `base` is the directory the component's own artifacts go into;
    /// children use `<base>/<component name>`. `lineage` holds the keys of the
    /// components currently being exported above this one.
    pub fn export_component(
        &self,
        base: &Path,
        component: &dyn Component,
        modified: SourceTimestamp,
        state: &mut RunState,
        lineage: &mut Vec<String>,
    ) {
        let key = component.key();
        let display_name = component.name();

        if lineage.contains(&key) || lineage.len() >= self.options.max_component_depth {
            let err = VaultError::CycleDetected {
                component: display_name,
                depth: lineage.len(),
            };
            state.record_issue(&err, base.display().to_string());
            return;
        }

        let output = base.join(sanitize_as_base_name(&display_name));
        let context = format!("component={display_name}");
        tracing::info!(component = %display_name, base = %base.display(), "Writing component");

        if self.options.wants(ExportFormat::Step) {
            let artifact = append_extension(&output, "stp");
            if let Err(e) = self.write_artifact(ExportFormat::Step, &artifact, modified, state, |p| {
                component.export_step(p)
            }) {
                state.record_issue(&e, context.clone());
            }
        }

        if self.options.wants(ExportFormat::Stl) {
            self.write_component_mesh(&output, component, modified, state);
        }

        if self.options.wants(ExportFormat::Iges) {
            let artifact = append_extension(&output, "igs");
            if let Err(e) = self.write_artifact(ExportFormat::Iges, &artifact, modified, state, |p| {
                component.export_iges(p)
            }) {
                state.record_issue(&e, context.clone());
            }
        }

        if self.options.wants(ExportFormat::Dxf) {
            for sketch in component.sketches() {
                let artifact = output.join(format!("{}.dxf", sanitize(&sketch.name())));
                if let Err(e) = self.write_artifact(ExportFormat::Dxf, &artifact, modified, state, |p| {
                    sketch.export_dxf(p)
                }) {
                    state.record_issue(&e, format!("{context}, sketch={}", sketch.name()));
                }
            }
        }

        lineage.push(key);
        for occurrence in component.occurrences() {
            match occurrence.component() {
                Ok(child) => {
                    self.export_component(&output, child.as_ref(), modified, state, lineage);
                }
                Err(source) => {
                    let err = VaultError::ComponentResolution {
                        parent: display_name.clone(),
                        source,
                    };
                    tracing::error!(error = %err, "Failed to get component");
                }
            }
        }
        lineage.pop();
    }

    fn write_component_mesh(
        &self,
        output: &Path,
        component: &dyn Component,
        modified: SourceTimestamp,
        state: &mut RunState,
    ) {
        let artifact = append_extension(output, "stl");
        if let Err(e) = self.write_artifact(ExportFormat::Stl, &artifact, modified, state, |p| {
            component.export_mesh(p)
        }) {
            let content = component.occurrences().len() + component.bodies().len();
            if content > 0 {
                state.record_issue(&e, format!("component={}", component.name()));
            } else {
                tracing::warn!(
                    error = %e,
                    artifact = %artifact.display(),
                    "Failed writing stl file, probably an empty model"
                );
            }
        }

        if !self.options.export_bodies {
            return;
        }

        for body in component.bodies() {
            let artifact = output.join(format!("{}.stl", sanitize(&body.name())));
            if let Err(e) = self.write_artifact(ExportFormat::Stl, &artifact, modified, state, |p| {
                body.export_mesh(p)
            }) {
                tracing::debug!(error = %e, body = %body.name(), "Body export failed, probably an empty body");
            }
        }
    }

    /// Gate and write a single artifact
    ///
    /// # Errors
    ///
    /// Returns the export or marker error; the artifact's marker is then left
    /// in place.
    pub fn write_artifact<F>(
        &self,
        format: ExportFormat,
        artifact: &Path,
        modified: SourceTimestamp,
        state: &mut RunState,
        export: F,
    ) -> Result<ArtifactOutcome>
    where
        F: FnOnce(&Path) -> HostResult<()>,
    {
        let marker = marker_path(artifact);
        if marker.exists() {
            tracing::info!(
                marker = %marker.display(),
                "Seems like a previous export failed. Fix the problem and delete the marker file"
            );
            state.summary.pending_recovery.push(marker);
            return Ok(ArtifactOutcome::PreviousCrash);
        }

        if is_up_to_date(artifact, modified) {
            tracing::debug!(artifact = %artifact.display(), "Artifact is current");
            state.summary.artifacts_current += 1;
            return Ok(ArtifactOutcome::Current);
        }

        tracing::info!(artifact = %artifact.display(), "Writing {format} file");
        let outcome = guarded_write(artifact, modified, |path| {
            export(path).map_err(|source| VaultError::FormatExport {
                format,
                path: path.to_path_buf(),
                source,
            })
        })?;

        Ok(match outcome {
            GuardOutcome::Written => {
                state.summary.artifacts_written += 1;
                ArtifactOutcome::Written
            }
            GuardOutcome::NothingWritten => {
                tracing::warn!(artifact = %artifact.display(), "Export produced no file, marker kept");
                state.summary.empty_artifacts.push(artifact.to_path_buf());
                ArtifactOutcome::NothingWritten
            }
            GuardOutcome::PreviousCrash(marker) => {
                state.summary.pending_recovery.push(marker);
                ArtifactOutcome::PreviousCrash
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FolderRef, HubRef, NodeHandle, ProjectRef};
    use std::sync::Arc;

    fn file(name: &str, hub: &str, project: &str, folders: &[&str]) -> DataFileRef {
        let hub = Arc::new(HubRef {
            handle: NodeHandle::new("hub").unwrap(),
            name: hub.to_string(),
        });
        let project = Arc::new(ProjectRef {
            handle: NodeHandle::new("project").unwrap(),
            name: project.to_string(),
            parent_hub: hub,
        });
        let mut parent: Option<Arc<FolderRef>> = None;
        for folder in folders {
            parent = Some(Arc::new(FolderRef {
                handle: NodeHandle::new(format!("folder:{folder}")).unwrap(),
                name: folder.to_string(),
                parent_folder: parent,
                parent_project: project.clone(),
            }));
        }
        DataFileRef {
            handle: NodeHandle::new("file").unwrap(),
            name: name.to_string(),
            file_extension: "f3d".to_string(),
            latest_version_extension: "f3d".to_string(),
            latest_version_created: SourceTimestamp::from_unix_seconds(100),
            parent_folder: parent.unwrap(),
        }
    }

    #[test]
    fn test_destination_dir_mirrors_hierarchy() {
        let f = file("Widget", "A", "P", &["Root", "Parts"]);
        assert_eq!(
            destination_dir(Path::new("/out"), &f),
            PathBuf::from("/out/Hub A/Project P/Root/Parts/Widget.f3d")
        );
        assert_eq!(
            archive_path(&destination_dir(Path::new("/out"), &f), &f),
            PathBuf::from("/out/Hub A/Project P/Root/Parts/Widget.f3d/Widget.f3d")
        );
    }

    #[test]
    fn test_destination_dir_sanitizes_segments() {
        let f = file("Bracket: v2/final", "My*Hub", "Proj<1>", &["Root?"]);
        assert_eq!(
            destination_dir(Path::new("/out"), &f),
            PathBuf::from("/out/Hub MyHub/Project Proj1/Root/Bracket v2final.f3d")
        );
    }

    #[test]
    fn test_append_extension_keeps_dots() {
        assert_eq!(
            append_extension(Path::new("/out/Part v1.2"), "stp"),
            PathBuf::from("/out/Part v1.2.stp")
        );
    }
}
