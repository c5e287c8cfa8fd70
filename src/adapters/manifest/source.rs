//! Design source backed by a manifest
//!
//! Exports write small JSON descriptors instead of real CAD files, which is
//! enough for the engine: it only cares whether a file appeared at the path it
//! asked for.

use crate::adapters::manifest::models::{
    BodySpec, ComponentSpec, DesignSpec, FileSpec, FolderSpec, Manifest, OpenBehavior,
    ProjectSpec, SketchSpec, WriteBehavior,
};
use crate::domain::{
    Body, Component, DataFileRef, DesignSource, Document, ExportFormat, FolderRef,
    HostError, HostResult, HubRef, NodeHandle, Occurrence, ProjectRef, Result, Sketch,
    SourceTimestamp, VaultError,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A [`DesignSource`] reading its hierarchy from a [`Manifest`]
#[derive(Debug)]
pub struct ManifestSource {
    manifest: Manifest,
    open_attempts: AtomicUsize,
    closes: AtomicUsize,
}

impl ManifestSource {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            open_attempts: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    /// Parse a manifest from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)
            .map_err(|e| VaultError::Manifest(format!("Invalid manifest: {e}")))?;
        Ok(Self::new(manifest))
    }

    /// Load a manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            VaultError::Manifest(format!("Failed to read manifest {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Loaded manifest");
        Self::from_json(&json)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Number of times a document open was requested
    pub fn open_attempts(&self) -> usize {
        self.open_attempts.load(Ordering::SeqCst)
    }

    /// Number of times a document was closed
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn project_at(&self, indices: &[usize]) -> HostResult<&ProjectSpec> {
        match indices {
            [hub, project, ..] => self
                .manifest
                .hubs
                .get(*hub)
                .and_then(|h| h.projects.get(*project))
                .ok_or_else(|| HostError::new(format!("No project at {indices:?}"))),
            _ => Err(HostError::new(format!("No project at {indices:?}"))),
        }
    }

    fn folder_at(&self, indices: &[usize]) -> HostResult<&FolderSpec> {
        let mut folder = &self.project_at(indices)?.root;
        for index in &indices[2..] {
            folder = folder
                .folders
                .get(*index)
                .ok_or_else(|| HostError::new(format!("No folder at {indices:?}")))?;
        }
        Ok(folder)
    }

    fn file_at(&self, handle: &NodeHandle) -> HostResult<&FileSpec> {
        let indices = parse_handle(handle, "file")?;
        let (file_index, folder) = indices
            .split_last()
            .ok_or_else(|| HostError::new(format!("Malformed file handle {handle}")))?;
        self.folder_at(folder)?
            .files
            .get(*file_index)
            .ok_or_else(|| HostError::new(format!("No file at {handle}")))
    }
}

/// Index path of a handle like `folder:0/1/2`
fn parse_handle(handle: &NodeHandle, kind: &str) -> HostResult<Vec<usize>> {
    let raw = handle
        .as_str()
        .strip_prefix(kind)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| HostError::new(format!("Not a {kind} handle: {handle}")))?;

    raw.split('/')
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| HostError::new(format!("Malformed {kind} handle: {handle}")))
        })
        .collect()
}

fn make_handle(kind: &str, path: &str) -> HostResult<NodeHandle> {
    NodeHandle::new(format!("{kind}:{path}")).map_err(HostError::new)
}

fn write_descriptor(path: &Path, descriptor: serde_json::Value) -> HostResult<()> {
    let bytes =
        serde_json::to_vec_pretty(&descriptor).map_err(|e| HostError::new(e.to_string()))?;
    fs::write(path, bytes)?;
    Ok(())
}

impl DesignSource for ManifestSource {
    fn hubs(&self) -> HostResult<Vec<Arc<HubRef>>> {
        self.manifest
            .hubs
            .iter()
            .enumerate()
            .map(|(index, hub)| {
                Ok(Arc::new(HubRef {
                    handle: make_handle("hub", &index.to_string())?,
                    name: hub.name.clone(),
                }))
            })
            .collect()
    }

    fn projects(&self, hub: &Arc<HubRef>) -> HostResult<Vec<Arc<ProjectRef>>> {
        let indices = parse_handle(&hub.handle, "hub")?;
        let spec = indices
            .first()
            .and_then(|index| self.manifest.hubs.get(*index))
            .ok_or_else(|| HostError::new(format!("No hub at {}", hub.handle)))?;

        if spec.fail_listing {
            return Err(HostError::new(format!(
                "Failed to list projects of hub {}",
                spec.name
            )));
        }

        spec.projects
            .iter()
            .enumerate()
            .map(|(index, project)| {
                Ok(Arc::new(ProjectRef {
                    handle: make_handle("project", &format!("{}/{index}", indices[0]))?,
                    name: project.name.clone(),
                    parent_hub: hub.clone(),
                }))
            })
            .collect()
    }

    fn root_folder(&self, project: &Arc<ProjectRef>) -> HostResult<Arc<FolderRef>> {
        let indices = parse_handle(&project.handle, "project")?;
        let spec = self.project_at(&indices)?;

        if spec.fail_listing {
            return Err(HostError::new(format!(
                "Failed to get root folder of project {}",
                spec.name
            )));
        }

        Ok(Arc::new(FolderRef {
            handle: make_handle("folder", &format!("{}/{}", indices[0], indices[1]))?,
            name: spec.root.name.clone(),
            parent_folder: None,
            parent_project: project.clone(),
        }))
    }

    fn sub_folders(&self, folder: &Arc<FolderRef>) -> HostResult<Vec<Arc<FolderRef>>> {
        let spec = self.folder_at(&parse_handle(&folder.handle, "folder")?)?;
        if spec.fail_listing {
            return Err(HostError::new(format!(
                "Failed to list folders of {}",
                spec.name
            )));
        }

        spec.folders
            .iter()
            .enumerate()
            .map(|(index, sub)| {
                Ok(Arc::new(FolderRef {
                    handle: NodeHandle::new(format!("{}/{index}", folder.handle))
                        .map_err(HostError::new)?,
                    name: sub.name.clone(),
                    parent_folder: Some(folder.clone()),
                    parent_project: folder.parent_project.clone(),
                }))
            })
            .collect()
    }

    fn files(&self, folder: &Arc<FolderRef>) -> HostResult<Vec<DataFileRef>> {
        let spec = self.folder_at(&parse_handle(&folder.handle, "folder")?)?;
        if spec.fail_listing {
            return Err(HostError::new(format!(
                "Failed to list files of {}",
                spec.name
            )));
        }

        let folder_path = folder.handle.as_str().trim_start_matches("folder:");
        spec.files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                Ok(DataFileRef {
                    handle: make_handle("file", &format!("{folder_path}/{index}"))?,
                    name: file.name.clone(),
                    file_extension: file.extension.clone(),
                    latest_version_extension: file.version_extension().to_string(),
                    latest_version_created: SourceTimestamp::from_unix_f64(file.created),
                    parent_folder: folder.clone(),
                })
            })
            .collect()
    }

    fn open(&self, file: &DataFileRef) -> HostResult<Option<Box<dyn Document + '_>>> {
        let spec = self.file_at(&file.handle)?;
        self.open_attempts.fetch_add(1, Ordering::SeqCst);

        match spec.open {
            OpenBehavior::Fail => Err(HostError::new(format!(
                "Failed to open document {}",
                spec.name
            ))),
            OpenBehavior::Missing => Ok(None),
            OpenBehavior::Ok => Ok(Some(Box::new(ManifestDocument {
                source: self,
                spec,
                design: spec.design(),
            }))),
        }
    }
}

struct ManifestDocument<'a> {
    source: &'a ManifestSource,
    spec: &'a FileSpec,
    design: DesignSpec,
}

impl Document for ManifestDocument<'_> {
    fn activate(&mut self) -> HostResult<()> {
        tracing::trace!(document = %self.spec.name, "Document activated");
        Ok(())
    }

    fn export_archive(&self, path: &Path) -> HostResult<()> {
        match self.spec.archive {
            WriteBehavior::Fail => Err(HostError::new(format!(
                "Archive export of {} failed",
                self.spec.name
            ))),
            WriteBehavior::Empty => Ok(()),
            WriteBehavior::Ok => write_descriptor(
                path,
                json!({
                    "kind": "archive",
                    "document": self.spec.name,
                    "created": self.spec.created,
                    "components": self.design.components.len(),
                }),
            ),
        }
    }

    fn root_component(&self) -> HostResult<Box<dyn Component + '_>> {
        let spec = self.design.component(&self.design.root).ok_or_else(|| {
            HostError::new(format!("Root component {} not found", self.design.root))
        })?;
        Ok(Box::new(ManifestComponent {
            design: &self.design,
            spec,
        }))
    }

    fn close(&mut self, _discard_changes: bool) -> HostResult<()> {
        self.source.closes.fetch_add(1, Ordering::SeqCst);
        if self.spec.close_fails {
            return Err(HostError::new(format!(
                "Failed to close document {}",
                self.spec.name
            )));
        }
        Ok(())
    }
}

struct ManifestComponent<'a> {
    design: &'a DesignSpec,
    spec: &'a ComponentSpec,
}

impl ManifestComponent<'_> {
    fn export(&self, format: ExportFormat, path: &Path) -> HostResult<()> {
        if self.spec.fail.contains(&format) {
            return Err(HostError::new(format!(
                "{format} export of {} failed",
                self.spec.name
            )));
        }
        write_descriptor(
            path,
            json!({
                "kind": format.as_str(),
                "component": self.spec.name,
                "bodies": self.spec.bodies.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            }),
        )
    }
}

impl Component for ManifestComponent<'_> {
    fn key(&self) -> String {
        self.spec.name.clone()
    }

    fn name(&self) -> String {
        self.spec.name.clone()
    }

    fn sketches(&self) -> Vec<Box<dyn Sketch + '_>> {
        self.spec
            .sketches
            .iter()
            .map(|sketch| Box::new(ManifestSketch { spec: sketch }) as Box<dyn Sketch + '_>)
            .collect()
    }

    fn bodies(&self) -> Vec<Box<dyn Body + '_>> {
        self.spec
            .bodies
            .iter()
            .map(|body| Box::new(ManifestBody { spec: body }) as Box<dyn Body + '_>)
            .collect()
    }

    fn occurrences(&self) -> Vec<Box<dyn Occurrence + '_>> {
        self.spec
            .occurrences
            .iter()
            .map(|target| {
                Box::new(ManifestOccurrence {
                    design: self.design,
                    target,
                }) as Box<dyn Occurrence + '_>
            })
            .collect()
    }

    fn export_step(&self, path: &Path) -> HostResult<()> {
        self.export(ExportFormat::Step, path)
    }

    fn export_mesh(&self, path: &Path) -> HostResult<()> {
        if self.spec.bodies.is_empty() && self.spec.occurrences.is_empty() {
            return Err(HostError::new(format!(
                "No bodies to export in {}",
                self.spec.name
            )));
        }
        self.export(ExportFormat::Stl, path)
    }

    fn export_iges(&self, path: &Path) -> HostResult<()> {
        self.export(ExportFormat::Iges, path)
    }
}

struct ManifestOccurrence<'a> {
    design: &'a DesignSpec,
    target: &'a str,
}

impl Occurrence for ManifestOccurrence<'_> {
    fn component(&self) -> HostResult<Box<dyn Component + '_>> {
        let spec = self
            .design
            .component(self.target)
            .ok_or_else(|| HostError::new(format!("Component {} not found", self.target)))?;
        Ok(Box::new(ManifestComponent {
            design: self.design,
            spec,
        }))
    }
}

struct ManifestSketch<'a> {
    spec: &'a SketchSpec,
}

impl Sketch for ManifestSketch<'_> {
    fn name(&self) -> String {
        self.spec.name.clone()
    }

    fn export_dxf(&self, path: &Path) -> HostResult<()> {
        if self.spec.fail {
            return Err(HostError::new(format!(
                "DXF export of sketch {} failed",
                self.spec.name
            )));
        }
        write_descriptor(path, json!({ "kind": "dxf", "sketch": self.spec.name }))
    }
}

struct ManifestBody<'a> {
    spec: &'a BodySpec,
}

impl Body for ManifestBody<'_> {
    fn name(&self) -> String {
        self.spec.name.clone()
    }

    fn export_mesh(&self, path: &Path) -> HostResult<()> {
        if self.spec.empty {
            return Err(HostError::new(format!("Body {} is empty", self.spec.name)));
        }
        write_descriptor(path, json!({ "kind": "stl", "body": self.spec.name }))
    }
}
