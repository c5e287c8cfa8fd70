//! Source collaborator interfaces
//!
//! The host application owns the document-management hierarchy (hub, project,
//! folder, file) and the structural model of an opened document (components,
//! sketches, bodies, occurrences). The engine only reads it, through the traits
//! in this module. Hierarchy handles carry upward references to their parents so
//! destination paths can be rebuilt from any file.

use crate::domain::errors::HostError;
use crate::domain::ids::{NodeHandle, SourceTimestamp};
use std::path::Path;
use std::sync::Arc;

/// Result type for calls into the host
pub type HostResult<T> = std::result::Result<T, HostError>;

/// A hub: the top level of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubRef {
    pub handle: NodeHandle,
    pub name: String,
}

/// A project inside a hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub handle: NodeHandle,
    pub name: String,
    pub parent_hub: Arc<HubRef>,
}

/// A folder inside a project
///
/// `parent_folder` is `None` for the project's root folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    pub handle: NodeHandle,
    pub name: String,
    pub parent_folder: Option<Arc<FolderRef>>,
    pub parent_project: Arc<ProjectRef>,
}

impl FolderRef {
    /// Folder names from the project's root folder down to this one
    pub fn ancestry_names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        let mut current = self.parent_folder.as_deref();
        while let Some(folder) = current {
            names.push(folder.name.as_str());
            current = folder.parent_folder.as_deref();
        }
        names.reverse();
        names
    }
}

/// A document file, the exportable leaf of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileRef {
    pub handle: NodeHandle,
    pub name: String,
    /// Extension of the file entry itself (`f3d`, `f3z`, `pdf`, ...)
    pub file_extension: String,
    /// Extension the latest version is saved with
    pub latest_version_extension: String,
    /// Creation time of the latest version
    pub latest_version_created: SourceTimestamp,
    pub parent_folder: Arc<FolderRef>,
}

impl DataFileRef {
    /// Project this file belongs to
    pub fn project(&self) -> &ProjectRef {
        &self.parent_folder.parent_project
    }

    /// Hub this file belongs to
    pub fn hub(&self) -> &HubRef {
        &self.parent_folder.parent_project.parent_hub
    }
}

/// Enumerable document hierarchy plus document access
pub trait DesignSource {
    /// All hubs, in enumeration order
    fn hubs(&self) -> HostResult<Vec<Arc<HubRef>>>;

    /// Projects within a hub, in enumeration order
    fn projects(&self, hub: &Arc<HubRef>) -> HostResult<Vec<Arc<ProjectRef>>>;

    /// The project's root folder
    fn root_folder(&self, project: &Arc<ProjectRef>) -> HostResult<Arc<FolderRef>>;

    /// Direct sub-folders of a folder
    fn sub_folders(&self, folder: &Arc<FolderRef>) -> HostResult<Vec<Arc<FolderRef>>>;

    /// Files directly inside a folder
    fn files(&self, folder: &Arc<FolderRef>) -> HostResult<Vec<DataFileRef>>;

    /// Opens a document; `Ok(None)` means the host returned no handle
    fn open(&self, file: &DataFileRef) -> HostResult<Option<Box<dyn Document + '_>>>;
}

/// An opened document
///
/// At most one document is open at a time. Callers must close it on every
/// exit path.
pub trait Document {
    /// Makes this the host's active document
    fn activate(&mut self) -> HostResult<()>;

    /// Writes the full-document archive to `path`
    fn export_archive(&self, path: &Path) -> HostResult<()>;

    /// The document's root structural node
    fn root_component(&self) -> HostResult<Box<dyn Component + '_>>;

    /// Closes the document, optionally discarding unsaved changes
    fn close(&mut self, discard_changes: bool) -> HostResult<()>;
}

/// A structural node (part or sub-assembly) of an opened document
pub trait Component {
    /// Identity within the document; equal keys mean the same component
    fn key(&self) -> String;

    /// Display name
    fn name(&self) -> String;

    /// Sketches owned directly by this component
    fn sketches(&self) -> Vec<Box<dyn Sketch + '_>>;

    /// Solid and mesh bodies owned directly by this component
    fn bodies(&self) -> Vec<Box<dyn Body + '_>>;

    /// Child placements
    fn occurrences(&self) -> Vec<Box<dyn Occurrence + '_>>;

    fn export_step(&self, path: &Path) -> HostResult<()>;

    fn export_mesh(&self, path: &Path) -> HostResult<()>;

    fn export_iges(&self, path: &Path) -> HostResult<()>;
}

/// Placement of a component under a parent component
pub trait Occurrence {
    /// Resolves the referenced component
    fn component(&self) -> HostResult<Box<dyn Component + '_>>;
}

/// A 2D sketch
pub trait Sketch {
    fn name(&self) -> String;

    fn export_dxf(&self, path: &Path) -> HostResult<()>;
}

/// A solid or mesh body
pub trait Body {
    fn name(&self) -> String;

    fn export_mesh(&self, path: &Path) -> HostResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(name: &str, parent: Option<Arc<FolderRef>>, project: Arc<ProjectRef>) -> Arc<FolderRef> {
        Arc::new(FolderRef {
            handle: NodeHandle::new(format!("folder:{name}")).unwrap(),
            name: name.to_string(),
            parent_folder: parent,
            parent_project: project,
        })
    }

    #[test]
    fn test_folder_ancestry_is_root_first() {
        let hub = Arc::new(HubRef {
            handle: NodeHandle::new("hub").unwrap(),
            name: "A".to_string(),
        });
        let project = Arc::new(ProjectRef {
            handle: NodeHandle::new("project").unwrap(),
            name: "P".to_string(),
            parent_hub: hub,
        });
        let root = folder("Root", None, project.clone());
        let mid = folder("Parts", Some(root), project.clone());
        let leaf = folder("Fasteners", Some(mid), project);

        assert_eq!(leaf.ancestry_names(), vec!["Root", "Parts", "Fasteners"]);
    }

    #[test]
    fn test_file_reaches_hub_through_parents() {
        let hub = Arc::new(HubRef {
            handle: NodeHandle::new("hub").unwrap(),
            name: "A".to_string(),
        });
        let project = Arc::new(ProjectRef {
            handle: NodeHandle::new("project").unwrap(),
            name: "P".to_string(),
            parent_hub: hub,
        });
        let root = folder("Root", None, project);
        let file = DataFileRef {
            handle: NodeHandle::new("file").unwrap(),
            name: "Widget".to_string(),
            file_extension: "f3d".to_string(),
            latest_version_extension: "f3d".to_string(),
            latest_version_created: SourceTimestamp::from_unix_seconds(100),
            parent_folder: root,
        };

        assert_eq!(file.project().name, "P");
        assert_eq!(file.hub().name, "A");
    }
}
