//! Manifest file models
//!
//! A manifest describes a design vault as JSON: hubs, projects, folders and
//! files, and for each file the component tree of its document. Optional
//! fields inject host failures so every engine path can be exercised without
//! the CAD application.
//!
//! ```json
//! {
//!   "hubs": [{
//!     "name": "A",
//!     "projects": [{
//!       "name": "P",
//!       "root": {
//!         "name": "Root",
//!         "files": [{
//!           "name": "Widget",
//!           "created": 1700000000,
//!           "design": {
//!             "root": "Widget",
//!             "components": [{ "name": "Widget", "sketches": [{ "name": "S1" }] }]
//!           }
//!         }]
//!       }
//!     }]
//!   }]
//! }
//! ```

use crate::domain::ExportFormat;
use serde::{Deserialize, Serialize};

/// Root of a manifest file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub hubs: Vec<HubSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSpec {
    pub name: String,

    #[serde(default)]
    pub projects: Vec<ProjectSpec>,

    /// Listing this hub's projects fails
    #[serde(default)]
    pub fail_listing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub name: String,

    pub root: FolderSpec,

    /// Resolving the root folder fails
    #[serde(default)]
    pub fail_listing: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderSpec {
    pub name: String,

    #[serde(default)]
    pub folders: Vec<FolderSpec>,

    #[serde(default)]
    pub files: Vec<FileSpec>,

    /// Listing this folder's files and subfolders fails
    #[serde(default)]
    pub fail_listing: bool,
}

/// How the host answers a request to open a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenBehavior {
    #[default]
    Ok,
    /// The open call raises
    Fail,
    /// The open call returns no document
    Missing,
}

/// How an export call behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteBehavior {
    #[default]
    Ok,
    /// The export call raises
    Fail,
    /// The export call returns without writing anything
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpec {
    pub name: String,

    #[serde(default = "default_extension")]
    pub extension: String,

    /// Extension of the latest version; defaults to `extension`
    #[serde(default)]
    pub version_extension: Option<String>,

    /// Creation time of the latest version, in Unix seconds
    pub created: f64,

    #[serde(default)]
    pub open: OpenBehavior,

    #[serde(default)]
    pub archive: WriteBehavior,

    #[serde(default)]
    pub close_fails: bool,

    /// Component tree; a single empty component named after the file if absent
    #[serde(default)]
    pub design: Option<DesignSpec>,
}

impl FileSpec {
    pub fn version_extension(&self) -> &str {
        self.version_extension.as_deref().unwrap_or(&self.extension)
    }

    /// The file's design, or the default single-component one
    pub fn design(&self) -> DesignSpec {
        self.design.clone().unwrap_or_else(|| DesignSpec {
            root: self.name.clone(),
            components: vec![ComponentSpec {
                name: self.name.clone(),
                ..ComponentSpec::default()
            }],
        })
    }
}

/// Component tree of a document
///
/// Components are addressed by name; occurrences reference them by name, so a
/// component can be instanced from several parents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSpec {
    /// Name of the root component
    pub root: String,

    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

impl DesignSpec {
    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,

    #[serde(default)]
    pub sketches: Vec<SketchSpec>,

    #[serde(default)]
    pub bodies: Vec<BodySpec>,

    /// Names of the components instanced as children
    #[serde(default)]
    pub occurrences: Vec<String>,

    /// Formats whose export raises for this component
    #[serde(default)]
    pub fail: Vec<ExportFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchSpec {
    pub name: String,

    #[serde(default)]
    pub fail: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,

    /// No geometry: mesh export raises
    #[serde(default)]
    pub empty: bool,
}

fn default_extension() -> String {
    "f3d".to_string()
}
