//! Domain error types
//!
//! This module defines the error hierarchy for DesignVault. Errors raised by the
//! host application are carried as [`HostError`] so no host-specific type leaks
//! into the traversal engine.

use crate::domain::format::ExportFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Main DesignVault error type
///
/// Every fallible engine operation returns this type. [`VaultError::issue_kind`]
/// maps a variant onto the issue taxonomy recorded in a run summary.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The host failed to open a document, or returned no handle
    #[error("Opening \"{file}\" failed: {source}")]
    Open {
        file: String,
        #[source]
        source: HostError,
    },

    /// The destination folder for a file could not be created
    #[error("Couldn't make root folder \"{}\": {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single format export call failed
    #[error("{format} export to \"{}\" failed: {source}", path.display())]
    FormatExport {
        format: ExportFormat,
        path: PathBuf,
        #[source]
        source: HostError,
    },

    /// Closing a document after export failed
    #[error("Failed to close \"{file}\": {source}")]
    Close {
        file: String,
        #[source]
        source: HostError,
    },

    /// An occurrence could not be resolved to its component
    #[error("Failed to get component for occurrence in \"{parent}\": {source}")]
    ComponentResolution {
        parent: String,
        #[source]
        source: HostError,
    },

    /// The occurrence graph loops back onto a component already being exported
    #[error("Component \"{component}\" references itself through its occurrences (depth {depth})")]
    CycleDetected { component: String, depth: usize },

    /// Creating, removing or stamping a failure marker failed
    #[error("Failure marker \"{}\": {source}", path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Enumerating hubs, projects or folders failed
    #[error("Enumeration error: {0}")]
    Enumeration(#[from] HostError),

    /// The source manifest is malformed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// A fatal error that stopped the whole run
    #[error("Export aborted while writing \"{last_location}\": {source}")]
    Aborted {
        last_location: String,
        #[source]
        source: Box<VaultError>,
    },
}

impl VaultError {
    /// Issue category this error is recorded under
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            VaultError::Open { .. } => IssueKind::Open,
            VaultError::DirectoryCreation { .. } => IssueKind::DirectoryCreation,
            VaultError::FormatExport { format, .. } => IssueKind::FormatExport(*format),
            VaultError::Close { .. } => IssueKind::Close,
            VaultError::ComponentResolution { .. } => IssueKind::ComponentResolution,
            VaultError::CycleDetected { .. } => IssueKind::CycleDetected,
            VaultError::Marker { .. } => IssueKind::Marker,
            VaultError::Aborted { source, .. } => source.issue_kind(),
            _ => IssueKind::Other,
        }
    }
}

/// Opaque error reported by the host application
///
/// The host's own error types never cross this boundary; only the message does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    /// Creates a new host error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The host's error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for HostError {
    fn from(err: std::io::Error) -> Self {
        HostError::new(err.to_string())
    }
}

/// Category of a recorded export issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Document could not be opened
    Open,
    /// Destination directory could not be created
    DirectoryCreation,
    /// A format export call failed
    FormatExport(ExportFormat),
    /// Document could not be closed
    Close,
    /// Occurrence did not resolve to a component
    ComponentResolution,
    /// Cyclic or overly deep occurrence graph
    CycleDetected,
    /// Marker file could not be managed
    Marker,
    /// Anything else
    Other,
}

// Conversion from std::io::Error
impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::Configuration(format!("TOML parse error: {err}"))
    }
}
