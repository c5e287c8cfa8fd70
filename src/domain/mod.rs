//! Domain models and types for DesignVault.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Source collaborator traits** ([`DesignSource`], [`Document`], [`Component`],
//!   [`Occurrence`], [`Sketch`], [`Body`]) that a host adapter implements
//! - **Hierarchy handles** ([`HubRef`], [`ProjectRef`], [`FolderRef`], [`DataFileRef`])
//!   with upward parent references
//! - **Value types** ([`SourceTimestamp`], [`NodeHandle`], [`ExportFormat`])
//! - **Error types** ([`VaultError`], [`HostError`], [`IssueKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible engine operations return [`Result<T, VaultError>`]:
//!
//! ```rust
//! use designvault::domain::{Result, VaultError};
//!
//! fn example() -> Result<()> {
//!     let config = designvault::config::load_config("designvault.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod format;
pub mod ids;
pub mod result;
pub mod source;

// Re-export commonly used types for convenience
pub use errors::{HostError, IssueKind, VaultError};
pub use format::ExportFormat;
pub use ids::{NodeHandle, SourceTimestamp};
pub use result::Result;
pub use source::{
    Body, Component, DataFileRef, DesignSource, Document, FolderRef, HostResult,
    HubRef, Occurrence, ProjectRef, Sketch,
};
