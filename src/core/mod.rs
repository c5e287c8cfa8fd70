//! Core export logic for Design Vault.
//!
//! # Modules
//!
//! - [`export`] - Traversal, dispatch, run summary and progress
//! - [`naming`] - Filesystem-safe names for hubs, projects, folders and parts
//! - [`state`] - Staleness checks and failure markers for incremental exports
//!
//! # Export Workflow
//!
//! 1. **Enumerate**: Walk hubs, projects and folders of the design source
//! 2. **Check**: Compare each archive's mtime with the source version timestamp
//! 3. **Export**: Open stale documents and write the archive plus per-component formats
//! 4. **Stamp**: Set each written artifact's mtime to the source timestamp
//! 5. **Report**: Summarize issues and markers left for the operator
//!
//! # Example
//!
//! ```rust,no_run
//! use designvault::adapters::manifest::ManifestSource;
//! use designvault::core::export::{ExportCoordinator, ExportOptions, TracingProgress};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ManifestSource::from_file("vault.json")?;
//! let (_cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ExportCoordinator::new(&source, ExportOptions::default());
//! let summary = coordinator.run(Path::new("./export"), cancel_rx, &mut TracingProgress)?;
//!
//! println!("{}", summary.outcome().message());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod naming;
pub mod state;
