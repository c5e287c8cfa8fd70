// Design Vault - Incremental bulk export of a CAD design vault
// Copyright (c) 2025 Design Vault Contributors
// Licensed under the MIT License

//! # Design Vault - incremental bulk export of a CAD design vault
//!
//! Design Vault walks a hierarchical design vault (hubs, projects, folders,
//! design files) and mirrors it onto the local filesystem: every design's
//! full-document archive plus, per component, STEP, STL and IGES files and a
//! DXF per sketch.
//!
//! ## Overview
//!
//! - **Incremental**: an artifact whose mtime equals the design version's
//!   timestamp is current and never rewritten, so re-runs only touch what changed
//! - **Crash-safe**: every write is bracketed by a `.failed` marker; an artifact
//!   whose marker survives is skipped until an operator deletes it
//! - **Resilient**: per-file and per-format failures are counted and the run
//!   continues; only enumeration failures abort
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Traversal, export dispatch, staleness and marker state
//! - [`adapters`] - Design sources (JSON manifest)
//! - [`domain`] - Errors, identifiers, formats and the source traits
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use designvault::adapters::manifest::ManifestSource;
//! use designvault::config::load_config;
//! use designvault::core::export::{ExportCoordinator, ExportOptions, TracingProgress};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("designvault.toml")?;
//!     let source = ManifestSource::from_file("vault.json")?;
//!     let options = ExportOptions::from_config(&config.export, false)?;
//!
//!     let (_cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::new(&source, options);
//!     let summary = coordinator.run(&config.export.output_root, cancel_rx, &mut TracingProgress)?;
//!
//!     println!("{}", summary.outcome().message());
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Markers
//!
//! ```rust,no_run
//! use designvault::core::state::{guarded_write, GuardOutcome};
//! use designvault::domain::SourceTimestamp;
//! use std::path::Path;
//!
//! # fn example() -> designvault::domain::Result<()> {
//! let outcome = guarded_write(
//!     Path::new("export/Widget.stp"),
//!     SourceTimestamp::from_unix_seconds(1_700_000_000),
//!     |path| Ok(std::fs::write(path, b"ISO-10303-21;")?),
//! )?;
//! assert_eq!(outcome, GuardOutcome::Written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::VaultError`]:
//!
//! ```rust,no_run
//! use designvault::domain::VaultError;
//!
//! fn example() -> Result<(), VaultError> {
//!     let config = designvault::config::load_config("designvault.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Design Vault uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export!");
//! warn!(marker = "export/Widget.stp.failed", "Previous export failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
