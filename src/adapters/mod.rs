//! Design source integrations for Design Vault.
//!
//! - [`manifest`] - Hierarchy and documents described by a JSON manifest
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern**: the engine only talks to the
//! [`DesignSource`](crate::domain::DesignSource) traits, so a host
//! application binding and the manifest source are interchangeable.
//!
//! ```rust,no_run
//! use designvault::adapters::manifest::ManifestSource;
//! use designvault::domain::DesignSource;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ManifestSource::from_file("vault.json")?;
//! for hub in source.hubs()? {
//!     println!("{}", hub.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod manifest;
