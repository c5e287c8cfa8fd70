//! JSON manifest design source
//!
//! Stands in for the CAD host's data panel: the hierarchy and each document's
//! component tree come from a manifest file, and exports write JSON
//! descriptors. Used by the CLI and by the integration tests.

pub mod models;
pub mod source;

pub use models::Manifest;
pub use source::ManifestSource;
