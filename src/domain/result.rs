//! Result type alias for DesignVault
//!
//! Engine operations return [`Result`]; `?` lifts filesystem and manifest
//! parse errors into [`VaultError`] through its `From` impls.

use super::errors::VaultError;

/// Result type alias for DesignVault operations
///
/// # Examples
///
/// ```
/// use designvault::domain::result::Result;
/// use designvault::domain::errors::VaultError;
///
/// fn root_component(name: &str) -> Result<&str> {
///     if name.is_empty() {
///         return Err(VaultError::Manifest("missing root component".to_string()));
///     }
///     Ok(name)
/// }
///
/// assert!(root_component("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, VaultError>;
