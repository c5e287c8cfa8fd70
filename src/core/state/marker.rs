//! Failure markers: crash-safe guards around a single artifact write
//!
//! Before an artifact is written a zero-byte `<artifact>.failed` marker is
//! created. The marker is removed, and the artifact stamped with the source
//! timestamp, only when the write completes without error. A marker that is
//! already present when a run reaches the artifact means an earlier run died or
//! failed mid-write; the artifact is then left alone until an operator deletes
//! the marker.
//!
//! # Example
//!
//! ```no_run
//! use designvault::core::state::marker::{guarded_write, GuardOutcome};
//! use designvault::domain::SourceTimestamp;
//! use std::path::Path;
//!
//! # fn example() -> designvault::domain::Result<()> {
//! let outcome = guarded_write(
//!     Path::new("out/Widget.stp"),
//!     SourceTimestamp::from_unix_seconds(100),
//!     |path| {
//!         std::fs::write(path, b"ISO-10303-21;")?;
//!         Ok(())
//!     },
//! )?;
//! assert_eq!(outcome, GuardOutcome::Written);
//! # Ok(())
//! # }
//! ```

use crate::domain::{Result, SourceTimestamp, VaultError};
use filetime::FileTime;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix appended to an artifact path to form its marker path
pub const MARKER_SUFFIX: &str = ".failed";

/// Marker path for an artifact: the full artifact file name plus `.failed`
pub fn marker_path(artifact: &Path) -> PathBuf {
    let mut name = OsString::from(artifact.as_os_str());
    name.push(MARKER_SUFFIX);
    PathBuf::from(name)
}

/// State found when entering a marker scope
#[derive(Debug)]
pub enum MarkerScope {
    /// A marker was already present; nothing was touched
    PreviousCrash { marker: PathBuf },
    /// A fresh marker was created; the write may proceed
    Armed(ArtifactGuard),
}

/// How an armed scope ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Marker removed and artifact stamped
    Stamped,
    /// The write produced no file; the marker stays
    NothingWritten,
}

/// Guard over one in-progress artifact write
///
/// Dropping the guard without calling [`ArtifactGuard::complete`] leaves the
/// marker in place, which is the failure path.
#[derive(Debug)]
pub struct ArtifactGuard {
    artifact: PathBuf,
    marker: PathBuf,
    source_modified: SourceTimestamp,
    resolved: bool,
}

impl ArtifactGuard {
    /// Enters the scope for `artifact`
    ///
    /// Creates parent directories and the marker unless a marker already exists.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Marker`] if the marker or its directory cannot be
    /// created.
    pub fn enter(artifact: &Path, source_modified: SourceTimestamp) -> Result<MarkerScope> {
        let marker = marker_path(artifact);

        if marker.exists() {
            tracing::info!(
                marker = %marker.display(),
                "Seems like a previous export failed. Fix the problem and delete the marker file"
            );
            return Ok(MarkerScope::PreviousCrash { marker });
        }

        if let Some(parent) = marker.parent() {
            fs::create_dir_all(parent).map_err(|source| VaultError::Marker {
                path: marker.clone(),
                source,
            })?;
        }
        fs::File::create(&marker).map_err(|source| VaultError::Marker {
            path: marker.clone(),
            source,
        })?;

        Ok(MarkerScope::Armed(Self {
            artifact: artifact.to_path_buf(),
            marker,
            source_modified,
            resolved: false,
        }))
    }

    /// Artifact this guard protects
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Marker file for the artifact
    pub fn marker(&self) -> &Path {
        &self.marker
    }

    /// Resolves the scope after a write that returned without error
    ///
    /// If the artifact exists the marker is deleted first, then the artifact's
    /// modification time is set to the source timestamp (access time kept).
    /// If the artifact does not exist the marker is kept.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Marker`] if the marker cannot be removed or the
    /// artifact cannot be stamped.
    pub fn complete(mut self) -> Result<Completion> {
        self.resolved = true;

        let metadata = match fs::metadata(&self.artifact) {
            Ok(metadata) => metadata,
            Err(_) => {
                tracing::debug!(
                    artifact = %self.artifact.display(),
                    "Export produced no file, keeping marker"
                );
                return Ok(Completion::NothingWritten);
            }
        };

        fs::remove_file(&self.marker).map_err(|source| VaultError::Marker {
            path: self.marker.clone(),
            source,
        })?;

        let accessed = FileTime::from_last_access_time(&metadata);
        let modified = FileTime::from_unix_time(self.source_modified.unix_seconds(), 0);
        filetime::set_file_times(&self.artifact, accessed, modified).map_err(|source| {
            VaultError::Marker {
                path: self.artifact.clone(),
                source,
            }
        })?;

        Ok(Completion::Stamped)
    }

    /// Ends the scope as failed, leaving the marker in place
    pub fn abandon(mut self) {
        self.resolved = true;
        tracing::debug!(marker = %self.marker.display(), "Leaving failure marker in place");
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if !self.resolved {
            tracing::debug!(
                marker = %self.marker.display(),
                "Artifact guard dropped before completion, marker retained"
            );
        }
    }
}

/// Result of a guarded write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Skipped because an earlier run left a marker behind
    PreviousCrash(PathBuf),
    /// Written, marker cleared, artifact stamped
    Written,
    /// The writer returned without error but produced no file
    NothingWritten,
}

/// Runs `write` inside a marker scope for `artifact`
///
/// `write` receives the artifact path. If it fails, the error is returned and
/// the marker stays behind.
pub fn guarded_write<F>(
    artifact: &Path,
    source_modified: SourceTimestamp,
    write: F,
) -> Result<GuardOutcome>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let guard = match ArtifactGuard::enter(artifact, source_modified)? {
        MarkerScope::PreviousCrash { marker } => return Ok(GuardOutcome::PreviousCrash(marker)),
        MarkerScope::Armed(guard) => guard,
    };

    if let Err(e) = write(guard.artifact()) {
        guard.abandon();
        return Err(e);
    }

    match guard.complete()? {
        Completion::Stamped => Ok(GuardOutcome::Written),
        Completion::NothingWritten => Ok(GuardOutcome::NothingWritten),
    }
}

/// Finds every failure marker below `root`, sorted by path
pub fn find_markers(root: &Path) -> Result<Vec<PathBuf>> {
    let mut markers = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| VaultError::Io(e.to_string()))?;
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_string_lossy()
                .ends_with(MARKER_SUFFIX)
        {
            markers.push(entry.into_path());
        }
    }
    markers.sort();
    Ok(markers)
}

/// Artifact a marker guards
pub fn artifact_for_marker(marker: &Path) -> Option<PathBuf> {
    let name = marker.to_str()?;
    name.strip_suffix(MARKER_SUFFIX).map(PathBuf::from)
}

/// Deletes the given markers, returning how many were removed
pub fn clear_markers(markers: &[PathBuf]) -> Result<usize> {
    let mut removed = 0;
    for marker in markers {
        fs::remove_file(marker).map_err(|source| VaultError::Marker {
            path: marker.clone(),
            source,
        })?;
        tracing::info!(marker = %marker.display(), "Removed failure marker");
        removed += 1;
    }
    Ok(removed)
}
