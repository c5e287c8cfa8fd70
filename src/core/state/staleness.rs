//! Staleness checks for exported artifacts
//!
//! An artifact is current when it exists and its modification time equals the
//! source's latest-version timestamp exactly. Only filesystem metadata is read.

use crate::domain::SourceTimestamp;
use filetime::FileTime;
use std::path::Path;

/// Returns true iff `artifact` exists and was stamped with `source_modified`
///
/// Any metadata error counts as stale.
///
/// # Examples
///
/// ```no_run
/// use designvault::core::state::staleness::is_up_to_date;
/// use designvault::domain::SourceTimestamp;
///
/// let current = is_up_to_date("out/Widget.f3d/Widget.f3d", SourceTimestamp::from_unix_seconds(100));
/// ```
pub fn is_up_to_date(artifact: impl AsRef<Path>, source_modified: SourceTimestamp) -> bool {
    let Ok(metadata) = std::fs::metadata(artifact.as_ref()) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    let modified = FileTime::from_last_modification_time(&metadata);
    modified.unix_seconds() == source_modified.unix_seconds() && modified.nanoseconds() == 0
}

/// Stored modification time of an artifact, if it exists
pub fn stored_timestamp(artifact: impl AsRef<Path>) -> Option<FileTime> {
    std::fs::metadata(artifact.as_ref())
        .ok()
        .map(|metadata| FileTime::from_last_modification_time(&metadata))
}
