//! Domain identifier and timestamp newtypes
//!
//! Handles into the host hierarchy are opaque strings owned by the host; the
//! engine only compares and logs them.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque handle to a node in the host hierarchy
///
/// # Examples
///
/// ```
/// use designvault::domain::ids::NodeHandle;
/// use std::str::FromStr;
///
/// let handle = NodeHandle::from_str("urn:hub:42").unwrap();
/// assert_eq!(handle.as_str(), "urn:hub:42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(String);

impl NodeHandle {
    /// Creates a new handle, rejecting blank strings
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Node handle cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the handle as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NodeHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Creation time of a file's latest version, in whole seconds since the Unix epoch
///
/// Exported artifacts are stamped with exactly this value so the next run can
/// compare modification times for equality. Sub-second precision is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTimestamp(i64);

impl SourceTimestamp {
    /// Creates a timestamp from Unix seconds
    pub fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Truncates a fractional Unix timestamp to whole seconds
    pub fn from_unix_f64(seconds: f64) -> Self {
        Self(seconds.trunc() as i64)
    }

    /// Seconds since the Unix epoch
    pub fn unix_seconds(&self) -> i64 {
        self.0
    }

    /// As a UTC datetime, if representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.0, 0).single()
    }
}

impl From<DateTime<Utc>> for SourceTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.timestamp())
    }
}

impl fmt::Display for SourceTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{}s", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_handle_rejects_blank() {
        assert!(NodeHandle::new("   ").is_err());
        assert!(NodeHandle::new("").is_err());
        assert_eq!(NodeHandle::new("hub-1").unwrap().as_str(), "hub-1");
    }

    #[test]
    fn test_timestamp_truncates_fraction() {
        assert_eq!(SourceTimestamp::from_unix_f64(100.9).unix_seconds(), 100);
    }

    #[test]
    fn test_timestamp_from_datetime() {
        let dt = Utc.timestamp_opt(1_700_000_000, 500).single().unwrap();
        assert_eq!(SourceTimestamp::from(dt).unix_seconds(), 1_700_000_000);
    }

    #[test]
    fn test_timestamp_display() {
        let ts = SourceTimestamp::from_unix_seconds(0);
        assert_eq!(ts.to_string(), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_timestamp_serializes_as_integer() {
        let ts = SourceTimestamp::from_unix_seconds(100);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "100");
    }
}
