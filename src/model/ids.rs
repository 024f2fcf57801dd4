//! Type-safe ID wrapper for issues

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for issue IDs
///
/// Prevents mixing up issue IDs with plain strings at compile time.
/// Format: epoch-millis hex plus a monotonic sequence suffix
/// (e.g., "1985f2c3a7e0005").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(String);

impl IssueId {
    /// Create a new IssueId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for IssueId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
