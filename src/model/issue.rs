//! Issue data structure
//!
//! Represents a single tracked item scoped to a project. The JSON shape
//! matches the wire contract: `_id`, snake_case fields, RFC3339 timestamps.

use super::IssueId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked issue, partitioned by project name
///
/// Every field is always serialized, including empty optional strings —
/// clients rely on the full record coming back from create and list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier, globally unique across all projects
    #[serde(rename = "_id")]
    pub id: IssueId,

    /// Project partition key, immutable after creation
    pub project: String,

    /// Issue title
    pub issue_title: String,

    /// Issue description
    pub issue_text: String,

    /// Creator username
    pub created_by: String,

    /// Assignee, empty string when unassigned
    pub assigned_to: String,

    /// Free-form status, empty string when unset
    pub status_text: String,

    /// Creation timestamp, never changes
    pub created_on: DateTime<Utc>,

    /// Last mutation timestamp, refreshed on every update
    pub updated_on: DateTime<Utc>,

    /// Open/closed state
    pub open: bool,
}

impl Issue {
    /// Create a new open issue from a draft, stamping both timestamps to now
    pub fn new(id: IssueId, project: impl Into<String>, draft: IssueDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            project: project.into(),
            issue_title: draft.issue_title.unwrap_or_default(),
            issue_text: draft.issue_text.unwrap_or_default(),
            created_by: draft.created_by.unwrap_or_default(),
            assigned_to: draft.assigned_to.unwrap_or_default(),
            status_text: draft.status_text.unwrap_or_default(),
            created_on: now,
            updated_on: now,
            open: true,
        }
    }

    /// Refresh the update timestamp to now
    pub fn touch(&mut self) {
        self.updated_on = Utc::now();
    }
}

/// Incoming create-request body
///
/// All fields optional at the deserialization layer; required-field presence
/// is validated by the store so a missing field reports the contract error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueDraft {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

impl IssueDraft {
    /// True when every required field is present and non-empty
    pub fn has_required_fields(&self) -> bool {
        let filled = |f: &Option<String>| f.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.issue_title) && filled(&self.issue_text) && filled(&self.created_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, text: &str, by: &str) -> IssueDraft {
        IssueDraft {
            issue_title: Some(title.to_string()),
            issue_text: Some(text.to_string()),
            created_by: Some(by.to_string()),
            ..IssueDraft::default()
        }
    }

    #[test]
    fn test_issue_creation_defaults() {
        let issue = Issue::new(IssueId::new("i-1"), "apitest", draft("Title", "Text", "alice"));

        assert_eq!(issue.id.as_str(), "i-1");
        assert_eq!(issue.project, "apitest");
        assert_eq!(issue.issue_title, "Title");
        assert_eq!(issue.assigned_to, "");
        assert_eq!(issue.status_text, "");
        assert!(issue.open);
        assert_eq!(issue.created_on, issue.updated_on);
    }

    #[test]
    fn test_touch_refreshes_updated_on() {
        let mut issue = Issue::new(IssueId::new("i-1"), "apitest", draft("T", "X", "alice"));
        let created = issue.created_on;
        issue.touch();
        assert!(issue.updated_on >= created);
        assert_eq!(issue.created_on, created);
    }

    #[test]
    fn test_required_field_check() {
        assert!(draft("T", "X", "alice").has_required_fields());

        let mut d = draft("T", "X", "alice");
        d.issue_text = Some(String::new());
        assert!(!d.has_required_fields());

        let mut d = draft("T", "X", "alice");
        d.created_by = None;
        assert!(!d.has_required_fields());
    }

    #[test]
    fn test_issue_serialization_shape() {
        let issue = Issue::new(IssueId::new("i-1"), "apitest", draft("Title", "Text", "alice"));
        let json = serde_json::to_value(&issue).unwrap();

        assert_eq!(json["_id"], "i-1");
        assert_eq!(json["project"], "apitest");
        assert_eq!(json["open"], true);
        // Optional strings serialize as empty strings, not null
        assert_eq!(json["assigned_to"], "");
        assert!(json["created_on"].is_string());
    }
}
