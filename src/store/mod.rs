//! In-memory issue store
//!
//! A single owned collection of issue records, partitioned by project name.
//! The store lives for the lifetime of the process: it starts empty and is
//! discarded on exit. It performs no locking itself — the HTTP layer
//! serializes access through a mutex so each operation runs to completion
//! against the collection before the next begins.
//!
//! Validation failures are typed as [`StoreError`]; their `Display` strings
//! are exactly the wire-level error messages.

use crate::model::{Issue, IssueDraft, IssueId};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Expected validation failures on store operations
///
/// These are part of the API contract, not internal faults: the HTTP layer
/// reports them with a transport-success status and an `error` payload field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A create request omitted (or sent empty) a required field
    #[error("required field(s) missing")]
    RequiredFieldsMissing,

    /// An update or delete request carried no `_id`
    #[error("missing _id")]
    MissingId,

    /// An update request carried an `_id` and nothing else
    #[error("no update field(s) sent")]
    NoUpdateFields(IssueId),

    /// No issue matches the given `_id` within the project
    #[error("could not update")]
    CouldNotUpdate(IssueId),

    /// No issue matches the given `_id` within the project
    #[error("could not delete")]
    CouldNotDelete(IssueId),
}

impl StoreError {
    /// The `_id` echoed back with the failure, where the contract requires it
    pub fn issue_id(&self) -> Option<&IssueId> {
        match self {
            Self::NoUpdateFields(id) | Self::CouldNotUpdate(id) | Self::CouldNotDelete(id) => {
                Some(id)
            }
            Self::RequiredFieldsMissing | Self::MissingId => None,
        }
    }
}

/// In-memory collection of issues, in insertion order
///
/// Identifiers are minted from the process-start timestamp plus a monotonic
/// sequence, so they are unique across every project for the life of the
/// store and are never reused after a delete.
#[derive(Debug)]
pub struct IssueStore {
    issues: Vec<Issue>,
    epoch_ms: u64,
    next_seq: u64,
}

impl IssueStore {
    /// Create an empty store
    pub fn new() -> Self {
        let epoch_ms = chrono::Utc::now().timestamp_millis().unsigned_abs();
        Self {
            issues: Vec::new(),
            epoch_ms,
            next_seq: 0,
        }
    }

    /// Mint a fresh globally-unique identifier
    fn next_id(&mut self) -> IssueId {
        self.next_seq += 1;
        IssueId::new(format!("{:x}{:04x}", self.epoch_ms, self.next_seq))
    }

    /// Number of issues across all projects
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True when the store holds no issues
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Create a new issue in the given project
    ///
    /// `issue_title`, `issue_text`, and `created_by` must be present and
    /// non-empty; otherwise nothing is stored. On success the full record is
    /// returned with a fresh id, both timestamps stamped to now, `open` true,
    /// and optional fields defaulted to the empty string.
    pub fn create(&mut self, project: &str, draft: IssueDraft) -> Result<Issue, StoreError> {
        if !draft.has_required_fields() {
            return Err(StoreError::RequiredFieldsMissing);
        }

        let issue = Issue::new(self.next_id(), project, draft);
        tracing::debug!(project = project, id = %issue.id, "created issue");
        self.issues.push(issue.clone());
        Ok(issue)
    }

    /// List issues in a project, narrowed by equality filters
    ///
    /// Every supplied filter key must match for a record to be included. The
    /// `open` key is coerced to a boolean — true only for the literal string
    /// `"true"`, anything else compares as false. Other known fields use
    /// strict string equality; timestamps and unknown keys never match a
    /// string filter. Returns records in insertion order; an empty result is
    /// not an error.
    pub fn list(&self, project: &str, filters: &HashMap<String, String>) -> Vec<Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.project == project)
            .filter(|issue| filters.iter().all(|(k, v)| Self::matches(issue, k, v)))
            .cloned()
            .collect()
    }

    fn matches(issue: &Issue, key: &str, value: &str) -> bool {
        match key {
            "open" => issue.open == (value == "true"),
            "_id" => issue.id.as_str() == value,
            "project" => issue.project == value,
            "issue_title" => issue.issue_title == value,
            "issue_text" => issue.issue_text == value,
            "created_by" => issue.created_by == value,
            "assigned_to" => issue.assigned_to == value,
            "status_text" => issue.status_text == value,
            // Timestamps and unknown keys: a string never equals these
            _ => false,
        }
    }

    /// Apply a partial update to the issue matching `id` within `project`
    ///
    /// Checks, in contract order: missing id, no update fields sent, no
    /// matching record. On success every supplied known field overwrites the
    /// stored one and `updated_on` is refreshed; fields not supplied are left
    /// untouched. A supplied `open` is coerced with the literal-"true" rule.
    /// `project` and `created_on` are immutable — supplied values count as
    /// update fields but never overwrite.
    pub fn update(
        &mut self,
        project: &str,
        id: Option<String>,
        fields: &Map<String, Value>,
    ) -> Result<IssueId, StoreError> {
        let id = match id.filter(|s| !s.is_empty()) {
            Some(id) => IssueId::new(id),
            None => return Err(StoreError::MissingId),
        };

        if fields.is_empty() {
            return Err(StoreError::NoUpdateFields(id));
        }

        let issue = match self.find_mut(project, &id) {
            Some(issue) => issue,
            None => return Err(StoreError::CouldNotUpdate(id)),
        };

        for (key, value) in fields {
            match key.as_str() {
                "issue_title" => issue.issue_title = value_string(value),
                "issue_text" => issue.issue_text = value_string(value),
                "created_by" => issue.created_by = value_string(value),
                "assigned_to" => issue.assigned_to = value_string(value),
                "status_text" => issue.status_text = value_string(value),
                "open" => issue.open = coerce_open(value),
                // Immutable and store-managed fields are ignored
                _ => {}
            }
        }
        issue.touch();

        tracing::debug!(project = project, id = %id, "updated issue");
        Ok(id)
    }

    /// Remove the issue matching `id` within `project`
    pub fn delete(&mut self, project: &str, id: Option<String>) -> Result<IssueId, StoreError> {
        let id = match id.filter(|s| !s.is_empty()) {
            Some(id) => IssueId::new(id),
            None => return Err(StoreError::MissingId),
        };

        let index = self
            .issues
            .iter()
            .position(|issue| issue.id == id && issue.project == project);

        match index {
            Some(index) => {
                self.issues.remove(index);
                tracing::debug!(project = project, id = %id, "deleted issue");
                Ok(id)
            }
            None => Err(StoreError::CouldNotDelete(id)),
        }
    }

    fn find_mut(&mut self, project: &str, id: &IssueId) -> Option<&mut Issue> {
        self.issues
            .iter_mut()
            .find(|issue| issue.id == *id && issue.project == project)
    }
}

impl Default for IssueStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an update value as the stored string form
fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The boolean coercion rule for `open`: true only for the literal string
/// `"true"`. Anything else — other strings, JSON booleans, numbers — is
/// false.
fn coerce_open(value: &Value) -> bool {
    matches!(value, Value::String(s) if s == "true")
}
