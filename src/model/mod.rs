//! Core data structures
//!
//! The issue record, its typed identifier, and the create-request draft.

mod ids;
mod issue;

pub use ids::IssueId;
pub use issue::{Issue, IssueDraft};
