//! trackd - Minimal project-scoped issue tracker REST service
//!
//! Clients create, list, filter, update, and delete issue records scoped to a
//! named project over HTTP. Storage is process-local and in-memory: the store
//! starts empty and is discarded on exit.
//!
//! # Architecture
//!
//! - **model**: Core data structures (Issue, IssueId, IssueDraft)
//! - **store**: The owned in-memory collection and its CRUD semantics
//! - **server**: axum REST surface over the store
//! - **config**: YAML service configuration
//! - **logging**: tracing setup

// Core modules
pub mod config;
pub mod error;
pub mod model;
pub mod store;

// Components
pub mod logging;
pub mod server;

// Re-exports
pub use error::{Result, TrackdError};
