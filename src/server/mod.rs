//! HTTP server for the issue tracker
//!
//! Exposes the issue store over a REST API, project name as a path segment.
//!
//! # Routes
//!
//! - `GET /api/issues/{project}` - List issues, query pairs act as filters
//! - `POST /api/issues/{project}` - Create an issue
//! - `PUT /api/issues/{project}` - Update an issue by `_id` (body)
//! - `DELETE /api/issues/{project}` - Delete an issue by `_id` (body)
//! - `GET /health` - Liveness check
//!
//! Validation failures (missing required fields, missing `_id`, no match) are
//! part of the API contract: they return HTTP 200 with an `error` payload
//! field. Only unexpected internal faults produce a 500, with the detail-free
//! body `{"error": "Server error"}`.
//!
//! # Example
//!
//! ```no_run
//! use trackd::server::IssueServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = IssueServer::new();
//!     server.run("127.0.0.1:3000").await.expect("Server failed");
//! }
//! ```

use crate::model::{Issue, IssueDraft, IssueId};
use crate::store::{IssueStore, StoreError};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bind error: {0}")]
    Bind(String),
}

/// Default request body size limit (1MB)
const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared server state
struct AppState {
    store: Mutex<IssueStore>,
}

/// HTTP server owning the issue store
pub struct IssueServer {
    state: Arc<AppState>,
    max_body_size: usize,
}

impl IssueServer {
    /// Create a new server with an empty store and default body limit
    pub fn new() -> Self {
        Self::with_body_limit(DEFAULT_MAX_BODY_SIZE)
    }

    /// Create a new server with a custom request body size limit
    pub fn with_body_limit(max_body_size: usize) -> Self {
        Self {
            state: Arc::new(AppState {
                store: Mutex::new(IssueStore::new()),
            }),
            max_body_size,
        }
    }

    /// Build the router with panic isolation middleware
    fn router(state: Arc<AppState>, max_body_size: usize) -> Router {
        Router::new()
            .route("/health", get(health))
            .route(
                "/api/issues/{project}",
                get(list_issues)
                    .post(create_issue)
                    .put(update_issue)
                    .delete(delete_issue),
            )
            .layer(middleware::from_fn(catch_panic_middleware))
            .layer(DefaultBodyLimit::max(max_body_size))
            .with_state(state)
    }

    /// Build the application router (for in-process testing)
    pub fn app(&self) -> Router {
        Self::router(self.state.clone(), self.max_body_size)
    }

    /// Run the server on the given address
    pub async fn run(self, addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!(
            addr = addr,
            max_body_size = self.max_body_size,
            "Issue tracker listening"
        );

        axum::serve(listener, Self::router(self.state, self.max_body_size))
            .await
            .map_err(ServerError::Io)
    }
}

impl Default for IssueServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a panicking handler to the generic server-error response
///
/// The API contract reserves transport-level errors for unexpected faults
/// only, and never leaks internal detail in them.
async fn catch_panic_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(method = %method, uri = %uri, "handler panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Update request: `_id` plus any subset of updatable fields
///
/// The extra fields are kept as a raw map because the contract distinguishes
/// "no fields besides `_id` were sent" from "fields were sent but none are
/// updatable" — presence matters, not recognizability.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Delete request: just the `_id`
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}

/// Success acknowledgment for update and delete
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub result: &'static str,

    #[serde(rename = "_id")]
    pub id: IssueId,
}

/// Validation-failure payload: the error string plus the echoed `_id` where
/// the contract requires it
fn failure(err: &StoreError) -> Json<Value> {
    let mut body = json!({ "error": err.to_string() });
    if let Some(id) = err.issue_id() {
        body["_id"] = json!(id);
    }
    Json(body)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_issues(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Query(filters): Query<HashMap<String, String>>,
) -> Json<Vec<Issue>> {
    let store = state.store.lock().await;
    Json(store.list(&project, &filters))
}

async fn create_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(draft): Json<IssueDraft>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.create(&project, draft) {
        Ok(issue) => Json(issue).into_response(),
        Err(err) => failure(&err).into_response(),
    }
}

async fn update_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.update(&project, req.id, &req.fields) {
        Ok(id) => Json(ActionResponse {
            result: "successfully updated",
            id,
        })
        .into_response(),
        Err(err) => failure(&err).into_response(),
    }
}

async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(req): Json<DeleteRequest>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.delete(&project, req.id) {
        Ok(id) => Json(ActionResponse {
            result: "successfully deleted",
            id,
        })
        .into_response(),
        Err(err) => failure(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        IssueServer::new().app()
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(value) => Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&value).unwrap()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = send(test_app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_returns_full_record() {
        let app = test_app();
        let (status, body) = send(
            app,
            "POST",
            "/api/issues/apitest",
            Some(json!({
                "issue_title": "Test Issue",
                "issue_text": "This is a test issue",
                "created_by": "TestUser"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["_id"].is_string());
        assert_eq!(body["issue_title"], "Test Issue");
        assert_eq!(body["open"], true);
        assert_eq!(body["assigned_to"], "");
        assert!(body["created_on"].is_string());
        assert!(body["updated_on"].is_string());
    }

    #[tokio::test]
    async fn test_create_missing_required_is_transport_success() {
        let (status, body) = send(
            test_app(),
            "POST",
            "/api/issues/apitest",
            Some(json!({ "issue_title": "Only a title" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "required field(s) missing");
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let (status, body) = send(
            test_app(),
            "PUT",
            "/api/issues/apitest",
            Some(json!({ "issue_title": "New" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "missing _id");
        assert!(body.get("_id").is_none());
    }

    #[tokio::test]
    async fn test_update_echoes_id_on_failure() {
        let (status, body) = send(
            test_app(),
            "PUT",
            "/api/issues/apitest",
            Some(json!({ "_id": "no-such-id", "issue_title": "New" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "could not update");
        assert_eq!(body["_id"], "no-such-id");
    }

    #[tokio::test]
    async fn test_delete_missing_id() {
        let (status, body) =
            send(test_app(), "DELETE", "/api/issues/apitest", Some(json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "missing _id");
    }

    #[tokio::test]
    async fn test_list_empty_project() {
        let (status, body) = send(test_app(), "GET", "/api/issues/empty", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
