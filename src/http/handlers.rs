//! Client-facing endpoint handlers.
//!
//! Each handler validates its query, makes at most one upstream call and
//! hands the outcome to the normalization layer.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::normalize::{
    normalize_file, normalize_snapshot, FileContent, FileQuery, FileRequest, RelayError,
    RepoSnapshot, RepoSnapshotRequest, SnapshotQuery,
};

/// Fixed service name reported by `/health`.
pub const SERVICE_NAME: &str = "repo-relay";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub health: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub params: &'static [&'static str],
}

/// `GET /`: service name, version and links.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Repo Relay API",
        version: env!("CARGO_PKG_VERSION"),
        health: "/health",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/health",
                params: &[],
            },
            EndpointInfo {
                method: "GET",
                path: "/api/repo-snapshot",
                params: &["project_id"],
            },
            EndpointInfo {
                method: "GET",
                path: "/api/file",
                params: &["project_id", "path"],
            },
        ],
    })
}

/// `GET /health`: never calls upstream.
pub async fn health() -> Json<HealthStatus> {
    tracing::debug!("Health check requested");
    Json(HealthStatus {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// `GET /api/repo-snapshot?project_id=...`
pub async fn repo_snapshot(
    State(state): State<AppState>,
    query: Result<Query<SnapshotQuery>, QueryRejection>,
) -> Result<Json<RepoSnapshot>, RelayError> {
    let Query(query) = query.map_err(bad_query)?;
    let request = RepoSnapshotRequest::try_from(query)?;

    let outcome = state.inspector.fetch_snapshot(&request.project_id).await;
    normalize_snapshot(&request, outcome).map(Json)
}

/// `GET /api/file?project_id=...&path=...`
pub async fn file_content(
    State(state): State<AppState>,
    query: Result<Query<FileQuery>, QueryRejection>,
) -> Result<Json<FileContent>, RelayError> {
    let Query(query) = query.map_err(bad_query)?;
    let request = FileRequest::try_from(query)?;

    let outcome = state
        .inspector
        .fetch_file(&request.project_id, &request.path)
        .await;
    normalize_file(&request, outcome).map(Json)
}

fn bad_query(rejection: QueryRejection) -> RelayError {
    tracing::debug!(error = %rejection.body_text(), "Rejected query string");
    RelayError::Parameter("Malformed query string".to_string())
}
