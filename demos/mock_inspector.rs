//! A pretend repository inspector for local development.
//!
//! Serves one in-memory repository, `demo`, at the paths the relay calls:
//! `GET /repos/{project_id}/snapshot` and `GET /repos/{project_id}/file?path=...`.
//!
//! ```text
//! cargo run --example mock_inspector
//! UPSTREAM_BASE_URL=http://127.0.0.1:9000 cargo run
//! ```

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;

const FILES: &[(&str, &str)] = &[
    ("README.md", "# demo\n\nA pretend repository.\n"),
    ("src/main.py", "print('hello from demo')\n"),
];

#[derive(Deserialize)]
struct FileParams {
    path: String,
}

async fn snapshot(Path(project_id): Path<String>) -> impl IntoResponse {
    if project_id != "demo" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "no such repo"}))).into_response();
    }

    let mut files = vec![json!({"path": "src", "type": "directory"})];
    files.extend(FILES.iter().map(|(path, content)| {
        json!({"path": path, "type": "file", "size": content.len(), "sha": format!("{:08x}", content.len())})
    }));

    Json(json!({
        "files": files,
        "commit_info": {"sha": "0000000", "message": "initial commit"}
    }))
    .into_response()
}

async fn file(Path(project_id): Path<String>, Query(params): Query<FileParams>) -> impl IntoResponse {
    let found = FILES.iter().find(|(path, _)| *path == params.path);
    match (project_id.as_str(), found) {
        ("demo", Some((_, content))) => Json(json!({"content": content})).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new()
        .route("/repos/{project_id}/snapshot", get(snapshot))
        .route("/repos/{project_id}/file", get(file));

    let addr = SocketAddr::from(([127, 0, 0, 1], 9000));
    println!("Mock inspector is listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
