//! Repository snapshot normalization.
//!
//! Upstream listings are reshaped entry by entry, in upstream order. Fields
//! are coerced leniently; only a structurally wrong payload is rejected.

use serde::Deserialize;
use serde_json::Value;

use crate::normalize::error::RelayError;
use crate::normalize::types::{EntryKind, FileEntry, RepoSnapshot, RepoSnapshotRequest};
use crate::upstream::UpstreamResult;

#[derive(Debug, Deserialize)]
struct UpstreamSnapshot {
    #[serde(default)]
    files: Option<Vec<UpstreamEntry>>,
    #[serde(default)]
    commit_info: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UpstreamEntry {
    #[serde(default)]
    path: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    size: Option<Value>,
    #[serde(default)]
    sha: Option<Value>,
}

/// Turn an upstream snapshot outcome into the client response.
pub fn normalize_snapshot(
    request: &RepoSnapshotRequest,
    outcome: UpstreamResult,
) -> Result<RepoSnapshot, RelayError> {
    let payload = outcome.map_err(|failure| {
        RelayError::from_upstream(failure, || {
            format!("Project '{}' not found", request.project_id)
        })
    })?;

    if !payload.is_object() {
        tracing::error!(
            project_id = %request.project_id,
            kind = json_kind(&payload),
            "Inspector snapshot payload is not an object"
        );
        return Err(RelayError::UpstreamError);
    }

    let upstream: UpstreamSnapshot = serde_json::from_value(payload).map_err(|e| {
        tracing::error!(
            project_id = %request.project_id,
            error = %e,
            "Inspector snapshot payload has unexpected shape"
        );
        RelayError::UpstreamError
    })?;

    let files: Vec<FileEntry> = upstream
        .files
        .unwrap_or_default()
        .into_iter()
        .map(|entry| FileEntry {
            path: string_field(entry.path).unwrap_or_default(),
            kind: EntryKind::from_label(string_field(entry.kind).as_deref()),
            size: entry.size.as_ref().map(coerce_size).unwrap_or(0),
            sha: string_field(entry.sha),
        })
        .collect();

    let commit_info = match upstream.commit_info {
        Some(Value::Object(map)) => Some(map),
        Some(Value::Null) | None => None,
        Some(other) => {
            tracing::warn!(
                project_id = %request.project_id,
                kind = json_kind(&other),
                "Dropping non-object commit_info from inspector"
            );
            None
        }
    };

    tracing::debug!(
        project_id = %request.project_id,
        files = files.len(),
        "Snapshot normalized"
    );

    Ok(RepoSnapshot {
        project_id: request.project_id.clone(),
        files,
        commit_info,
    })
}

/// Only JSON strings count; any other value is treated as absent.
fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Coerce an upstream size to a non-negative integer.
fn coerce_size(value: &Value) -> u64 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else if let Some(f) = n.as_f64() {
                float_size(f)
            } else {
                0
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(float_size))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn float_size(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
