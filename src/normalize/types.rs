//! Request and response types of the client-facing contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::error::RelayError;

/// Raw query of `GET /api/repo-snapshot`.
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    pub project_id: Option<String>,
}

/// Raw query of `GET /api/file`.
#[derive(Debug, Default, Deserialize)]
pub struct FileQuery {
    pub project_id: Option<String>,
    pub path: Option<String>,
}

/// Validated snapshot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSnapshotRequest {
    pub project_id: String,
}

impl TryFrom<SnapshotQuery> for RepoSnapshotRequest {
    type Error = RelayError;

    fn try_from(query: SnapshotQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            project_id: project_id(query.project_id)?,
        })
    }
}

/// Validated file request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub project_id: String,
    pub path: String,
}

impl TryFrom<FileQuery> for FileRequest {
    type Error = RelayError;

    fn try_from(query: FileQuery) -> Result<Self, Self::Error> {
        let project_id = project_id(query.project_id)?;
        let path = required("path", query.path)?;
        Ok(Self { project_id, path })
    }
}

/// Reject missing or blank values. The value itself is returned untouched:
/// leading and trailing spaces are legal in file names.
fn required(name: &str, value: Option<String>) -> Result<String, RelayError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| RelayError::Parameter(format!("{} is required", name)))
}

fn project_id(value: Option<String>) -> Result<String, RelayError> {
    let id = required("project_id", value)?.trim().to_string();
    if id == "." || id == ".." {
        return Err(RelayError::Parameter(format!(
            "project_id '{}' is not a valid identifier",
            id
        )));
    }
    Ok(id)
}

/// Kind of a repository entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Interpret an upstream type label. Unknown or missing labels are files.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::to_ascii_lowercase).as_deref() {
            Some("directory") | Some("dir") | Some("tree") => EntryKind::Directory,
            _ => EntryKind::File,
        }
    }
}

/// One entry of a normalized snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Body of a successful `GET /api/repo-snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub project_id: String,
    pub files: Vec<FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_info: Option<Map<String, Value>>,
}

/// The only encoding the relay hands out.
pub const TEXT_ENCODING: &str = "utf-8";

/// Body of a successful `GET /api/file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub project_id: String,
    pub path: String,
    pub content: String,
    pub encoding: String,
    /// Byte length of `content`.
    pub size: u64,
}
