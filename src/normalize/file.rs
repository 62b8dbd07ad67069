//! File content normalization.
//!
//! The relay only serves text. Upstream content is accepted as plain UTF-8
//! or as base64 that decodes to UTF-8; everything else is an encoding error.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

use crate::normalize::error::RelayError;
use crate::normalize::types::{FileContent, FileRequest, TEXT_ENCODING};
use crate::upstream::UpstreamResult;

#[derive(Debug, Deserialize)]
struct UpstreamFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Turn an upstream file outcome into the client response.
pub fn normalize_file(
    request: &FileRequest,
    outcome: UpstreamResult,
) -> Result<FileContent, RelayError> {
    let payload = outcome.map_err(|failure| {
        RelayError::from_upstream(failure, || {
            format!(
                "File '{}' not found in project '{}'",
                request.path, request.project_id
            )
        })
    })?;

    if !payload.is_object() {
        tracing::error!(
            project_id = %request.project_id,
            path = %request.path,
            "Inspector file payload is not an object"
        );
        return Err(RelayError::UpstreamError);
    }

    let upstream: UpstreamFile = serde_json::from_value(payload).map_err(|e| {
        tracing::error!(
            project_id = %request.project_id,
            path = %request.path,
            error = %e,
            "Inspector file payload has unexpected shape"
        );
        RelayError::UpstreamError
    })?;

    let content = decode_content(request, upstream)?;
    let size = content.len() as u64;

    Ok(FileContent {
        project_id: request.project_id.clone(),
        path: request.path.clone(),
        content,
        encoding: TEXT_ENCODING.to_string(),
        size,
    })
}

fn decode_content(request: &FileRequest, upstream: UpstreamFile) -> Result<String, RelayError> {
    let content = upstream.content.unwrap_or_default();
    let encoding = upstream
        .encoding
        .map(|e| e.trim().to_ascii_lowercase())
        .unwrap_or_else(|| TEXT_ENCODING.to_string());

    match encoding.as_str() {
        "utf-8" | "utf8" => Ok(content),
        "base64" => {
            let compact: String = content.split_whitespace().collect();
            let bytes = BASE64.decode(compact.as_bytes()).map_err(|e| {
                tracing::error!(
                    project_id = %request.project_id,
                    path = %request.path,
                    error = %e,
                    "Inspector sent malformed base64 content"
                );
                RelayError::UpstreamError
            })?;
            String::from_utf8(bytes).map_err(|_| not_text(request))
        }
        other => {
            tracing::warn!(
                project_id = %request.project_id,
                path = %request.path,
                encoding = %other,
                "Unsupported content encoding from inspector"
            );
            Err(not_text(request))
        }
    }
}

fn not_text(request: &FileRequest) -> RelayError {
    RelayError::Encoding(format!(
        "File '{}' is not valid UTF-8 text and cannot be returned",
        request.path
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamFailure;
    use serde_json::json;

    fn request() -> FileRequest {
        FileRequest {
            project_id: "demo".into(),
            path: "src/main.rs".into(),
        }
    }

    #[test]
    fn test_plain_text() {
        let file = normalize_file(
            &request(),
            Ok(json!({"content": "fn main() {}\n", "size": 999})),
        )
        .unwrap();
        assert_eq!(file.content, "fn main() {}\n");
        assert_eq!(file.encoding, "utf-8");
        assert_eq!(file.size, 13);
        assert_eq!(file.path, "src/main.rs");
    }

    #[test]
    fn test_size_counts_bytes_not_chars() {
        let file = normalize_file(&request(), Ok(json!({"content": "héllo"}))).unwrap();
        assert_eq!(file.size, 6);
    }

    #[test]
    fn test_base64_with_line_breaks() {
        // "hello world" wrapped like a git host would
        let file = normalize_file(
            &request(),
            Ok(json!({"content": "aGVsbG8g\nd29ybGQ=\n", "encoding": "base64"})),
        )
        .unwrap();
        assert_eq!(file.content, "hello world");
        assert_eq!(file.size, 11);
    }

    #[test]
    fn test_binary_base64_is_encoding_error() {
        // 0xff 0xfe 0x00
        let err = normalize_file(
            &request(),
            Ok(json!({"content": "//4A", "encoding": "base64"})),
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::Encoding(_)));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_encoding_is_encoding_error() {
        let err = normalize_file(
            &request(),
            Ok(json!({"content": "abc", "encoding": "latin-1"})),
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::Encoding(_)));
    }

    #[test]
    fn test_malformed_base64_is_upstream_error() {
        let err = normalize_file(
            &request(),
            Ok(json!({"content": "!!!not base64", "encoding": "base64"})),
        )
        .unwrap_err();
        assert_eq!(err, RelayError::UpstreamError);
    }

    #[test]
    fn test_missing_content_is_empty() {
        let file = normalize_file(&request(), Ok(json!({}))).unwrap();
        assert_eq!(file.content, "");
        assert_eq!(file.size, 0);
    }

    #[test]
    fn test_not_found_names_path_and_project() {
        let err = normalize_file(&request(), Err(UpstreamFailure::NotFound)).unwrap_err();
        assert_eq!(
            err,
            RelayError::NotFound("File 'src/main.rs' not found in project 'demo'".into())
        );
    }

    #[test]
    fn test_non_object_payload() {
        assert_eq!(
            normalize_file(&request(), Ok(json!("raw text"))),
            Err(RelayError::UpstreamError)
        );
    }
}
