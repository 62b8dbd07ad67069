//! Client-facing error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

use crate::upstream::UpstreamFailure;

/// Every way a relay request can fail, as seen by the client.
///
/// `Display` is the exact message placed in the `{"error": ...}` body, so
/// variants never carry upstream internals.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// Missing, empty or malformed client input. Never reaches upstream.
    #[error("{0}")]
    Parameter(String),

    /// Upstream confirms the repository or file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Upstream could not be reached or timed out.
    #[error("Repository inspector is unavailable, try again later")]
    UpstreamUnavailable,

    /// Upstream was reachable but answered with something unusable.
    #[error("Repository inspector returned an unexpected response")]
    UpstreamError,

    /// File content cannot be represented as UTF-8 text.
    #[error("{0}")]
    Encoding(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error")]
    Internal,
}

impl RelayError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Parameter(_) | RelayError::Encoding(_) => StatusCode::BAD_REQUEST,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::UpstreamError => StatusCode::BAD_GATEWAY,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an upstream failure, using `not_found` as the 404 message.
    pub fn from_upstream(failure: UpstreamFailure, not_found: impl FnOnce() -> String) -> Self {
        match failure {
            UpstreamFailure::NotFound => RelayError::NotFound(not_found()),
            UpstreamFailure::Unavailable(_) => RelayError::UpstreamUnavailable,
            UpstreamFailure::Status { .. } | UpstreamFailure::InvalidPayload(_) => {
                RelayError::UpstreamError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::Parameter("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::Encoding("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(RelayError::UpstreamUnavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(RelayError::UpstreamError.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(RelayError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_details_are_dropped() {
        let err = RelayError::from_upstream(
            UpstreamFailure::Status {
                status: 500,
                body: "Traceback (most recent call last)".into(),
            },
            || unreachable!(),
        );
        assert_eq!(err, RelayError::UpstreamError);
        assert!(!err.to_string().contains("Traceback"));

        let err = RelayError::from_upstream(
            UpstreamFailure::Unavailable("connection refused at 10.0.0.3:9000".into()),
            || unreachable!(),
        );
        assert!(!err.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_not_found_message_is_lazy() {
        let err = RelayError::from_upstream(UpstreamFailure::NotFound, || "gone".into());
        assert_eq!(err, RelayError::NotFound("gone".into()));
    }
}
