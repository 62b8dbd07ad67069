//! Response shaping for errors.
//!
//! # Responsibilities
//! - Render every `RelayError` as its status plus `{"error": "<message>"}`
//! - Provide JSON bodies for unknown routes, wrong methods and panics
//!
//! # Design Decisions
//! - No response leaves the relay with an empty or non-JSON body

use std::any::Any;

use axum::{
    http::Uri,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::normalize::RelayError;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Fallback for paths with no route.
pub async fn route_not_found(uri: Uri) -> RelayError {
    tracing::debug!(path = %uri.path(), "No route matched");
    RelayError::NotFound(format!("No route for {}", uri.path()))
}

/// Fallback for known paths hit with the wrong method.
pub async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

/// Response for a handler that panicked.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");
    RelayError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = RelayError::Parameter("project_id is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await,
            ErrorBody {
                error: "project_id is required".into()
            }
        );
    }

    #[tokio::test]
    async fn test_panic_response() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.error, "Internal server error");
    }
}
