//! Repository inspector HTTP client with timeout and error classification.
//!
//! # Responsibilities
//! - Build upstream URLs under `{base_url}/repos/{project_id}/...`
//! - Issue exactly one GET per operation, bounded by the configured timeout
//! - Classify every outcome into an `UpstreamResult`
//! - Never let transport errors escape as faults

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use url::Url;

use crate::config::UpstreamConfig;
use crate::upstream::types::{body_snippet, ClientInitError, UpstreamFailure, UpstreamResult};

/// Client for the repository inspector.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct InspectorClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    timeout: Duration,
}

impl InspectorClient {
    /// Create a new inspector client.
    ///
    /// # Arguments
    /// * `config` - Upstream configuration (base URL, API key, timeouts)
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientInitError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientInitError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientInitError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "cannot be used as a base".to_string(),
            });
        }

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        let api_key = config.api_key.clone().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!("No upstream API key configured; inspector requests are unauthenticated");
        }

        tracing::info!(
            base_url = %base_url,
            timeout_secs = config.request_timeout_secs,
            "Inspector client initialized"
        );

        Ok(Self {
            http,
            base_url,
            api_key,
            timeout,
        })
    }

    /// Fetch the file listing of a repository.
    pub async fn fetch_snapshot(&self, project_id: &str) -> UpstreamResult {
        let url = self.endpoint(project_id, "snapshot");
        self.get(url, &[]).await
    }

    /// Fetch one file of a repository.
    ///
    /// Upstream 404 means either the repository or the file is unknown.
    pub async fn fetch_file(&self, project_id: &str, path: &str) -> UpstreamResult {
        let url = self.endpoint(project_id, "file");
        self.get(url, &[("path", path)]).await
    }

    /// `{base_url}/repos/{project_id}/{operation}`, with `project_id` as one
    /// percent-encoded segment.
    fn endpoint(&self, project_id: &str, operation: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", project_id, operation]);
        }
        url
    }

    async fn get(&self, url: Url, query: &[(&str, &str)]) -> UpstreamResult {
        tracing::debug!(url = %url, "Calling repository inspector");

        let mut request = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_failure(&url, e)),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(self.transport_failure(&url, e)),
        };

        let outcome = classify(status, &body);
        match &outcome {
            Ok(_) => tracing::debug!(url = %url, status = status.as_u16(), "Inspector call succeeded"),
            Err(UpstreamFailure::NotFound) => {
                tracing::warn!(url = %url, "Resource not found on inspector")
            }
            Err(UpstreamFailure::Status { status, body })
                if *status == 401 || *status == 403 =>
            {
                tracing::error!(
                    url = %url,
                    status = *status,
                    body = %body,
                    "Inspector rejected credentials (check UPSTREAM_API_KEY)"
                )
            }
            Err(failure) => tracing::error!(url = %url, error = %failure, "Inspector call failed"),
        }
        outcome
    }

    fn transport_failure(&self, url: &Url, e: reqwest::Error) -> UpstreamFailure {
        let detail = if e.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else {
            e.to_string()
        };
        tracing::error!(url = %url, error = %detail, "Inspector unreachable");
        UpstreamFailure::Unavailable(detail)
    }
}

/// Map an upstream status and body to an outcome.
pub(crate) fn classify(status: StatusCode, body: &[u8]) -> UpstreamResult {
    if status.is_success() {
        return serde_json::from_slice(body)
            .map_err(|e| UpstreamFailure::InvalidPayload(format!("{} ({})", e, body_snippet(body))));
    }
    if status == StatusCode::NOT_FOUND {
        return Err(UpstreamFailure::NotFound);
    }
    Err(UpstreamFailure::Status {
        status: status.as_u16(),
        body: body_snippet(body),
    })
}
