//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override file and default values.
pub const ENV_BIND_ADDRESS: &str = "RELAY_BIND_ADDRESS";
pub const ENV_UPSTREAM_BASE_URL: &str = "UPSTREAM_BASE_URL";
pub const ENV_UPSTREAM_API_KEY: &str = "UPSTREAM_API_KEY";
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const ENV_UPSTREAM_CONNECT_TIMEOUT_SECS: &str = "UPSTREAM_CONNECT_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file plus the process environment.
///
/// `bind` is the command-line listener override; it wins over file and
/// environment and is validated like any other value.
pub fn load_config(path: Option<&Path>, bind: Option<&str>) -> Result<RelayConfig, ConfigError> {
    load_config_with(path, bind, |var| std::env::var(var).ok())
}

/// Load configuration with an injected environment lookup.
///
/// Order: defaults, then the file (if any), then environment overrides,
/// then the `bind` override, then validation.
pub fn load_config_with<F>(
    path: Option<&Path>,
    bind: Option<&str>,
    lookup: F,
) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    if let Some(bind) = bind {
        config.listener.bind_address = bind.to_string();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto a configuration.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(url) = get(ENV_UPSTREAM_BASE_URL) {
        config.upstream.base_url = url;
    }
    if let Some(key) = get(ENV_UPSTREAM_API_KEY) {
        config.upstream.api_key = Some(key);
    }
    if let Some(raw) = get(ENV_UPSTREAM_TIMEOUT_SECS) {
        config.upstream.request_timeout_secs = parse_secs(ENV_UPSTREAM_TIMEOUT_SECS, &raw)?;
    }
    if let Some(raw) = get(ENV_UPSTREAM_CONNECT_TIMEOUT_SECS) {
        config.upstream.connect_timeout_secs =
            parse_secs(ENV_UPSTREAM_CONNECT_TIMEOUT_SECS, &raw)?;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level.trim().to_ascii_lowercase();
    }
    if let Some(raw) = get(ENV_LOG_FORMAT) {
        config.observability.log_format = raw.parse().map_err(|message| ConfigError::Env {
            var: ENV_LOG_FORMAT,
            message,
        })?;
    }

    Ok(())
}

fn parse_secs(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError::Env {
        var,
        message: format!("'{}' is not a whole number of seconds ({})", raw, e),
    })
}
