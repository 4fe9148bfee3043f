//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PREFS_PATH: &str = "netdash-prefs.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing API base URL; pass --api-url or set NETDASH_API_URL")]
    MissingApiUrl,
    #[error("invalid API base URL '{0}' (expected http:// or https://)")]
    InvalidApiUrl(String),
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashConfig {
    pub api_url: String,
    pub session_cookie: Option<String>,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub prefs_path: PathBuf,
}

impl DashConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `NETDASH_API_URL` (unless `api_url_override` is given)
    ///
    /// Optional:
    /// - `NETDASH_SESSION_COOKIE`: raw `Cookie` header value for the staff session
    /// - `NETDASH_POLL_INTERVAL_MS`: default 5000
    /// - `NETDASH_REQUEST_TIMEOUT_SECS`: default 15
    /// - `NETDASH_PREFS_PATH`: default `netdash-prefs.json`
    pub fn from_env(api_url_override: Option<String>) -> Result<Self, ConfigError> {
        let raw_url = api_url_override
            .or_else(|| env_nonempty("NETDASH_API_URL"))
            .ok_or(ConfigError::MissingApiUrl)?;
        let api_url = normalize_api_url(&raw_url)?;
        let session_cookie = env_nonempty("NETDASH_SESSION_COOKIE");
        let poll_ms = env_parse_u64("NETDASH_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        if poll_ms == 0 {
            return Err(ConfigError::Invalid { var: "NETDASH_POLL_INTERVAL_MS", value: "0".to_owned() });
        }
        let timeout_secs = env_parse_u64("NETDASH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            api_url,
            session_cookie,
            poll_interval: Duration::from_millis(poll_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            prefs_path: prefs_path_from_env(),
        })
    }
}

/// Preferences file location; needs no API settings.
#[must_use]
pub fn prefs_path_from_env() -> PathBuf {
    PathBuf::from(env_nonempty("NETDASH_PREFS_PATH").unwrap_or_else(|| DEFAULT_PREFS_PATH.to_owned()))
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = |scheme: &str| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty());
    if has_host("http://") || has_host("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidApiUrl(raw.to_owned()))
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env_nonempty(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var: key, value: raw }),
    }
}
