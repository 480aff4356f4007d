//! Client configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use taskboard_domain::Endpoints;

/// Backend base URL.
pub const API_URL_VAR: &str = "TASKBOARD_API_URL";
/// Per-request timeout in seconds.
pub const TIMEOUT_VAR: &str = "TASKBOARD_TIMEOUT_SECS";
/// Path of the durable session file.
pub const SESSION_FILE_VAR: &str = "TASKBOARD_SESSION_FILE";
/// Comma separated statuses treated as authentication failures.
pub const REFRESH_ON_VAR: &str = "TASKBOARD_REFRESH_ON";
/// Seconds before `exp` at which a token counts as expired.
pub const EXPIRY_LEEWAY_VAR: &str = "TASKBOARD_EXPIRY_LEEWAY_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;
const DEFAULT_REFRESH_ON: [u16; 3] = [401, 403, 404];
const LEEWAY_RANGE: std::ops::RangeInclusive<u64> = 0..=300;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The API URL is not an absolute http(s) URL.
    #[error("{var} is not a valid http(s) URL: {value}")]
    InvalidUrl {
        /// Variable or flag that carried the value.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// The timeout is not a whole number of seconds within range.
    #[error("TASKBOARD_TIMEOUT_SECS must be between 1 and 300 seconds, got {0:?}")]
    InvalidTimeout(String),

    /// The expiry leeway is not a whole number of seconds within range.
    #[error("TASKBOARD_EXPIRY_LEEWAY_SECS must be between 0 and 300 seconds, got {0:?}")]
    InvalidLeeway(String),

    /// A refresh status is not an HTTP status code.
    #[error("TASKBOARD_REFRESH_ON contains an invalid status code: {0:?}")]
    InvalidStatus(String),

    /// No session file was configured and the platform has no data directory.
    #[error("no data directory available; set TASKBOARD_SESSION_FILE")]
    NoDataDir,
}

/// Settings needed to wire the session core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend endpoints.
    pub endpoints: Endpoints,
    /// Deadline for every backend call.
    pub timeout: Duration,
    /// Durable session file.
    pub session_file: PathBuf,
    /// Statuses that trigger a refresh and retry.
    pub refresh_statuses: Vec<u16>,
    /// Margin before `exp` at which tokens are judged expired.
    pub expiry_leeway: Duration,
}

impl ClientConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any present but invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any present but invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let endpoints = match value(API_URL_VAR) {
            Some(url) => parse_endpoints(API_URL_VAR, &url)?,
            None => parse_endpoints(API_URL_VAR, DEFAULT_API_URL)?,
        };

        let timeout = match value(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let session_file = match value(SESSION_FILE_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        let refresh_statuses = match value(REFRESH_ON_VAR) {
            Some(raw) => parse_statuses(&raw)?,
            None => DEFAULT_REFRESH_ON.to_vec(),
        };

        let expiry_leeway = match value(EXPIRY_LEEWAY_VAR) {
            Some(raw) => parse_leeway(&raw)?,
            None => Duration::ZERO,
        };

        Ok(Self {
            endpoints,
            timeout,
            session_file,
            refresh_statuses,
            expiry_leeway,
        })
    }

    /// Replaces the backend URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for a non-http(s) URL.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.endpoints = parse_endpoints("--api-url", url)?;
        Ok(self)
    }

    /// Replaces the session file location.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

fn parse_endpoints(var: &'static str, url: &str) -> Result<Endpoints, ConfigError> {
    Endpoints::new(url.trim()).map_err(|_| ConfigError::InvalidUrl {
        var,
        value: url.to_string(),
    })
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| TIMEOUT_RANGE.contains(secs))
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}

fn parse_leeway(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| LEEWAY_RANGE.contains(secs))
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidLeeway(raw.to_string()))
}

fn parse_statuses(raw: &str) -> Result<Vec<u16>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u16>()
                .ok()
                .filter(|status| (100..=599).contains(status))
                .ok_or_else(|| ConfigError::InvalidStatus(part.to_string()))
        })
        .collect()
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("taskboard").join("session.json"))
        .ok_or(ConfigError::NoDataDir)
}
