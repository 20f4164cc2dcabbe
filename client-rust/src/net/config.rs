//! Engine connection settings parsed from environment variables.

pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8000";
pub const DEFAULT_READ_PATH: &str = "/api/amps";
pub const GATE_PATH: &str = "/api/gate";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while building an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid engine URL '{0}' (expected http:// or https://)")]
    InvalidUrl(String),
    #[error("invalid read path '{0}' (expected a path starting with '/')")]
    InvalidReadPath(String),
    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Request and connect timeouts in seconds. Zero disables a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for EngineTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub base_url: String,
    pub read_path: String,
    pub timeouts: EngineTimeouts,
}

impl EngineConfig {
    /// Config for `base_url` with default read path and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] unless the URL is http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            read_path: DEFAULT_READ_PATH.to_owned(),
            timeouts: EngineTimeouts::default(),
        })
    }

    /// Build typed engine config from environment variables.
    ///
    /// Optional:
    /// - `QUBIT_ENGINE_URL`: default `http://localhost:8000`
    /// - `QUBIT_READ_PATH`: default `/api/amps` (`/api/data` also served)
    /// - `QUBIT_REQUEST_TIMEOUT_SECS`: default 30, `0` for none
    /// - `QUBIT_CONNECT_TIMEOUT_SECS`: default 10, `0` for none
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("QUBIT_ENGINE_URL").unwrap_or_else(|| DEFAULT_ENGINE_URL.to_owned());
        let read_path = lookup("QUBIT_READ_PATH").unwrap_or_else(|| DEFAULT_READ_PATH.to_owned());
        let timeouts = EngineTimeouts {
            request_secs: parse_secs(
                "QUBIT_REQUEST_TIMEOUT_SECS",
                lookup("QUBIT_REQUEST_TIMEOUT_SECS").as_deref(),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_secs(
                "QUBIT_CONNECT_TIMEOUT_SECS",
                lookup("QUBIT_CONNECT_TIMEOUT_SECS").as_deref(),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self { base_url: parse_base_url(&base_url)?, read_path: parse_read_path(&read_path)?, timeouts })
    }

    /// Replace the read path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidReadPath`] unless the path starts with `/`.
    pub fn with_read_path(mut self, path: &str) -> Result<Self, ConfigError> {
        self.read_path = parse_read_path(path)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: EngineTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    #[must_use]
    pub fn read_url(&self) -> String {
        format!("{}{}", self.base_url, self.read_path)
    }

    #[must_use]
    pub fn gate_url(&self) -> String {
        format!("{}{GATE_PATH}", self.base_url)
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidUrl(raw.to_owned())),
    }
}

fn parse_read_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.len() > 1 && trimmed.starts_with('/') {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidReadPath(raw.to_owned()))
    }
}

fn parse_secs(var: &'static str, raw: Option<&str>, default: u64) -> Result<u64, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: value.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
