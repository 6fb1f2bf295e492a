//! Service configuration loaded from the environment.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OMDB_BASE_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Endpoints, credentials and the per-request timeout.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub request_timeout: Duration,
}

impl ServiceConfig {
    /// Read the configuration from process environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `OPENAI_API_KEY` | required |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL` | `gpt-4o-mini` |
    /// | `OMDB_API_KEY` | required |
    /// | `OMDB_BASE_URL` | `http://www.omdbapi.com/` |
    /// | `VIBE_REQUEST_TIMEOUT_SECS` | `30` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, with a custom variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let request_timeout = match get("VIBE_REQUEST_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "VIBE_REQUEST_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
        };

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            omdb_api_key: required("OMDB_API_KEY")?,
            omdb_base_url: get("OMDB_BASE_URL").unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string()),
            request_timeout,
        })
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("omdb_base_url", &self.omdb_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
