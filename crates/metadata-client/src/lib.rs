//! Client for the OMDb-style movie metadata provider.
//!
//! Looks a movie up by exact title and returns the provider's raw answer.
//! Interpreting that answer (not-found responses, `"N/A"` fields, poster
//! fallbacks) is left to the pipeline's lookup stage.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

/// The provider's "not available" marker
pub const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur when talking to the metadata provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetadataClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request never produced an HTTP response
    #[error("Request to metadata provider failed: {message}")]
    Transport { message: String, network: bool },

    #[error("Metadata provider returned status {status}")]
    Status { status: u16 },

    #[error("Invalid response from metadata provider: {0}")]
    InvalidResponse(String),
}

impl MetadataClientError {
    /// True for connection failures and timeouts.
    pub fn is_network(&self) -> bool {
        matches!(self, MetadataClientError::Transport { network: true, .. })
    }
}

impl From<reqwest::Error> for MetadataClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return MetadataClientError::InvalidResponse(e.to_string());
        }
        MetadataClientError::Transport {
            message: e.to_string(),
            network: e.is_connect() || e.is_timeout(),
        }
    }
}

/// Raw answer to a title query, exactly as the provider sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TitleResponse {
    /// "True" or "False"
    #[serde(rename = "Response")]
    pub response: Option<String>,
    /// Provider explanation when `response` is "False"
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
}

impl TitleResponse {
    /// False when the provider flagged the query as failed (`"Response": "False"`).
    pub fn is_found(&self) -> bool {
        !matches!(self.response.as_deref(), Some(r) if r.eq_ignore_ascii_case("false"))
    }
}

/// Anything that can look a movie up by title.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_by_title(&self, title: &str) -> Result<TitleResponse, MetadataClientError>;
}

/// reqwest-backed OMDb client.
#[derive(Clone)]
pub struct OmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `base_url` - Provider root, e.g. "http://www.omdbapi.com/"
    /// * `api_key` - Sent as the `apikey` query parameter
    /// * `timeout` - Applied to every request
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MetadataClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MetadataClientError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn fetch_by_title(&self, title: &str) -> Result<TitleResponse, MetadataClientError> {
        debug!("Querying metadata provider for title {:?}", title);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("t", title),
                ("plot", "full"),
                ("r", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Metadata provider returned {}: {}", status, body);
            return Err(MetadataClientError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<TitleResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_found_response() {
        let parsed: TitleResponse = serde_json::from_str(
            r#"{
                "Title": "Cinema Paradiso",
                "Year": "1988",
                "Plot": "A filmmaker recalls his childhood.",
                "Poster": "https://m.media-amazon.com/images/cp.jpg",
                "imdbRating": "8.5",
                "Response": "True"
            }"#,
        )
        .unwrap();

        assert!(parsed.is_found());
        assert_eq!(parsed.title.as_deref(), Some("Cinema Paradiso"));
        assert_eq!(parsed.imdb_rating.as_deref(), Some("8.5"));
        assert_eq!(parsed.error, None);
    }

    #[test]
    fn test_parses_not_found_response() {
        let parsed: TitleResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();

        assert!(!parsed.is_found());
        assert_eq!(parsed.error.as_deref(), Some("Movie not found!"));
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_missing_response_flag_counts_as_found() {
        let parsed: TitleResponse = serde_json::from_str(r#"{"Title":"Heat"}"#).unwrap();
        assert!(parsed.is_found());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = OmdbClient::new("http://localhost:1/", "omdb-secret", Duration::from_secs(5)).unwrap();
        assert!(!format!("{:?}", client).contains("omdb-secret"));
        assert_eq!(client.base_url(), "http://localhost:1/");
    }
}
