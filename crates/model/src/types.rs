//! Core domain types for the mood-to-movie pipeline.
//!
//! Every value here is created fresh for one request and dropped once the
//! caller has consumed the result; nothing is cached between requests.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PipelineError, Result};

// =============================================================================
// Sentinels
// =============================================================================

/// Language assumed whenever detection is inconclusive
pub const DEFAULT_LANGUAGE: &str = "en";

/// Poster used when the provider has no poster for the movie
pub const NO_POSTER_URL: &str = "https://placehold.co/500x750/CCCCCC/000000?text=No+Poster";

/// Poster used when the provider's poster is not an http(s) URL
pub const NO_IMAGE_URL: &str = "https://placehold.co/500x750/CCCCCC/000000?text=No+Image";

/// Description used when the provider has no plot
pub const NO_DESCRIPTION: &str = "No description available.";

/// Rating shown when the provider has no rating
pub const RATING_UNAVAILABLE: &str = "N/A";

static LANGUAGE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}$").expect("static regex"));

// =============================================================================
// Input
// =============================================================================

/// The user's free-text mood, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodInput(String);

impl MoodInput {
    /// Validate raw user input.
    ///
    /// Returns `PipelineError::Validation` for empty or whitespace-only text.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::Validation);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoodInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A two-letter lowercase language code such as `en` or `fr`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Accept a model reply as a language code.
    ///
    /// The reply is trimmed and lowercased first; anything that is not
    /// exactly two ASCII letters afterwards is rejected.
    pub fn parse(reply: &str) -> Option<Self> {
        let candidate = reply.trim().to_lowercase();
        if LANGUAGE_CODE_RE.is_match(&candidate) {
            Some(Self(candidate))
        } else {
            None
        }
    }

    pub fn english() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }

    pub fn is_english(&self) -> bool {
        self.0 == DEFAULT_LANGUAGE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A movie title proposed by the language model.
///
/// Only used as a search key for the metadata provider; the title shown to
/// the user always comes from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedTitle(String);

impl SuggestedTitle {
    /// Trim a model reply, returning `None` if nothing is left.
    pub fn from_reply(reply: &str) -> Option<Self> {
        let trimmed = reply.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuggestedTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Provider data
// =============================================================================

/// Normalized metadata for one movie.
///
/// `None` stands for the provider's "not available" marker. Each field
/// degrades on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieMetadata {
    pub canonical_title: String,
    pub plot: Option<String>,
    /// Provider poster, or `NO_POSTER_URL` when it had none
    pub poster_url: String,
    pub rating: Option<String>,
}

impl MovieMetadata {
    pub fn has_plot(&self) -> bool {
        self.plot.is_some()
    }

    /// Rating as shown to the user.
    pub fn display_rating(&self) -> &str {
        self.rating.as_deref().unwrap_or(RATING_UNAVAILABLE)
    }
}

// =============================================================================
// Output
// =============================================================================

/// The user-facing movie card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub movie_name: String,
    pub image_url: String,
    pub description: String,
    pub rating: String,
}

/// Successful result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendation: Recommendation,
    /// Language detected from the mood
    pub language: LanguageCode,
    /// Non-fatal notice, e.g. a poster that had to be replaced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// True when `candidate` parses as an absolute http or https URL.
pub fn is_http_url(candidate: &str) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_rejects_blank_input() {
        for raw in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(MoodInput::parse(raw), Err(PipelineError::Validation));
        }
    }

    #[test]
    fn test_mood_is_trimmed() {
        let mood = MoodInput::parse("  i feel nostalgic \n").unwrap();
        assert_eq!(mood.as_str(), "i feel nostalgic");
    }

    #[test]
    fn test_language_code_accepts_two_letters() {
        assert_eq!(LanguageCode::parse("fr").unwrap().as_str(), "fr");
        assert_eq!(LanguageCode::parse(" AR \n").unwrap().as_str(), "ar");
    }

    #[test]
    fn test_language_code_rejects_everything_else() {
        for reply in ["", "e", "eng", "en.", "\"en\"", "fr-FR", "12", "é1", "The language is fr"] {
            assert!(LanguageCode::parse(reply).is_none(), "accepted {:?}", reply);
        }
    }

    #[test]
    fn test_language_code_default_is_english() {
        let code = LanguageCode::default();
        assert!(code.is_english());
        assert_eq!(code.to_string(), "en");
    }

    #[test]
    fn test_suggested_title_trims_and_rejects_empty() {
        assert!(SuggestedTitle::from_reply("  \n").is_none());
        assert_eq!(
            SuggestedTitle::from_reply(" Cinema Paradiso\n").unwrap().as_str(),
            "Cinema Paradiso"
        );
    }

    #[test]
    fn test_http_url_check() {
        assert!(is_http_url("https://m.media-amazon.com/images/p.jpg"));
        assert!(is_http_url("http://example.com/a.png"));
        assert!(!is_http_url("N/A"));
        assert!(!is_http_url("ftp://example.com/a.png"));
        assert!(!is_http_url("/relative/poster.jpg"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn test_display_rating_falls_back() {
        let metadata = MovieMetadata {
            canonical_title: "Heat".into(),
            plot: None,
            poster_url: NO_POSTER_URL.into(),
            rating: None,
        };
        assert_eq!(metadata.display_rating(), RATING_UNAVAILABLE);
        assert!(!metadata.has_plot());
    }

    #[test]
    fn test_recommendation_serializes_camel_case() {
        let rec = Recommendation {
            movie_name: "Heat".into(),
            image_url: NO_IMAGE_URL.into(),
            description: NO_DESCRIPTION.into(),
            rating: "8.3".into(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["movieName"], "Heat");
        assert_eq!(json["imageUrl"], NO_IMAGE_URL);
        assert_eq!(json["rating"], "8.3");
    }
}
