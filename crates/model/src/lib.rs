//! # Model Crate
//!
//! Domain types shared by the VibeWatch crates.
//!
//! ## Main Components
//!
//! - **types**: Pipeline values (MoodInput, LanguageCode, SuggestedTitle,
//!   MovieMetadata, Recommendation) and the placeholder sentinels
//! - **error**: The `PipelineError` taxonomy and the `Stage` tag
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::{LanguageCode, MoodInput};
//!
//! let mood = MoodInput::parse("rainy sunday, a bit melancholic")?;
//! let language = LanguageCode::parse(" FR ").unwrap_or_default();
//! assert_eq!(language.as_str(), "fr");
//! ```

pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{PipelineError, Result, Stage};
pub use types::{
    // Values
    LanguageCode,
    MoodInput,
    MovieMetadata,
    Recommendation,
    RecommendationResponse,
    SuggestedTitle,
    // Helpers
    is_http_url,
    // Sentinels
    DEFAULT_LANGUAGE,
    NO_DESCRIPTION,
    NO_IMAGE_URL,
    NO_POSTER_URL,
    RATING_UNAVAILABLE,
};
