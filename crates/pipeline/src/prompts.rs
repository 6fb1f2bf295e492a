//! Prompt builders and sampling settings for the three LLM calls.
//!
//! | Stage       | temperature | max tokens |
//! |-------------|-------------|------------|
//! | detection   | 0           | 5          |
//! | suggestion  | 0.7         | 50         |
//! | translation | 0.5         | 500        |

use llm_client::CompletionRequest;
use model::{LanguageCode, MoodInput};

/// Sampling settings for one kind of completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Deterministic, and only room for a two-letter code
pub const DETECTION: Sampling = Sampling {
    temperature: 0.0,
    max_tokens: 5,
};

pub const SUGGESTION: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 50,
};

pub const TRANSLATION: Sampling = Sampling {
    temperature: 0.5,
    max_tokens: 500,
};

fn request(prompt: String, sampling: Sampling) -> CompletionRequest {
    CompletionRequest::new(prompt, sampling.temperature, sampling.max_tokens)
}

/// Ask for the ISO 639-1 code of `text`.
pub fn detection_request(text: &str) -> CompletionRequest {
    request(
        format!(
            "Detect the language of the following text: \"{text}\". \
             Respond with only the 2-letter ISO 639-1 language code (e.g., \"en\", \"ar\", \"fr\")."
        ),
        DETECTION,
    )
}

/// Ask for one bare movie title fitting `mood`, relatable in `language`.
pub fn suggestion_request(mood: &MoodInput, language: &LanguageCode) -> CompletionRequest {
    request(
        format!(
            "Suggest one movie title that perfectly fits a '{mood}' mood. \
             Respond with only the movie title, nothing else. \
             The recommended movie's plot should be understandable or relatable in {language} if applicable."
        ),
        SUGGESTION,
    )
}

/// Ask for `plot` translated into `language`, keeping title and tone.
pub fn translation_request(plot: &str, language: &LanguageCode) -> CompletionRequest {
    request(
        format!(
            "Translate the following movie plot into {language} while keeping the original movie title and tone. \
             Only provide the translated plot.\nOriginal Plot: \"{plot}\""
        ),
        TRANSLATION,
    )
}
