//! Asks the language model for one movie title matching a mood.

use std::sync::Arc;

use llm_client::{ChatCompletion, LlmClientError};
use model::{LanguageCode, MoodInput, PipelineError, Result, Stage, SuggestedTitle};
use tracing::{info, warn};

use crate::prompts;

/// Suggests a title for a mood.
///
/// The model's answer is trusted verbatim (after trimming); the only check
/// is that something came back.
pub struct TitleSuggester {
    llm: Arc<dyn ChatCompletion>,
}

impl TitleSuggester {
    pub fn new(llm: Arc<dyn ChatCompletion>) -> Self {
        Self { llm }
    }

    /// Suggest a title fitting `mood`, biased toward `language`.
    ///
    /// # Errors
    /// * `PipelineError::Network` - connectivity loss or timeout
    /// * `PipelineError::Suggestion` - bad status, unreadable or empty reply
    pub async fn suggest(&self, mood: &MoodInput, language: &LanguageCode) -> Result<SuggestedTitle> {
        let reply = self
            .llm
            .complete(prompts::suggestion_request(mood, language))
            .await
            .map_err(|e| suggestion_error(&e))?;

        let title = SuggestedTitle::from_reply(&reply).ok_or_else(|| {
            warn!("Language model returned an empty title");
            PipelineError::Suggestion {
                reason: "the language model did not return a movie title".to_string(),
            }
        })?;

        info!("Language model suggested {:?}", title.as_str());
        Ok(title)
    }
}

fn suggestion_error(e: &LlmClientError) -> PipelineError {
    warn!("Title suggestion failed: {}", e);
    if e.is_network() {
        return PipelineError::Network {
            during: Stage::Suggestion,
        };
    }
    let reason = match e {
        LlmClientError::Status { status, .. } => {
            format!("the language model service returned status {}", status)
        }
        LlmClientError::InvalidResponse(_) => {
            "the language model service sent an unreadable response".to_string()
        }
        LlmClientError::ClientBuild(_) | LlmClientError::Transport { .. } => {
            "the language model service could not be reached".to_string()
        }
    };
    PipelineError::Suggestion { reason }
}
