//! Detects the language of the user's mood.
//!
//! Detection never fails: every problem (transport error, bad status,
//! an answer that is not a two-letter code) falls back to English.

use std::sync::Arc;

use llm_client::ChatCompletion;
use model::LanguageCode;
use tracing::{debug, warn};

use crate::prompts;

pub struct LanguageDetector {
    llm: Arc<dyn ChatCompletion>,
}

impl LanguageDetector {
    pub fn new(llm: Arc<dyn ChatCompletion>) -> Self {
        Self { llm }
    }

    /// Classify `text` into a language code, defaulting to `en`.
    pub async fn detect(&self, text: &str) -> LanguageCode {
        if text.trim().is_empty() {
            return LanguageCode::english();
        }

        match self.llm.complete(prompts::detection_request(text)).await {
            Ok(reply) => match LanguageCode::parse(&reply) {
                Some(code) => {
                    debug!("Detected language {}", code);
                    code
                }
                None => {
                    warn!("Unusable language code {:?}, falling back to en", reply);
                    LanguageCode::english()
                }
            },
            Err(e) => {
                warn!("Language detection failed, falling back to en: {}", e);
                LanguageCode::english()
            }
        }
    }
}
