//! Best-effort plot translation.

use std::sync::Arc;

use llm_client::ChatCompletion;
use model::LanguageCode;
use tracing::{info, warn};

use crate::prompts;

/// Translates plots into the user's language.
///
/// Never fails: on any error or empty reply the original plot is returned.
/// Callers decide whether translation is needed at all.
pub struct PlotTranslator {
    llm: Arc<dyn ChatCompletion>,
}

impl PlotTranslator {
    pub fn new(llm: Arc<dyn ChatCompletion>) -> Self {
        Self { llm }
    }

    pub async fn translate(&self, plot: &str, language: &LanguageCode) -> String {
        match self.llm.complete(prompts::translation_request(plot, language)).await {
            Ok(translated) if !translated.trim().is_empty() => {
                info!("Translated plot into {}", language);
                translated.trim().to_string()
            }
            Ok(_) => {
                warn!("Empty translation into {}, keeping original plot", language);
                plot.to_string()
            }
            Err(e) => {
                warn!("Translation into {} failed, keeping original plot: {}", language, e);
                plot.to_string()
            }
        }
    }
}
