//! # Recommendation Orchestrator
//!
//! This module coordinates the entire mood-to-movie pipeline:
//! 1. Validate the mood (no network call for blank input)
//! 2. Detect the mood's language (falls back to `en`)
//! 3. Ask the language model for a title
//! 4. Look the title up at the metadata provider
//! 5. Translate the plot when the mood was not in English
//! 6. Assemble the card, replacing a malformed poster URL
//!
//! Stages run strictly one after another; each needs the previous one's
//! output. A failure in suggestion or lookup aborts the request with no
//! partial result. Detection, translation and the poster check never fail.
//!
//! ## Concurrency
//!
//! The orchestrator holds no per-request state and is cheap to clone, so
//! several requests may run at once. Nothing orders their results: a caller
//! that lets the user resubmit while a request is in flight must ignore or
//! block the stale one itself (e.g. with a busy flag).

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use llm_client::{ChatCompletion, OpenAiClient};
use metadata_client::{MetadataProvider, OmdbClient};
use model::{
    LanguageCode, MoodInput, MovieMetadata, NO_DESCRIPTION, NO_IMAGE_URL, PipelineError,
    Recommendation, RecommendationResponse, is_http_url,
};
use pipeline::{LanguageDetector, MetadataLookup, PlotTranslator, TitleSuggester};

use crate::config::ServiceConfig;
use crate::state::{PipelineState, StateTracker};

/// Advisory attached when the provider's poster URL had to be replaced
pub const INVALID_POSTER_ADVISORY: &str =
    "Received invalid image URL from the metadata provider. Displaying placeholder.";

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    detector: Arc<LanguageDetector>,
    suggester: Arc<TitleSuggester>,
    lookup: Arc<MetadataLookup>,
    translator: Arc<PlotTranslator>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator on top of the two providers.
    ///
    /// # Arguments
    /// * `llm` - Used for detection, suggestion and translation
    /// * `metadata` - Used for the title lookup
    pub fn new(llm: Arc<dyn ChatCompletion>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            detector: Arc::new(LanguageDetector::new(llm.clone())),
            suggester: Arc::new(TitleSuggester::new(llm.clone())),
            lookup: Arc::new(MetadataLookup::new(metadata)),
            translator: Arc::new(PlotTranslator::new(llm)),
        }
    }

    /// Create an orchestrator backed by the real HTTP clients.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let llm = OpenAiClient::new(
            &config.openai_base_url,
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.request_timeout,
        )
        .context("Creating LLM client")?;
        let metadata = OmdbClient::new(
            config.omdb_base_url.clone(),
            config.omdb_api_key.clone(),
            config.request_timeout,
        )
        .context("Creating metadata client")?;

        info!(
            "Orchestrator using {} ({}) and {}",
            llm.endpoint(),
            llm.model(),
            metadata.base_url()
        );
        Ok(Self::new(Arc::new(llm), Arc::new(metadata)))
    }

    /// Main entry point: turn a mood into a movie card.
    ///
    /// # Returns
    /// * `Ok(RecommendationResponse)` - the card, the detected language and
    ///   an optional non-fatal advisory
    /// * `Err(PipelineError)` - validation, suggestion, lookup or network failure
    pub async fn recommend(&self, mood: &str) -> Result<RecommendationResponse, PipelineError> {
        let mut tracker = StateTracker::new(None);
        self.execute(mood, &mut tracker).await
    }

    /// Same as `recommend`, publishing every state change on `progress`.
    pub async fn recommend_with_progress(
        &self,
        mood: &str,
        progress: &watch::Sender<PipelineState>,
    ) -> Result<RecommendationResponse, PipelineError> {
        let mut tracker = StateTracker::new(Some(progress));
        self.execute(mood, &mut tracker).await
    }

    /// The detection stage on its own.
    pub fn language_detector(&self) -> &LanguageDetector {
        &self.detector
    }

    /// The lookup stage on its own.
    pub fn metadata_lookup(&self) -> &MetadataLookup {
        &self.lookup
    }

    async fn execute(
        &self,
        mood: &str,
        tracker: &mut StateTracker<'_>,
    ) -> Result<RecommendationResponse, PipelineError> {
        let start_time = Instant::now();
        let outcome = self.run(mood, tracker).await;

        match &outcome {
            Ok(response) => {
                tracker.advance(PipelineState::Success);
                info!(
                    "Recommended {:?} in {:.2?}",
                    response.recommendation.movie_name,
                    start_time.elapsed()
                );
            }
            Err(e) => {
                tracker.advance(PipelineState::Failed);
                warn!(
                    "Recommendation failed at stage {} after {:.2?}: {}",
                    e.stage(),
                    start_time.elapsed(),
                    e
                );
            }
        }
        outcome
    }

    async fn run(
        &self,
        raw_mood: &str,
        tracker: &mut StateTracker<'_>,
    ) -> Result<RecommendationResponse, PipelineError> {
        tracker.advance(PipelineState::Validating);
        let mood = MoodInput::parse(raw_mood)?;

        tracker.advance(PipelineState::Detecting);
        let language = self.detector.detect(mood.as_str()).await;
        info!("Mood language: {}", language);

        tracker.advance(PipelineState::Suggesting);
        let title = self.suggester.suggest(&mood, &language).await?;

        tracker.advance(PipelineState::LookingUp);
        let metadata = self.lookup.lookup(&title).await?;

        let description = self.describe(&metadata, &language, tracker).await;

        tracker.advance(PipelineState::Assembling);
        let (recommendation, advisory) = assemble(metadata, description);

        Ok(RecommendationResponse {
            recommendation,
            language,
            advisory,
        })
    }

    /// Pick the card description.
    ///
    /// Translation only happens for a non-English mood with an available
    /// plot; a missing plot becomes `NO_DESCRIPTION` untranslated.
    async fn describe(
        &self,
        metadata: &MovieMetadata,
        language: &LanguageCode,
        tracker: &mut StateTracker<'_>,
    ) -> String {
        match metadata.plot.as_deref() {
            Some(plot) if !language.is_english() => {
                tracker.advance(PipelineState::Translating);
                self.translator.translate(plot, language).await
            }
            Some(plot) => plot.to_string(),
            None => NO_DESCRIPTION.to_string(),
        }
    }
}

/// Build the card from the provider data.
///
/// The canonical title from the provider is used, never the suggested one.
/// A poster that is not an http(s) URL is replaced and reported as an
/// advisory; the card itself is still valid.
fn assemble(metadata: MovieMetadata, description: String) -> (Recommendation, Option<String>) {
    let rating = metadata.display_rating().to_string();
    let mut recommendation = Recommendation {
        movie_name: metadata.canonical_title,
        image_url: metadata.poster_url,
        description,
        rating,
    };

    if is_http_url(&recommendation.image_url) {
        return (recommendation, None);
    }

    warn!(
        "Poster URL {:?} is not http(s), using placeholder",
        recommendation.image_url
    );
    recommendation.image_url = NO_IMAGE_URL.to_string();
    (recommendation, Some(INVALID_POSTER_ADVISORY.to_string()))
}
