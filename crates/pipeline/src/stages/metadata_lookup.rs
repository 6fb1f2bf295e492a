//! Looks the suggested title up at the metadata provider.
//!
//! The provider marks missing fields with a literal `"N/A"`. Plot, poster
//! and rating are normalized independently, so one missing field never
//! affects the others:
//! - plot: `None`
//! - poster: `NO_POSTER_URL`
//! - rating: `None` (shown as "N/A")

use std::sync::Arc;

use metadata_client::{MetadataClientError, MetadataProvider, NOT_AVAILABLE, TitleResponse};
use model::{MovieMetadata, NO_POSTER_URL, PipelineError, Result, Stage, SuggestedTitle};
use tracing::{info, warn};

pub struct MetadataLookup {
    provider: Arc<dyn MetadataProvider>,
}

impl MetadataLookup {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and normalize metadata for `title`.
    ///
    /// # Errors
    /// * `PipelineError::Network` - connectivity loss or timeout
    /// * `PipelineError::NotFound` - the provider answered `"Response": "False"`
    /// * `PipelineError::Lookup` - any other provider failure, or no title in the answer
    pub async fn lookup(&self, title: &SuggestedTitle) -> Result<MovieMetadata> {
        let response = self
            .provider
            .fetch_by_title(title.as_str())
            .await
            .map_err(|e| lookup_error(title, &e))?;

        if !response.is_found() {
            warn!(
                "Metadata provider has no match for {:?}: {}",
                title.as_str(),
                response.error.as_deref().unwrap_or("no reason given")
            );
            return Err(PipelineError::NotFound {
                title: title.as_str().to_string(),
            });
        }

        let metadata = normalize(response).ok_or_else(|| {
            warn!("Metadata provider answered for {:?} without a title", title.as_str());
            PipelineError::Lookup {
                title: title.as_str().to_string(),
                reason: "the metadata provider returned no title".to_string(),
            }
        })?;

        info!(
            "Found {:?} (plot: {}, rating: {})",
            metadata.canonical_title,
            if metadata.has_plot() { "yes" } else { "no" },
            metadata.display_rating()
        );
        Ok(metadata)
    }
}

/// Turn a found response into `MovieMetadata`.
///
/// Returns `None` when the response has no usable title.
pub fn normalize(response: TitleResponse) -> Option<MovieMetadata> {
    let canonical_title = available(response.title)?;
    let poster_url = available(response.poster).unwrap_or_else(|| NO_POSTER_URL.to_string());

    Some(MovieMetadata {
        canonical_title,
        plot: available(response.plot),
        poster_url,
        rating: available(response.imdb_rating),
    })
}

/// Absent, blank and `"N/A"` all mean the same thing.
fn available(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != NOT_AVAILABLE)
}

fn lookup_error(title: &SuggestedTitle, e: &MetadataClientError) -> PipelineError {
    warn!("Metadata lookup for {:?} failed: {}", title.as_str(), e);
    if e.is_network() {
        return PipelineError::Network {
            during: Stage::Lookup,
        };
    }
    let reason = match e {
        MetadataClientError::Status { status } => {
            format!("the metadata provider returned status {}", status)
        }
        MetadataClientError::InvalidResponse(_) => {
            "the metadata provider sent an unreadable response".to_string()
        }
        MetadataClientError::ClientBuild(_) | MetadataClientError::Transport { .. } => {
            "the metadata provider could not be reached".to_string()
        }
    };
    PipelineError::Lookup {
        title: title.as_str().to_string(),
        reason,
    }
}
