//! Simple test harness for the recommendation orchestrator.
//!
//! Runs one mood through the full pipeline against the configured services
//! and logs the resulting card.

use anyhow::Result;
use tracing::{error, info};

use orchestrator::{RecommendationOrchestrator, ServiceConfig};

const DEFAULT_MOOD: &str = "i feel nostalgic";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,orchestrator=debug,pipeline=debug,llm_client=debug,metadata_client=debug")
        .init();

    info!("Starting VibeWatch orchestrator test harness");

    let config = ServiceConfig::from_env()?;
    info!("Loaded configuration: {:?}", config);
    let orchestrator = RecommendationOrchestrator::from_config(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mood = if args.is_empty() {
        DEFAULT_MOOD.to_string()
    } else {
        args.join(" ")
    };

    info!("Getting a recommendation for mood {:?}", mood);
    match orchestrator.recommend(&mood).await {
        Ok(response) => {
            let card = &response.recommendation;
            info!("{} [{}] (rating {})", card.movie_name, response.language, card.rating);
            info!("   Poster: {}", card.image_url);
            info!("   {}", card.description);
            if let Some(advisory) = &response.advisory {
                info!("   Note: {}", advisory);
            }
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
