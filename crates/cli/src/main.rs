use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use model::{MovieMetadata, RecommendationResponse, SuggestedTitle};
use orchestrator::config::{
    DEFAULT_OMDB_BASE_URL, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, DEFAULT_TIMEOUT_SECS,
};
use orchestrator::{PipelineState, RecommendationOrchestrator, ServiceConfig};
use tokio::sync::watch;

/// VibeWatch - Mood-based movie recommendations
#[derive(Parser)]
#[command(name = "vibe-watch")]
#[command(about = "Describe your mood, get a movie to watch", long_about = None)]
struct Cli {
    /// API key for the chat-completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    openai_api_key: Option<String>,

    /// Base URL of the chat-completion service
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL, global = true)]
    openai_base_url: String,

    /// Model used for every completion
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_OPENAI_MODEL, global = true)]
    openai_model: String,

    /// API key for the movie metadata service
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true, global = true)]
    omdb_api_key: Option<String>,

    /// Base URL of the movie metadata service
    #[arg(long, env = "OMDB_BASE_URL", default_value = DEFAULT_OMDB_BASE_URL, global = true)]
    omdb_base_url: String,

    /// Timeout in seconds for each outbound request
    #[arg(
        long,
        env = "VIBE_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a movie recommendation for a mood
    Recommend {
        /// How you feel, in any language
        #[arg(long)]
        mood: String,

        /// Print the result as JSON instead of a card
        #[arg(long)]
        json: bool,
    },

    /// Detect the language of a piece of text
    Detect {
        /// Text to classify
        #[arg(long)]
        text: String,
    },

    /// Look a movie up by title
    Lookup {
        /// Exact movie title
        #[arg(long)]
        title: String,
    },
}

impl Cli {
    fn service_config(&self) -> Result<ServiceConfig> {
        Ok(ServiceConfig {
            openai_api_key: required(&self.openai_api_key, "--openai-api-key / OPENAI_API_KEY")?,
            openai_base_url: self.openai_base_url.clone(),
            openai_model: self.openai_model.clone(),
            omdb_api_key: required(&self.omdb_api_key, "--omdb-api-key / OMDB_API_KEY")?,
            omdb_base_url: self.omdb_base_url.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Missing {}", name))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.service_config()?;
    let orchestrator =
        RecommendationOrchestrator::from_config(&config).context("Failed to set up service clients")?;

    // Dispatch to appropriate command handler
    let succeeded = match cli.command {
        Commands::Recommend { mood, json } => handle_recommend(&orchestrator, &mood, json).await?,
        Commands::Detect { text } => handle_detect(&orchestrator, &text).await,
        Commands::Lookup { title } => handle_lookup(&orchestrator, &title).await,
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(orchestrator: &RecommendationOrchestrator, mood: &str, json: bool) -> Result<bool> {
    let (tx, rx) = watch::channel(PipelineState::Idle);
    let progress = tokio::spawn(print_progress(rx));

    let start = Instant::now();
    let outcome = orchestrator.recommend_with_progress(mood, &tx).await;
    drop(tx);
    progress.await.context("Progress printer panicked")?;

    match outcome {
        Ok(response) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_card(&response);
                eprintln!("{}", format!("Found in {:.2?}", start.elapsed()).dimmed());
            }
            Ok(true)
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            Ok(false)
        }
    }
}

/// Handle the 'detect' command
async fn handle_detect(orchestrator: &RecommendationOrchestrator, text: &str) -> bool {
    let language = orchestrator.language_detector().detect(text).await;
    println!("{}", language.as_str().bold());
    true
}

/// Handle the 'lookup' command
async fn handle_lookup(orchestrator: &RecommendationOrchestrator, title: &str) -> bool {
    let Some(title) = SuggestedTitle::from_reply(title) else {
        eprintln!("{} {}", "✗".red(), "Please enter a movie title.".red());
        return false;
    };

    match orchestrator.metadata_lookup().lookup(&title).await {
        Ok(metadata) => {
            print_metadata(&metadata);
            true
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            false
        }
    }
}

/// Print each stage as the pipeline enters it, until a terminal state.
async fn print_progress(mut rx: watch::Receiver<PipelineState>) {
    while rx.changed().await.is_ok() {
        let state = *rx.borrow_and_update();
        if state.is_terminal() {
            break;
        }
        eprintln!("{} {}...", "•".cyan(), state.label());
    }
}

fn print_card(response: &RecommendationResponse) {
    let card = &response.recommendation;
    println!();
    println!("{}", card.movie_name.bold().blue());
    println!("{}IMDb rating: {}", "• ".green(), card.rating);
    println!("{}Poster: {}", "• ".green(), card.image_url);
    println!("{}Language: {}", "• ".green(), response.language);
    println!();
    println!("{}", card.description);
    if let Some(advisory) = &response.advisory {
        println!();
        println!("{} {}", "!".yellow(), advisory.yellow());
    }
}

fn print_metadata(metadata: &MovieMetadata) {
    println!("{}", metadata.canonical_title.bold().blue());
    println!("{}IMDb rating: {}", "• ".green(), metadata.display_rating());
    println!("{}Poster: {}", "• ".green(), metadata.poster_url);
    match &metadata.plot {
        Some(plot) => println!("{}Plot: {}", "• ".green(), plot),
        None => println!("{}Plot: {}", "• ".green(), model::NO_DESCRIPTION.dimmed()),
    }
}
