//! Orchestrator crate for VibeWatch.
//!
//! This crate sequences the pipeline stages into one request, tracks the
//! request's state and loads the service configuration.

pub mod config;
pub mod orchestrator;
pub mod state;

pub use config::{ConfigError, ServiceConfig};
pub use orchestrator::{INVALID_POSTER_ADVISORY, RecommendationOrchestrator};
pub use state::PipelineState;
