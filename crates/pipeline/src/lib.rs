//! Pipeline stages for turning a mood into a movie.
//!
//! This crate provides:
//! - `LanguageDetector`: mood text to a two-letter language code
//! - `TitleSuggester`: mood + language to one suggested title
//! - `MetadataLookup`: title to normalized provider metadata
//! - `PlotTranslator`: best-effort plot translation
//! - `prompts`: prompt text and sampling settings for the LLM calls
//!
//! ## Architecture
//! Stages are independent and talk to providers only through the
//! `ChatCompletion` and `MetadataProvider` traits, so each one can be
//! tested against a stub. Sequencing and the fallback policy live in the
//! orchestrator crate.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{LanguageDetector, TitleSuggester};
//!
//! let detector = LanguageDetector::new(llm.clone());
//! let suggester = TitleSuggester::new(llm.clone());
//!
//! let language = detector.detect(mood.as_str()).await;
//! let title = suggester.suggest(&mood, &language).await?;
//! ```

pub mod prompts;
pub mod stages;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use stages::{LanguageDetector, MetadataLookup, PlotTranslator, TitleSuggester};
