//! The four pipeline stages.
//!
//! Each stage wraps one provider call and owns its own fallback policy.
//! Stages never call each other; the orchestrator chains them.

pub mod language_detector;
pub mod metadata_lookup;
pub mod plot_translator;
pub mod title_suggester;

// Re-export for convenience
pub use language_detector::LanguageDetector;
pub use metadata_lookup::MetadataLookup;
pub use plot_translator::PlotTranslator;
pub use title_suggester::TitleSuggester;
