//! Insight extraction — turns an ordered batch of entries into a short
//! diagnostic summary, through a model when one is configured and through
//! a deterministic heuristic otherwise (or when the model fails).

pub mod extractor;
pub mod heuristic;
pub mod keywords;
pub mod llm;
pub mod model;

pub use extractor::{InsightExtractor, InsightStrategy};
pub use heuristic::{heuristic_insights, HEURISTIC_LIMIT};
pub use model::{ExtractedInsights, InsightSource};
