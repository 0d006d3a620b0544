// Module layout for the log reviewer engine.

// Normalization
pub mod parser;
pub mod insights;

// Collaborators & configuration
pub mod client;
pub mod conf;

// Upload boundary
pub mod error;
pub mod pipeline;

pub use error::AnalysisError;
pub use insights::{ExtractedInsights, InsightExtractor, InsightSource};
pub use parser::{LogEntry, Severity};
pub use pipeline::{parse_uploads, Analysis, Pipeline, Upload};
