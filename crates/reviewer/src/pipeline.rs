//! Upload boundary — raw uploads in, entries plus insights out.

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::insights::{ExtractedInsights, InsightExtractor, InsightSource};
use crate::parser::archive::extract_texts;
use crate::parser::line::parse_content;
use crate::parser::model::LogEntry;

/// One uploaded file: a plain log or a zip bundle.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: Some(filename.into()),
            bytes: bytes.into(),
        }
    }
}

/// Result of analysing one batch of uploads.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub entries: Vec<LogEntry>,
    pub insights: ExtractedInsights,
    /// Model that produced the insights; `None` for heuristic results.
    pub model: Option<String>,
}

/// Decode and parse every upload, concatenating entries in upload order
/// then member order then line order.
///
/// CPU-bound; async callers should run it on the blocking pool.
pub fn parse_uploads(uploads: &[Upload]) -> Result<Vec<LogEntry>, AnalysisError> {
    let mut entries = Vec::new();

    for upload in uploads {
        let texts = extract_texts(&upload.bytes, upload.filename.as_deref())?;
        for text in &texts {
            entries.extend(parse_content(text));
        }
        debug!(
            file = upload.filename.as_deref().unwrap_or("<unnamed>"),
            texts = texts.len(),
            total_entries = entries.len(),
            "Upload parsed"
        );
    }

    if entries.is_empty() {
        return Err(AnalysisError::NoEntriesParsed);
    }
    Ok(entries)
}

#[derive(Clone)]
pub struct Pipeline {
    extractor: InsightExtractor,
}

impl Pipeline {
    pub fn new(extractor: InsightExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &InsightExtractor {
        &self.extractor
    }

    pub async fn analyze(&self, uploads: Vec<Upload>) -> Result<Analysis, AnalysisError> {
        let entries = parse_uploads(&uploads)?;
        Ok(self.summarize(entries).await)
    }

    /// Derive insights for already-parsed entries.
    pub async fn summarize(&self, entries: Vec<LogEntry>) -> Analysis {
        let insights = self.extractor.extract(&entries).await;
        let model = match insights.source {
            InsightSource::Llm => self.extractor.model_name().map(str::to_string),
            InsightSource::Heuristic => None,
        };

        info!(
            entries = entries.len(),
            source = insights.source.as_str(),
            errors = insights.errors.len(),
            "Analysis complete"
        );

        Analysis { entries, insights, model }
    }
}
