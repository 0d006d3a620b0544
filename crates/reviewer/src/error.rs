use thiserror::Error;

/// Failures surfaced to the caller of the pipeline.
///
/// Everything else (non-zip input, bad UTF-8, model failures, lines with no
/// recognizable structure) degrades to a fallback and never reaches here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unreadable input: {0}")]
    UnreadableInput(String),

    #[error("Archive contains no readable files")]
    EmptyArchive,

    #[error("No log entries could be parsed from the upload")]
    NoEntriesParsed,
}

impl AnalysisError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnreadableInput(_) => "UNREADABLE_INPUT",
            AnalysisError::EmptyArchive => "EMPTY_ARCHIVE",
            AnalysisError::NoEntriesParsed => "NO_ENTRIES_PARSED",
        }
    }
}
