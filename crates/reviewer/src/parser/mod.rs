/// Log normalization module
/// 
/// Turns raw upload bytes into an ordered sequence of structured entries.
/// 
/// # Architecture
/// 
/// - `archive.rs`: zip bundle / plain text extraction
/// - `timestamp.rs`: fixed-format timestamp parsing
/// - `severity.rs`: severity normalization table
/// - `line.rs`: structural line tokenizer
/// - `model.rs`: `LogEntry` and `Severity`
/// 
/// # Totality
/// 
/// Nothing in here fails on content: invalid UTF-8 is replaced, unknown
/// severities pass through, unparseable timestamps become `None`, and lines
/// with no recognizable structure keep their whole text as the message.
/// The only error is a zip archive without a single readable file.
/// 
/// # Bounded memory
/// 
/// Zip members inflate against a per-archive budget (`MAX_EXTRACTED_BYTES`);
/// members past it are skipped like unreadable ones.

pub mod archive;
pub mod line;
pub mod model;
pub mod severity;
pub mod timestamp;

// Re-export commonly used items
pub use archive::extract_texts;
pub use line::{parse_content, parse_line};
pub use model::{LogEntry, Severity};
pub use severity::normalize_severity;
pub use timestamp::parse_timestamp;

// Constants
pub const MAX_EXTRACTED_BYTES: u64 = 256 * 1024 * 1024; // 256MB per archive
