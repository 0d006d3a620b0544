use std::fmt;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical log severity.
///
/// Tokens outside the canonical set are kept (uppercased) in `Other` so that
/// unusual levels such as `NOTICE` or `TRACE` survive normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Critical,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Other(token) => token,
        }
    }

    /// ERROR and CRITICAL count as errors for insight extraction.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(super::severity::normalize_severity(Some(&raw)))
    }
}

/// One normalized log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Parsed timestamp when the line starts with a recognized date/time.
    /// Serializes as ISO-8601 without offset (`2024-06-01T10:00:01.500`).
    pub timestamp: Option<NaiveDateTime>,

    pub severity: Severity,

    /// Text of a bracketed `[subsystem]` prefix
    pub subsystem: Option<String>,

    /// Remaining free text (may be empty)
    pub message: String,
}

impl LogEntry {
    /// Entry for a line whose structure was not recognized at all.
    pub fn unstructured(message: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            severity: Severity::Info,
            subsystem: None,
            message: message.into(),
        }
    }
}

/// ISO-8601 rendering used in prompts and summaries.
/// Fractional seconds are printed only when present (3, 6 or 9 digits).
pub fn iso8601(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
