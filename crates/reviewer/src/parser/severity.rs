use super::model::Severity;

/// Severity tokens recognized in log lines, longest first so that
/// `WARNING` is tried before `WARN`.
pub const SEVERITY_TOKENS: [&str; 7] = [
    "CRITICAL", "WARNING", "ERROR", "DEBUG", "FATAL", "INFO", "WARN",
];

/// Map a raw severity token to its canonical form.
///
/// Absent (or blank) → `INFO`; `WARNING` → `WARN`; `FATAL` → `CRITICAL`;
/// canonical names map to themselves in any casing; anything else is
/// uppercased and kept as `Severity::Other`.
pub fn normalize_severity(raw: Option<&str>) -> Severity {
    let normalized = match raw.map(str::trim) {
        Some(token) if !token.is_empty() => token.to_uppercase(),
        _ => return Severity::Info,
    };

    match normalized.as_str() {
        "DEBUG" => Severity::Debug,
        "INFO" => Severity::Info,
        "WARN" | "WARNING" => Severity::Warn,
        "ERROR" => Severity::Error,
        "CRITICAL" | "FATAL" => Severity::Critical,
        _ => Severity::Other(normalized),
    }
}
