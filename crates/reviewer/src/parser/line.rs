//! Structural line tokenizer.
//!
//! A line is read left to right as
//! `[timestamp]? [subsystem]? [severity]? [separators]* message`,
//! each step a small explicit check on the remaining text. Every step is
//! optional except the message, so any line yields an entry.

use super::model::LogEntry;
use super::severity::{normalize_severity, SEVERITY_TOKENS};
use super::timestamp::parse_timestamp;

/// Raw pieces found in a line before normalization.
#[derive(Debug, Default, PartialEq)]
struct LineParts<'a> {
    timestamp: Option<&'a str>,
    subsystem: Option<&'a str>,
    severity: Option<&'a str>,
    message: &'a str,
}

/// Characters that end a line. `\r\n` yields an empty piece in between,
/// which is dropped with the other blank lines.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Parse every non-blank line of `content`, in order.
///
/// Lines end at `\n`, `\r\n`, a lone `\r` or any other character in
/// [`LINE_BREAKS`]; blank lines are dropped.
pub fn parse_content(content: &str) -> Vec<LogEntry> {
    content
        .split(LINE_BREAKS)
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Parse a single (non-blank) line into a [`LogEntry`].
pub fn parse_line(line: &str) -> LogEntry {
    match scan(line) {
        Some(parts) => LogEntry {
            timestamp: parse_timestamp(parts.timestamp),
            severity: normalize_severity(parts.severity),
            subsystem: parts.subsystem.map(str::to_string),
            message: parts.message.trim().to_string(),
        },
        // Catch-all: keep the whole line as the message
        None => LogEntry::unstructured(line.trim()),
    }
}

/// Run the structural checks. `None` means the line is refused as a whole.
fn scan(line: &str) -> Option<LineParts<'_>> {
    let mut rest = line;

    let timestamp = match timestamp_len(rest) {
        Some(len) => {
            let (candidate, tail) = rest.split_at(len);
            rest = tail;
            Some(candidate)
        }
        None => None,
    };

    rest = rest.trim_start();
    let subsystem = match subsystem_span(rest) {
        Some((tag, consumed)) => {
            rest = &rest[consumed..];
            Some(tag)
        }
        None => None,
    };

    rest = rest.trim_start();
    let severity = match severity_len(rest) {
        Some(len) => {
            let (token, tail) = rest.split_at(len);
            rest = tail;
            Some(token)
        }
        None => None,
    };

    let message = rest.trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());

    Some(LineParts {
        timestamp,
        subsystem,
        severity,
        message,
    })
}

/// Length in bytes of a leading `YYYY-MM-DD<sep>HH:MM:SS` stamp, extended by
/// a `,mmm` / `.mmm` fraction when exactly three digits follow the seconds.
/// `<sep>` is `T` in either case or any whitespace character.
fn timestamp_len(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    let digits = |b: &[u8], from: usize, to: usize| b[from..to].iter().all(u8::is_ascii_digit);

    let is_date = b.len() >= 10
        && digits(b, 0, 4)
        && b[4] == b'-'
        && digits(b, 5, 7)
        && b[7] == b'-'
        && digits(b, 8, 10);
    if !is_date {
        return None;
    }

    let sep = s[10..].chars().next()?;
    if !(sep.eq_ignore_ascii_case(&'t') || sep.is_whitespace()) {
        return None;
    }
    let date_len = 10 + sep.len_utf8();

    let t = &b[date_len..];
    let is_time = t.len() >= 8
        && digits(t, 0, 2)
        && t[2] == b':'
        && digits(t, 3, 5)
        && t[5] == b':'
        && digits(t, 6, 8);
    if !is_time {
        return None;
    }

    let has_fraction = t.len() >= 12 && matches!(t[8], b',' | b'.') && digits(t, 9, 12);
    Some(date_len + if has_fraction { 12 } else { 8 })
}

/// `[tag]` at the start of `s`: returns the tag and the bytes consumed.
/// The tag must be non-empty and cannot contain `]`.
fn subsystem_span(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix('[')?;
    let close = inner.find(']')?;
    if close == 0 {
        return None;
    }
    Some((&inner[..close], close + 2))
}

/// Length of a severity token at the start of `s`, matched without regard
/// to case and only as a whole word (`ERRORS` is not a severity).
fn severity_len(s: &str) -> Option<usize> {
    let b = s.as_bytes();

    SEVERITY_TOKENS.iter().find_map(|token| {
        let len = token.len();
        if b.len() < len || !b[..len].eq_ignore_ascii_case(token.as_bytes()) {
            return None;
        }
        let boundary = s[len..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
        boundary.then_some(len)
    })
}
