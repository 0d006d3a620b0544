//! Prompt construction and reply parsing for the model strategy.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::parser::model::{iso8601, LogEntry};

use super::model::{ExtractedInsights, InsightSource};

pub const SYSTEM_PROMPT: &str = "You are a log analysis assistant.";

const INSTRUCTIONS: &str = "Analyze the following log entries. Identify distinct errors, important \
timeframes, failed actions, and failures caused by the system versus agents. Return a JSON object \
with keys: errors (list), timeframes (list), failed_actions (list), system_failures (list), \
agent_failures (list). Keep answers concise. Logs:\n";

const NO_TIMESTAMP: &str = "(no timestamp)";

/// Why a model reply could not be turned into insights.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReplyError {
    #[error("reply is not valid JSON: {0}")]
    NotJson(String),
    #[error("reply is JSON but not an object")]
    NotAnObject,
}

/// Fixed instructions followed by one line per entry, in input order.
pub fn build_prompt(entries: &[LogEntry]) -> String {
    let lines: Vec<String> = entries.iter().map(prompt_line).collect();
    format!("{}{}", INSTRUCTIONS, lines.join("\n"))
}

/// `"{timestamp} [{subsystem}] {SEVERITY}: {message}"`, with the subsystem
/// part omitted when absent.
pub fn prompt_line(entry: &LogEntry) -> String {
    let timestamp = entry
        .timestamp
        .as_ref()
        .map(iso8601)
        .unwrap_or_else(|| NO_TIMESTAMP.to_string());
    let subsystem = entry
        .subsystem
        .as_deref()
        .map(|tag| format!("[{}] ", tag))
        .unwrap_or_default();

    format!("{} {}{}: {}", timestamp, subsystem, entry.severity, entry.message)
}

/// Parse a model reply into insights tagged `llm`.
///
/// Missing keys give empty lists. A bare string value becomes a single item;
/// non-string list items keep their JSON text.
pub fn parse_insights(reply: &str) -> Result<ExtractedInsights, ReplyError> {
    let value: Value =
        serde_json::from_str(reply.trim()).map_err(|e| ReplyError::NotJson(e.to_string()))?;
    let Value::Object(payload) = value else {
        return Err(ReplyError::NotAnObject);
    };

    Ok(ExtractedInsights {
        errors: string_list(&payload, "errors"),
        timeframes: string_list(&payload, "timeframes"),
        failed_actions: string_list(&payload, "failed_actions"),
        system_failures: string_list(&payload, "system_failures"),
        agent_failures: string_list(&payload, "agent_failures"),
        source: InsightSource::Llm,
    })
}

fn string_list(payload: &Map<String, Value>, key: &str) -> Vec<String> {
    match payload.get(key) {
        Some(Value::Array(items)) => items.iter().map(item_text).collect(),
        Some(Value::String(text)) => vec![text.clone()],
        _ => Vec::new(),
    }
}

fn item_text(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
