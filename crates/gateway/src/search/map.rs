//! Map — reshape raw Coralogix records into display entries.

use serde::Serialize;
use serde_json::Value;

/// One search hit, with the first usable field of each alias group
/// and the untouched record under `raw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub timestamp: Value,
    pub severity: Value,
    pub system: Value,
    pub subsystem: Value,
    pub message: Value,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub entries: Vec<SearchEntry>,
    pub page: Value,
    pub page_size: Value,
    pub total: Value,
    pub webhook_url: Option<String>,
}

const TIMESTAMP_KEYS: [&str; 3] = ["timestamp", "time", "occurredAt"];
const SEVERITY_KEYS: [&str; 2] = ["severity", "level"];
const MESSAGE_KEYS: [&str; 3] = ["message", "text", "description"];

/// Records live under `logs` or `data.logs`.
pub fn records(body: &Value) -> &[Value] {
    let direct = body.get("logs").filter(|v| is_truthy(v));
    let nested = || body.get("data").and_then(|d| d.get("logs")).filter(|v| is_truthy(v));

    direct
        .or_else(nested)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn to_entry(record: &Value) -> SearchEntry {
    SearchEntry {
        timestamp: first_present(record, &TIMESTAMP_KEYS),
        severity: first_present(record, &SEVERITY_KEYS),
        system: field(record, "system"),
        subsystem: field(record, "subsystem"),
        message: first_present(record, &MESSAGE_KEYS),
        raw: record.clone(),
    }
}

/// Build the page returned to clients. Paging fields fall back to the
/// request values, and `total` to `totalHits` then the hit count.
pub fn to_page(body: &Value, page: i64, page_size: i64, webhook_url: Option<String>) -> SearchPage {
    let entries: Vec<SearchEntry> = records(body).iter().map(to_entry).collect();

    let total = body
        .get("total")
        .or_else(|| body.get("totalHits"))
        .cloned()
        .unwrap_or_else(|| Value::from(entries.len()));

    SearchPage {
        page: body.get("page").cloned().unwrap_or_else(|| Value::from(page)),
        page_size: body.get("pageSize").cloned().unwrap_or_else(|| Value::from(page_size)),
        total,
        webhook_url,
        entries,
    }
}

fn field(record: &Value, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

/// First alias holding a non-empty value; otherwise whatever the last
/// alias holds.
fn first_present(record: &Value, keys: &[&str]) -> Value {
    keys.iter()
        .map(|key| field(record, key))
        .find(is_truthy)
        .unwrap_or_else(|| keys.last().map(|key| field(record, key)).unwrap_or(Value::Null))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
