//! Deterministic insight extraction: severity filter, keyword sets and a
//! min/max time span. Always available.

use crate::parser::model::{iso8601, LogEntry};

use super::keywords::{AGENT, FAILURE, SYSTEM};
use super::model::{ExtractedInsights, InsightSource};

/// Maximum items per heuristic list.
pub const HEURISTIC_LIMIT: usize = 10;

pub fn heuristic_insights(entries: &[LogEntry]) -> ExtractedInsights {
    let mut insights = ExtractedInsights::empty(InsightSource::Heuristic);

    for entry in entries {
        let lowered = entry.message.to_lowercase();

        if entry.severity.is_error() && has_room(&insights.errors) {
            insights.errors.push(format!("{}: {}", entry.severity, entry.message));
        }
        if FAILURE.matches_lowercase(&lowered) && has_room(&insights.failed_actions) {
            insights.failed_actions.push(entry.message.clone());
        }
        if SYSTEM.matches_lowercase(&lowered) && has_room(&insights.system_failures) {
            insights.system_failures.push(entry.message.clone());
        }
        if AGENT.matches_lowercase(&lowered) && has_room(&insights.agent_failures) {
            insights.agent_failures.push(entry.message.clone());
        }
    }

    insights.timeframes.extend(activity_span(entries));
    insights
}

fn has_room(list: &[String]) -> bool {
    list.len() < HEURISTIC_LIMIT
}

/// Earliest to latest timestamp over every timestamped entry, regardless of
/// order or gaps.
fn activity_span(entries: &[LogEntry]) -> Option<String> {
    let mut stamps = entries.iter().filter_map(|entry| entry.timestamp);
    let first = stamps.next()?;
    let (start, end) = stamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));

    Some(format!(
        "Activity spans from {} to {}.",
        iso8601(&start),
        iso8601(&end)
    ))
}
