use serde::{Deserialize, Serialize};

/// Which strategy produced a set of insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSource {
    Llm,
    #[default]
    Heuristic,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSource::Llm => "llm",
            InsightSource::Heuristic => "heuristic",
        }
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedInsights {
    pub errors: Vec<String>,
    pub timeframes: Vec<String>,
    pub failed_actions: Vec<String>,
    pub system_failures: Vec<String>,
    pub agent_failures: Vec<String>,
    pub source: InsightSource,
}

impl ExtractedInsights {
    pub fn empty(source: InsightSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }
}
