//! Strategy selection and the fallback from model to heuristic.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{InsightModel, ModelError, ModelRequest, OpenAiClient};
use crate::conf::ModelConfig;
use crate::parser::model::LogEntry;

use super::heuristic::heuristic_insights;
use super::llm::{build_prompt, parse_insights, ReplyError, SYSTEM_PROMPT};
use super::model::ExtractedInsights;

/// How insights are produced. Chosen once, at construction.
#[derive(Clone)]
pub enum InsightStrategy {
    Model {
        client: Arc<dyn InsightModel>,
        temperature: f32,
    },
    Heuristic,
}

#[derive(Error, Debug)]
enum FallbackReason {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("model returned an empty reply")]
    EmptyReply,
    #[error(transparent)]
    Reply(#[from] ReplyError),
}

#[derive(Clone)]
pub struct InsightExtractor {
    strategy: InsightStrategy,
}

impl InsightExtractor {
    pub fn heuristic() -> Self {
        Self { strategy: InsightStrategy::Heuristic }
    }

    pub fn with_model(client: Arc<dyn InsightModel>, temperature: f32) -> Self {
        Self {
            strategy: InsightStrategy::Model { client, temperature },
        }
    }

    /// Model strategy when an API key is configured, heuristic otherwise.
    pub fn from_config(config: &ModelConfig) -> Self {
        match OpenAiClient::from_config(config) {
            Some(client) => Self::with_model(Arc::new(client), config.temperature),
            None => Self::heuristic(),
        }
    }

    pub fn strategy(&self) -> &InsightStrategy {
        &self.strategy
    }

    /// Name of the configured model, if any.
    pub fn model_name(&self) -> Option<&str> {
        match &self.strategy {
            InsightStrategy::Model { client, .. } => Some(client.model_name()),
            InsightStrategy::Heuristic => None,
        }
    }

    /// Never fails: any problem on the model path yields heuristic insights.
    pub async fn extract(&self, entries: &[LogEntry]) -> ExtractedInsights {
        let InsightStrategy::Model { client, temperature } = &self.strategy else {
            debug!(entries = entries.len(), "No model configured, using heuristic insights");
            return heuristic_insights(entries);
        };

        match ask_model(client.as_ref(), *temperature, entries).await {
            Ok(insights) => insights,
            Err(reason) => {
                warn!(
                    model = client.model_name(),
                    error = %reason,
                    "Model insight extraction failed, falling back to heuristic"
                );
                heuristic_insights(entries)
            }
        }
    }
}

async fn ask_model(
    client: &dyn InsightModel,
    temperature: f32,
    entries: &[LogEntry],
) -> Result<ExtractedInsights, FallbackReason> {
    let request = ModelRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt: build_prompt(entries),
        temperature,
        json_response: true,
    };

    let reply = client
        .complete(&request)
        .await?
        .ok_or(FallbackReason::EmptyReply)?;

    Ok(parse_insights(&reply)?)
}
