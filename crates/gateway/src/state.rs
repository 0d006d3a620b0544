use crate::config::GatewayConfig;
use crate::metrics::GatewayMetrics;
use crate::search::CoralogixClient;
use anyhow::Context;
use reviewer::{InsightExtractor, Pipeline};
use std::sync::Arc;
use tracing::info;

/// Shared application state (thread-safe)
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub pipeline: Arc<Pipeline>,
    /// `None` while Coralogix is not configured
    pub search: Option<Arc<CoralogixClient>>,
    pub metrics: GatewayMetrics,
}

impl AppState {
    /// Build collaborators from configuration. Strategy selection happens
    /// here, once.
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let extractor = InsightExtractor::from_config(&config.model);
        match extractor.model_name() {
            Some(model) => info!("✓ Insights via model {}", model),
            None => info!("No model API key configured, insights use the heuristic"),
        }

        let search = CoralogixClient::from_config(&config.coralogix)
            .context("Failed to build Coralogix client")?
            .map(Arc::new);
        if let Some(client) = &search {
            info!("✓ Coralogix search proxy enabled ({})", client.search_url());
        }

        Ok(Self::with_pipeline(config, Pipeline::new(extractor), search))
    }

    pub fn with_pipeline(
        config: GatewayConfig,
        pipeline: Pipeline,
        search: Option<Arc<CoralogixClient>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            search,
            metrics: GatewayMetrics::new(),
        }
    }
}
