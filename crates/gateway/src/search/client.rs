use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CoralogixConfig;
use crate::error::ApiError;

use super::map::{to_page, SearchPage};

const FALLBACK_MESSAGE: &str = "Failed to query Coralogix";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("page and page_size must be positive integers")]
    InvalidPage,
    #[error("{0}")]
    Upstream(String),
    #[error("Coralogix request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed Coralogix response: {0}")]
    MalformedBody(String),
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidPage => ApiError::InvalidRequest(SearchError::InvalidPage.to_string()),
            SearchError::Upstream(message) => ApiError::Upstream(message),
            other => {
                warn!(error = %other, "Coralogix search failed");
                ApiError::Upstream(FALLBACK_MESSAGE.to_string())
            }
        }
    }
}

/// Search parameters, already defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub system: Option<String>,
    pub subsystem: Option<String>,
    pub query: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            system: None,
            subsystem: None,
            query: None,
            page: 1,
            page_size: 50,
        }
    }
}

/// Minimal Coralogix logs search client.
pub struct CoralogixClient {
    http: Client,
    search_url: String,
    api_key: String,
    webhook_url: Option<String>,
}

impl CoralogixClient {
    /// `Ok(None)` when no API key is configured.
    pub fn from_config(config: &CoralogixConfig) -> Result<Option<Self>, SearchError> {
        let Some(api_key) = config.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) else {
            return Ok(None);
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            http,
            search_url: format!("{}/logs/search", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            webhook_url: config.webhook_url.clone(),
        }))
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    pub async fn search_logs(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        if request.page < 1 || request.page_size < 1 {
            return Err(SearchError::InvalidPage);
        }

        let query = build_query(
            request.system.as_deref(),
            request.subsystem.as_deref(),
            request.query.as_deref(),
        );
        debug!(query = %query, page = request.page, page_size = request.page_size, "Searching Coralogix");

        let response = self
            .http
            .post(&self.search_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "query": query,
                "page": request.page,
                "pageSize": request.page_size,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json"));
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Coralogix returned an error status");
            return Err(SearchError::Upstream(upstream_message(&text, is_json)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedBody(e.to_string()))?;
        if !body.is_object() {
            return Err(SearchError::MalformedBody("expected a JSON object".to_string()));
        }

        Ok(to_page(&body, request.page, request.page_size, self.webhook_url.clone()))
    }
}

/// `system:"…" AND subsystem:"…" AND <query>`, skipping blank parts;
/// `*` when nothing is given.
pub fn build_query(system: Option<&str>, subsystem: Option<&str>, query: Option<&str>) -> String {
    fn present(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.is_empty())
    }

    let parts: Vec<String> = [
        present(system).map(|s| format!("system:\"{}\"", s)),
        present(subsystem).map(|s| format!("subsystem:\"{}\"", s)),
        present(query).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        "*".to_string()
    } else {
        parts.join(" AND ")
    }
}

/// Upstream `message` for JSON error bodies, else the raw text, else a
/// generic message.
fn upstream_message(text: &str, is_json: bool) -> String {
    let message = is_json
        .then(|| json_message(text))
        .flatten()
        .unwrap_or_else(|| text.trim().to_string());

    if message.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

fn json_message(text: &str) -> Option<String> {
    let body: Value = serde_json::from_str(text).ok()?;
    match body.get("message")? {
        Value::String(message) => Some(message.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{extract::State, http::{HeaderMap, StatusCode}, routing::post, Json, Router};
    use parking_lot::Mutex;

    // ── Query building ──────────────────────────────────────────

    #[test]
    fn test_build_query() {
        assert_eq!(build_query(None, None, None), "*");
        assert_eq!(build_query(Some(""), Some(""), Some("")), "*");
        assert_eq!(build_query(Some("billing"), None, None), "system:\"billing\"");
        assert_eq!(
            build_query(Some("billing"), Some("api"), Some("level:ERROR")),
            "system:\"billing\" AND subsystem:\"api\" AND level:ERROR"
        );
        assert_eq!(build_query(None, Some("api"), Some("timeout")), "subsystem:\"api\" AND timeout");
    }

    #[test]
    fn test_upstream_message() {
        assert_eq!(upstream_message(r#"{"message":"quota exceeded"}"#, true), "quota exceeded");
        assert_eq!(upstream_message(r#"{"message":"quota exceeded"}"#, false), r#"{"message":"quota exceeded"}"#);
        assert_eq!(upstream_message(r#"{"error":"x"}"#, true), r#"{"error":"x"}"#);
        assert_eq!(upstream_message("Bad Gateway", false), "Bad Gateway");
        assert_eq!(upstream_message("", false), FALLBACK_MESSAGE);
    }

    // ── Client ──────────────────────────────────────────────────

    #[test]
    fn test_from_config() {
        let config = CoralogixConfig::default();
        assert!(CoralogixClient::from_config(&config).unwrap().is_none());

        let config = CoralogixConfig {
            api_key: Some("cx".to_string()),
            base_url: "https://api.coralogix.com/api/v1/".to_string(),
            ..CoralogixConfig::default()
        };
        let client = CoralogixClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.search_url(), "https://api.coralogix.com/api/v1/logs/search");
    }

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Serve a canned reply on `/logs/search` and record what was sent.
    async fn fake_coralogix(status: StatusCode, reply: Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route(
                "/logs/search",
                post(
                    move |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let auth = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            seen.lock().push((auth, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn client_for(base_url: String) -> CoralogixClient {
        let config = CoralogixConfig {
            api_key: Some("cx-test".to_string()),
            base_url,
            webhook_url: Some("https://hooks.example/cx".to_string()),
            timeout_secs: 5,
        };
        CoralogixClient::from_config(&config).unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_search_success() {
        let (url, seen) = fake_coralogix(
            StatusCode::OK,
            serde_json::json!({
                "data": {"logs": [{"time": "t1", "level": "ERROR", "text": "boom", "system": "billing"}]},
                "totalHits": 12,
            }),
        )
        .await;

        let request = SearchRequest {
            system: Some("billing".to_string()),
            query: Some("boom".to_string()),
            page: 2,
            page_size: 5,
            ..SearchRequest::default()
        };
        let page = client_for(url).search_logs(&request).await.unwrap();

        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].message, "boom");
        assert_eq!(page.entries[0].severity, "ERROR");
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.total, 12);
        assert_eq!(page.webhook_url.as_deref(), Some("https://hooks.example/cx"));

        let seen = seen.lock().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer cx-test"));
        assert_eq!(seen[0].1["query"], "system:\"billing\" AND boom");
        assert_eq!(seen[0].1["page"], 2);
        assert_eq!(seen[0].1["pageSize"], 5);
    }

    #[tokio::test]
    async fn test_search_upstream_error_message() {
        let (url, _) = fake_coralogix(
            StatusCode::FORBIDDEN,
            serde_json::json!({"message": "API key lacks logs scope"}),
        )
        .await;

        let err = client_for(url)
            .search_logs(&SearchRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(&err, SearchError::Upstream(m) if m == "API key lacks logs scope"));
    }

    #[tokio::test]
    async fn test_invalid_page_is_rejected_before_sending() {
        let (url, seen) = fake_coralogix(StatusCode::OK, serde_json::json!({})).await;
        let request = SearchRequest { page_size: 0, ..SearchRequest::default() };

        let err = client_for(url).search_logs(&request).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidPage));
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_maps_to_generic_message() {
        let client = client_for("http://127.0.0.1:9".to_string());
        let err = client.search_logs(&SearchRequest::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));

        let api: ApiError = err.into();
        assert_eq!(api.to_string(), FALLBACK_MESSAGE);
    }
}
