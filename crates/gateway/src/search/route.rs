use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::client::SearchRequest;
use super::map::SearchPage;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    system: Option<String>,
    subsystem: Option<String>,
    query: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

impl From<SearchParams> for SearchRequest {
    fn from(params: SearchParams) -> Self {
        let defaults = SearchRequest::default();
        Self {
            system: params.system,
            subsystem: params.subsystem,
            query: params.query,
            page: params.page.unwrap_or(defaults.page),
            page_size: params.page_size.unwrap_or(defaults.page_size),
        }
    }
}

/// GET /logs/search — proxy a query to Coralogix
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchPage>> {
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let client = state.search.as_ref().ok_or(ApiError::SearchUnavailable)?;

    let result = client.search_logs(&params.into()).await;
    state.metrics.search_completed(result.is_ok());

    Ok(Json(result?))
}
