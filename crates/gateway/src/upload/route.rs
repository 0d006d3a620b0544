use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use reviewer::{parse_uploads, Analysis, AnalysisError, Upload};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying uploaded files; may repeat.
pub const FILES_FIELD: &str = "files";

/// POST /logs/upload — parse uploaded logs and extract insights
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Analysis>> {
    match analyze(&state, multipart).await {
        Ok(analysis) => {
            state.metrics.analysis_completed(&analysis);
            Ok(Json(analysis))
        }
        Err(err) => {
            state.metrics.upload_rejected(err.code());
            Err(err)
        }
    }
}

async fn analyze(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Analysis> {
    let mut multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let uploads = read_uploads(&mut multipart).await?;
    if uploads.is_empty() {
        return Err(ApiError::InvalidRequest(format!(
            "No files uploaded in the '{}' field",
            FILES_FIELD
        )));
    }

    // Zip decoding and line parsing are CPU-bound
    let entries = tokio::task::spawn_blocking(move || parse_uploads(&uploads))
        .await
        .map_err(|e| ApiError::Internal(format!("Parser task failed: {}", e)))?
        .inspect_err(|e| warn!(code = e.code(), "Upload rejected: {}", e))?;

    Ok(state.pipeline.summarize(entries).await)
}

async fn read_uploads(multipart: &mut Multipart) -> ApiResult<Vec<Upload>> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILES_FIELD) {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        debug!(file = filename.as_deref().unwrap_or("<unnamed>"), size = bytes.len(), "Received upload");
        uploads.push(Upload { filename, bytes });
    }

    Ok(uploads)
}

/// A body over the upload limit keeps its 413; any other stream failure is
/// unreadable input.
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload exceeds the body limit: {}", err.body_text());
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        AnalysisError::UnreadableInput(err.body_text()).into()
    }
}
