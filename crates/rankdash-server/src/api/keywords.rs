use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use rankdash_client::UploadReceipt;
use rankdash_core::{Keyword, KeywordDraft};

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_FILE_NAME: &str = "keywords.csv";

/// Accepts a multipart form with a `file` part and forwards it upstream.
pub(super) async fn upload_keywords(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadReceipt>>, ApiError> {
    let bad_form = |message: String| ApiError::new(req_id.0.clone(), "bad_request", message);

    let mut upload: Option<(String, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_form(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_owned();
        let text = field
            .text()
            .await
            .map_err(|e| bad_form(format!("could not read upload file: {e}")))?;
        upload = Some((file_name, text));
    }

    let (file_name, text) =
        upload.ok_or_else(|| bad_form("multipart field 'file' is required".to_string()))?;

    let receipt = state
        .client
        .upload_keywords(&file_name, text)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    tracing::info!(
        file_name,
        keyword_count = receipt.keyword_count,
        success = receipt.success,
        "keyword upload forwarded"
    );

    Ok(Json(ApiResponse {
        data: receipt,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Manual keyword entry.
pub(super) async fn create_keyword(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<KeywordDraft>,
) -> Result<Json<ApiResponse<Keyword>>, ApiError> {
    let keyword = state
        .client
        .create_keyword(&draft)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: keyword,
        meta: ResponseMeta::new(req_id.0),
    }))
}
