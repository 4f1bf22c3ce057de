use axum::{extract::State, Extension, Json};
use rankdash_core::Settings;

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Validates and forwards the settings form. API keys are masked in the reply.
pub(super) async fn save_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(settings): Json<Settings>,
) -> Result<Json<ApiResponse<Settings>>, ApiError> {
    state
        .client
        .save_settings(&settings)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: settings.redacted(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
