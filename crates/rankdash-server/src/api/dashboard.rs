use axum::{extract::State, Extension, Json};
use rankdash_client::load_snapshot;
use rankdash_core::Dashboard;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

/// Summary cards, per-platform chart series and the keyword table.
///
/// Never fails: an upstream failure renders as an empty dashboard.
pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Dashboard>> {
    let snapshot = load_snapshot(&state.client).await;

    Json(ApiResponse {
        data: snapshot.dashboard(),
        meta: ResponseMeta::new(req_id.0),
    })
}
