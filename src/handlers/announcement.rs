//! Public announcement handlers

use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::models::{Announcement, ApiResponse};
use crate::state::AppState;

/// GET /api/announcements
///
/// Public, newest first; the banner on every page reads from here.
pub async fn list_announcements(
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Announcement>>>> {
    let announcements = app_state.admin_service.list_announcements().await?;
    Ok(Json(ApiResponse::ok(announcements)))
}
