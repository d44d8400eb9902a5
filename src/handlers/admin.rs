//! Admin moderation handlers
//!
//! Every route here sits behind the `AdminUser` extractor, which re-checks
//! the admin flag against the store on each request.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AdminUser;
use crate::models::{
    Announcement, ApiResponse, CreateAnnouncementRequest, ExportSnapshot, SwapRequest, UserProfile,
};
use crate::services::admin::{swaps_csv, users_csv};
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<UserProfile>>>> {
    let users = app_state.admin_service.list_users().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/admin/swaps
pub async fn list_swaps(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<SwapRequest>>>> {
    let swaps = app_state.admin_service.list_swaps().await?;
    Ok(Json(ApiResponse::ok(swaps)))
}

/// POST /api/admin/users/:id/ban
pub async fn ban_user(
    AdminUser(admin): AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    app_state.admin_service.ban_user(admin.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/users/:id/unban
pub async fn unban_user(
    AdminUser(admin): AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    app_state
        .admin_service
        .unban_user(admin.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/announcements
pub async fn create_announcement(
    AdminUser(admin): AdminUser,
    State(app_state): State<AppState>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> ApiResult<Json<ApiResponse<Announcement>>> {
    let announcement = app_state
        .admin_service
        .create_announcement(admin.user_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(announcement)))
}

/// DELETE /api/admin/announcements/:id
pub async fn delete_announcement(
    AdminUser(admin): AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    app_state
        .admin_service
        .delete_announcement(admin.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/export
pub async fn export_snapshot(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ExportSnapshot>>> {
    let snapshot = app_state.admin_service.export_snapshot().await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/admin/export/users.csv
pub async fn export_users_csv(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Response> {
    let snapshot = app_state.admin_service.export_snapshot().await?;
    Ok(csv_response("users.csv", users_csv(&snapshot.users)))
}

/// GET /api/admin/export/swaps.csv
pub async fn export_swaps_csv(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
) -> ApiResult<Response> {
    let snapshot = app_state.admin_service.export_snapshot().await?;
    Ok(csv_response("swaps.csv", swaps_csv(&snapshot.swaps)))
}

fn csv_response(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
