//! Profile handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::{AuthenticatedUser, OptionalUser};
use crate::models::{
    ApiResponse, Feedback, PublicProfile, SetAvailabilityRequest, SkillEditRequest,
    UpdateProfileRequest, UserProfile,
};
use crate::state::AppState;

/// GET /api/profile
pub async fn get_own_profile(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = app_state
        .profile_service
        .get_own_profile(user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PATCH /api/profile
pub async fn update_profile(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = app_state
        .profile_service
        .update_profile(user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// POST /api/profile/skills
pub async fn add_skill(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(request): Json<SkillEditRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = app_state
        .profile_service
        .add_skill(user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// DELETE /api/profile/skills
pub async fn remove_skill(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(request): Json<SkillEditRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = app_state
        .profile_service
        .remove_skill(user.user_id, request.kind, &request.skill)
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/profile/availability
pub async fn set_availability(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(request): Json<SetAvailabilityRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = app_state
        .profile_service
        .set_availability(user.user_id, request.availability)
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// GET /api/users/:id
pub async fn get_public_profile(
    OptionalUser(user): OptionalUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<PublicProfile>>> {
    let acting = user.map(|u| u.user_id);
    let profile = app_state
        .profile_service
        .get_public_profile(acting, id)
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// GET /api/users/:id/feedback
pub async fn get_user_feedback(
    OptionalUser(user): OptionalUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<Feedback>>>> {
    // Feedback is only visible where the profile itself is
    let acting = user.map(|u| u.user_id);
    app_state
        .profile_service
        .get_public_profile(acting, id)
        .await?;
    let feedback = app_state.profile_service.feedback_for(id).await?;
    Ok(Json(ApiResponse::ok(feedback)))
}
