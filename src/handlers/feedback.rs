//! Feedback handlers

use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::models::{ApiResponse, Feedback, SubmitFeedbackRequest};
use crate::state::AppState;

/// POST /api/feedback
pub async fn submit_feedback(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> ApiResult<Json<ApiResponse<Feedback>>> {
    let feedback = app_state
        .feedback_service
        .submit(user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(feedback)))
}
