//! Swap request handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    ApiResponse, CreateSwapRequest, SwapAction, SwapRequest, SwapWithCounterpart,
};
use crate::state::AppState;

/// POST /api/swaps
pub async fn create_swap(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(request): Json<CreateSwapRequest>,
) -> ApiResult<Json<ApiResponse<SwapRequest>>> {
    let swap = app_state
        .swap_service
        .create_request(user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(swap)))
}

/// GET /api/swaps/incoming
pub async fn list_incoming(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<SwapWithCounterpart>>>> {
    let swaps = app_state.swap_service.list_incoming(user.user_id).await?;
    Ok(Json(ApiResponse::ok(swaps)))
}

/// GET /api/swaps/outgoing
pub async fn list_outgoing(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<SwapWithCounterpart>>>> {
    let swaps = app_state.swap_service.list_outgoing(user.user_id).await?;
    Ok(Json(ApiResponse::ok(swaps)))
}

/// POST /api/swaps/:id/accept
pub async fn accept_swap(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<SwapRequest>>> {
    transition(app_state, id, SwapAction::Accept, user).await
}

/// POST /api/swaps/:id/reject
pub async fn reject_swap(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<SwapRequest>>> {
    transition(app_state, id, SwapAction::Reject, user).await
}

/// POST /api/swaps/:id/cancel
pub async fn cancel_swap(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<SwapRequest>>> {
    transition(app_state, id, SwapAction::Cancel, user).await
}

/// POST /api/swaps/:id/complete
pub async fn complete_swap(
    user: AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<SwapRequest>>> {
    transition(app_state, id, SwapAction::MarkComplete, user).await
}

async fn transition(
    app_state: AppState,
    id: Uuid,
    action: SwapAction,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<SwapRequest>>> {
    let swap = app_state
        .swap_service
        .transition(id, action, user.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(swap)))
}
