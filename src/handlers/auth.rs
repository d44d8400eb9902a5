//! Authentication handlers

use axum::{extract::State, http::HeaderMap, Json};

use crate::auth::{ProviderSignInRequest, SessionResponse};
use crate::error::ApiResult;
use crate::models::ApiResponse;
use crate::state::AppState;

/// POST /api/auth/guest
///
/// Anonymous sign-in: seeds a fresh guest profile and returns a session.
pub async fn sign_in_guest(
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let session = app_state.auth_service.sign_in_guest().await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// POST /api/auth/provider
///
/// Sign-in asserted by the external identity provider. The provider's
/// backend authenticates itself with the `X-Provider-Secret` header.
pub async fn sign_in_provider(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProviderSignInRequest>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let presented_secret = headers
        .get("x-provider-secret")
        .and_then(|v| v.to_str().ok());

    let session = app_state
        .auth_service
        .sign_in_provider(presented_secret, request)
        .await?;
    Ok(Json(ApiResponse::ok(session)))
}
