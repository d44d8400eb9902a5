//! Search handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::ApiResult;
use crate::middleware::OptionalUser;
use crate::models::{ApiResponse, PublicProfile, SearchQuery};
use crate::state::AppState;

/// GET /api/search
///
/// Free-text and availability filtering over public profiles. A signed-in
/// caller never sees their own profile in the results.
pub async fn search_profiles(
    OptionalUser(user): OptionalUser,
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ApiResponse<Vec<PublicProfile>>>> {
    let acting = user.map(|u| u.user_id);
    let results = app_state.search_service.search(acting, query).await?;
    Ok(Json(ApiResponse::ok(results)))
}
