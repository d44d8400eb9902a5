//! Profile route definitions

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{
    add_skill, get_own_profile, get_public_profile, get_user_feedback, remove_skill,
    set_availability, update_profile,
};
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(get_own_profile))
        .route("/api/profile", patch(update_profile))
        .route("/api/profile/skills", post(add_skill))
        .route("/api/profile/skills", delete(remove_skill))
        .route("/api/profile/availability", put(set_availability))
        .route("/api/users/:id", get(get_public_profile))
        .route("/api/users/:id/feedback", get(get_user_feedback))
}
