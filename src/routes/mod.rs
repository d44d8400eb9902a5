//! Route definitions for the SkillSwap API

mod admin;
mod announcement;
mod auth;
mod feedback;
mod profile;
mod search;
mod swap;

pub use admin::admin_routes;
pub use announcement::announcement_routes;
pub use auth::auth_routes;
pub use feedback::feedback_routes;
pub use profile::profile_routes;
pub use search::search_routes;
pub use swap::swap_routes;

use axum::Router;

use crate::state::AppState;

/// The full API surface with state applied; middleware layers are added by
/// the binary (and skipped by the integration tests).
pub fn api_router(app_state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(search_routes())
        .merge(swap_routes())
        .merge(feedback_routes())
        .merge(announcement_routes())
        .merge(admin_routes())
        .with_state(app_state)
}
