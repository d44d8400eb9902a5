//! Search route definitions

use axum::{routing::get, Router};

use crate::handlers::search_profiles;
use crate::state::AppState;

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/api/search", get(search_profiles))
}
