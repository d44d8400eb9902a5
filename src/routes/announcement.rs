//! Public announcement route definitions

use axum::{routing::get, Router};

use crate::handlers::list_announcements;
use crate::state::AppState;

pub fn announcement_routes() -> Router<AppState> {
    Router::new().route("/api/announcements", get(list_announcements))
}
