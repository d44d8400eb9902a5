//! Feedback route definitions

use axum::{routing::post, Router};

use crate::handlers::submit_feedback;
use crate::state::AppState;

pub fn feedback_routes() -> Router<AppState> {
    Router::new().route("/api/feedback", post(submit_feedback))
}
