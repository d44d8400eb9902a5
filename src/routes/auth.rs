//! Authentication route definitions

use axum::{routing::post, Router};

use crate::handlers::{sign_in_guest, sign_in_provider};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/guest", post(sign_in_guest))
        .route("/api/auth/provider", post(sign_in_provider))
}
