//! Swap request route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    accept_swap, cancel_swap, complete_swap, create_swap, list_incoming, list_outgoing,
    reject_swap,
};
use crate::state::AppState;

pub fn swap_routes() -> Router<AppState> {
    Router::new()
        .route("/api/swaps", post(create_swap))
        .route("/api/swaps/incoming", get(list_incoming))
        .route("/api/swaps/outgoing", get(list_outgoing))
        .route("/api/swaps/:id/accept", post(accept_swap))
        .route("/api/swaps/:id/reject", post(reject_swap))
        .route("/api/swaps/:id/cancel", post(cancel_swap))
        .route("/api/swaps/:id/complete", post(complete_swap))
}
