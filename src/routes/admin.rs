//! Admin route definitions

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{
    ban_user, create_announcement, delete_announcement, export_snapshot, export_swaps_csv,
    export_users_csv, list_swaps, list_users, unban_user,
};
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:id/ban", post(ban_user))
        .route("/api/admin/users/:id/unban", post(unban_user))
        .route("/api/admin/swaps", get(list_swaps))
        .route("/api/admin/announcements", post(create_announcement))
        .route("/api/admin/announcements/:id", delete(delete_announcement))
        .route("/api/admin/export", get(export_snapshot))
        .route("/api/admin/export/users.csv", get(export_users_csv))
        .route("/api/admin/export/swaps.csv", get(export_swaps_csv))
}
