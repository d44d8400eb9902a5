//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::services::{AdminService, FeedbackService, ProfileService, SearchService, SwapService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub search_service: Arc<SearchService>,
    pub swap_service: Arc<SwapService>,
    pub feedback_service: Arc<FeedbackService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        profile_service: Arc<ProfileService>,
        search_service: Arc<SearchService>,
        swap_service: Arc<SwapService>,
        feedback_service: Arc<FeedbackService>,
        admin_service: Arc<AdminService>,
    ) -> Self {
        Self {
            auth_service,
            profile_service,
            search_service,
            swap_service,
            feedback_service,
            admin_service,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProfileService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.profile_service.clone()
    }
}

impl FromRef<AppState> for Arc<SearchService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.search_service.clone()
    }
}

impl FromRef<AppState> for Arc<SwapService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.swap_service.clone()
    }
}

impl FromRef<AppState> for Arc<FeedbackService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.feedback_service.clone()
    }
}

impl FromRef<AppState> for Arc<AdminService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.admin_service.clone()
    }
}
