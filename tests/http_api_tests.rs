//! End-to-end HTTP tests over the full router with the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use skillswap_backend::auth::AuthService;
use skillswap_backend::config::{Config, Environment, StoreBackend};
use skillswap_backend::routes;
use skillswap_backend::services::{
    AdminService, FeedbackService, ProfileService, SearchService, SwapService,
};
use skillswap_backend::state::AppState;
use skillswap_backend::store::{MemoryStore, Store};

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        store_backend: StoreBackend::Memory,
        environment: Environment::Development,
        port: 3001,
        db_max_connections: 5,
        rate_limit_rps: 100,
        cors_allowed_origins: None,
        log_level: "info".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_session_ttl_hours: 24,
        provider_shared_secret: None,
    }
}

fn build_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let as_store: Arc<dyn Store> = store.clone();

    let profile_service = Arc::new(ProfileService::new(as_store.clone()));
    let auth_service = Arc::new(AuthService::new(profile_service.clone(), &test_config()));
    let app_state = AppState::new(
        auth_service,
        profile_service,
        Arc::new(SearchService::new(as_store.clone())),
        Arc::new(SwapService::new(as_store.clone())),
        Arc::new(FeedbackService::new(as_store.clone())),
        Arc::new(AdminService::new(as_store)),
    );

    (routes::api_router(app_state), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Guest sign-in, returning (token, user_id)
async fn guest_session(app: &Router) -> (String, String) {
    let (status, body) = send(app, post_json("/api/auth/guest", None, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}

#[tokio::test]
async fn guest_sign_in_issues_a_working_session() {
    let (app, _) = build_app();
    let (token, _) = guest_session(&app).await;

    let (status, body) = send(&app, get("/api/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Guest User");
    assert_eq!(body["data"]["is_admin"], false);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _) = build_app();

    let (status, body) = send(&app, get("/api/profile", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");

    let (status, _) = send(&app, get("/api/profile", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn swap_lifecycle_over_http() {
    let (app, _) = build_app();
    let (ann_token, _) = guest_session(&app).await;
    let (ben_token, ben_id) = guest_session(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/swaps",
            Some(&ann_token),
            json!({
                "to_user_id": ben_id,
                "skills_offered": ["Guitar"],
                "skills_requested": ["Cooking"],
                "message": "Trade?"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    let swap_id = body["data"]["id"].as_str().unwrap().to_string();

    // Sender cannot accept their own request
    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/swaps/{}/accept", swap_id),
            Some(&ann_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/swaps/{}/accept", swap_id),
            Some(&ben_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "accepted");

    // Cancelling after acceptance is an invalid transition
    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/swaps/{}/cancel", swap_id),
            Some(&ann_token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    // The incoming listing joins the counterpart
    let (status, body) = send(&app, get("/api/swaps/incoming", Some(&ben_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["counterpart"]["name"], "Guest User");
}

#[tokio::test]
async fn feedback_error_taxonomy_over_http() {
    let (app, _) = build_app();
    let (ann_token, _) = guest_session(&app).await;
    let (ben_token, ben_id) = guest_session(&app).await;

    let (_, body) = send(
        &app,
        post_json(
            "/api/swaps",
            Some(&ann_token),
            json!({
                "to_user_id": ben_id,
                "skills_offered": ["Guitar"],
                "skills_requested": ["Cooking"]
            }),
        ),
    )
    .await;
    let swap_id = body["data"]["id"].as_str().unwrap().to_string();
    send(
        &app,
        post_json(
            &format!("/api/swaps/{}/accept", swap_id),
            Some(&ben_token),
            json!({}),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/feedback",
            Some(&ann_token),
            json!({"swap_id": swap_id, "rating": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");

    let (status, body) = send(
        &app,
        post_json(
            "/api/feedback",
            Some(&ann_token),
            json!({"swap_id": swap_id, "rating": 6}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_RATING");

    let (status, body) = send(
        &app,
        post_json(
            "/api/feedback",
            Some(&ann_token),
            json!({"swap_id": swap_id, "rating": 5, "comment": "Great!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], 5);
}

#[tokio::test]
async fn admin_routes_reject_non_admins_and_accept_admins() {
    let (app, store) = build_app();
    let (user_token, _) = guest_session(&app).await;

    let (status, _) = send(&app, get("/api/admin/users", Some(&user_token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Promote a second account directly in the store
    let (admin_token, admin_id) = guest_session(&app).await;
    promote_to_admin(&store, &admin_id).await;

    let (status, body) = send(&app, get("/api/admin/users", Some(&admin_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        post_json(
            "/api/admin/announcements",
            Some(&admin_token),
            json!({"title": "Welcome", "message": "Be kind."}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let announcement_id = body["data"]["id"].as_str().unwrap().to_string();

    // Announcements are publicly listable
    let (status, body) = send(&app, get("/api/announcements", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], announcement_id.as_str());
}

#[tokio::test]
async fn search_is_open_and_excludes_the_caller() {
    let (app, _) = build_app();
    let (ann_token, _) = guest_session(&app).await;
    let (_, _) = guest_session(&app).await;

    let (status, body) = send(&app, get("/api/search", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/api/search", Some(&ann_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/api/search?availability=Holidays", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

/// Flip the stored admin flag; there is no API surface for this.
async fn promote_to_admin(store: &MemoryStore, user_id: &str) {
    let id = uuid::Uuid::parse_str(user_id).unwrap();
    store.set_admin(id, true).await.unwrap();
}
