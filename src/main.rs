//! SkillSwap Backend Server
//!
//! HTTP API for the skill swap marketplace: authentication, profiles,
//! search, the swap request lifecycle, feedback and admin moderation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use skillswap_backend::auth::AuthService;
use skillswap_backend::config::{Config, StoreBackend};
use skillswap_backend::db;
use skillswap_backend::middleware::{self, RateLimiter};
use skillswap_backend::routes;
use skillswap_backend::services::{
    AdminService, FeedbackService, ProfileService, SearchService, SwapService,
};
use skillswap_backend::state::AppState;
use skillswap_backend::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(
        environment = config.environment.as_str(),
        port = config.port,
        "Starting SkillSwap backend"
    );

    // Select the store backend
    let (store, db_pool): (Arc<dyn Store>, Option<sqlx::PgPool>) = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = match db::create_pool(&config).await {
                Ok(p) => p,
                Err(e) => {
                    tracing::error!("Database setup failed: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = db::run_migrations(&pool).await {
                tracing::error!("Migration failed: {}", e);
                std::process::exit(1);
            }
            (Arc::new(PgStore::new(pool.clone())), Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            (Arc::new(MemoryStore::new()), None)
        }
    };

    // Wire up the services
    let profile_service = Arc::new(ProfileService::new(store.clone()));
    let search_service = Arc::new(SearchService::new(store.clone()));
    let swap_service = Arc::new(SwapService::new(store.clone()));
    let feedback_service = Arc::new(FeedbackService::new(store.clone()));
    let admin_service = Arc::new(AdminService::new(store.clone()));
    let auth_service = Arc::new(AuthService::new(profile_service.clone(), &config));

    let app_state = AppState::new(
        auth_service,
        profile_service,
        search_service,
        swap_service,
        feedback_service,
        admin_service,
    );

    // Rate limiter with a periodic sweep of idle client buckets
    let rate_limiter = RateLimiter::new(config.rate_limit_rps);
    let sweeper = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            sweeper.cleanup(Duration::from_secs(600)).await;
        }
    });

    let health_pool = db_pool.clone();
    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_pool.clone())))
        .merge(routes::api_router(app_state))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(axum::middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            middleware::rate_limit_layer(limiter)(req, next)
        }))
        .layer(configure_cors(&config));

    if config.environment.is_production() {
        app = app.layer(axum::middleware::from_fn(middleware::hsts_header));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn root() -> &'static str {
    "SkillSwap API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    store: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: Option<sqlx::PgPool>) -> axum::Json<HealthResponse> {
    let store_status = match &pool {
        Some(pool) => match db::check_health(pool).await {
            Ok(()) => "connected".to_string(),
            Err(e) => format!("error: {}", e),
        },
        None => "memory".to_string(),
    };

    let status = if store_status.starts_with("error") {
        "unhealthy"
    } else {
        "healthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        store: store_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let Some(allowed) = config
        .cors_allowed_origins
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
