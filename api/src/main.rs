//! EduStack Content Governance API Server
//!
//! Governs user-generated educational content: a moderation state machine,
//! age and region policy evaluators, engagement scoring, and an append-only
//! audit trail. Uses hexagonal (ports & adapters) architecture for clean
//! separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{Notifier, PostgresContentRepository};
use app::{AgePolicy, AnalyticsService, EngagementService, GovernanceService};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub governance_service: Arc<GovernanceService<PostgresContentRepository, Notifier>>,
    pub engagement_service: Arc<EngagementService<PostgresContentRepository>>,
    pub analytics_service: Arc<AnalyticsService<PostgresContentRepository>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,edustack_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting EduStack Content Governance API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    // Create adapters
    let content_repo = Arc::new(PostgresContentRepository::new(db.clone()));
    let notifier = Arc::new(Notifier::from_endpoint(config.notify_webhook_url.clone()));
    if config.notifications_enabled() {
        tracing::info!("Governance event notifications enabled");
    }

    // Create application services
    let governance_service = Arc::new(GovernanceService::new(
        content_repo.clone(),
        notifier.clone(),
        AgePolicy::new(config.content_keyword_denylist.clone()),
    ));
    let engagement_service = Arc::new(EngagementService::new(content_repo.clone()));
    let analytics_service = Arc::new(AnalyticsService::new(content_repo.clone()));

    // Create app state
    let state = AppState {
        governance_service,
        engagement_service,
        analytics_service,
        config: config.clone(),
    };

    // Rate limiting for the high-volume tracking endpoint: 10 req/sec
    // sustained, burst of 30, keyed on the client IP from the socket
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(10)
            .burst_size(30)
            .finish()
            .expect("Failed to build governor config"),
    );

    // Engagement tracking (authenticated + rate limited)
    let tracked_routes = Router::new()
        .route("/content/:id/events", post(handlers::record_event))
        .layer(middleware::from_fn(auth::actor_middleware))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Public read surface
        .route("/content", get(handlers::list_content))
        .route("/content/:id", get(handlers::get_content))
        .route("/content/:id/age-check", get(handlers::check_age))
        .route("/analytics/content", get(handlers::content_analytics))
        .route("/analytics/governance", get(handlers::governance_stats))
        // Merge rate-limited tracking routes
        .merge(tracked_routes)
        // Governance transitions (require a resolved actor)
        .nest(
            "/",
            Router::new()
                .route("/content", post(handlers::create_content))
                .route("/content/:id/submit", post(handlers::submit_for_review))
                .route("/content/:id/review", post(handlers::start_review))
                .route("/content/:id/approve", post(handlers::approve))
                .route("/content/:id/reject", post(handlers::reject))
                .route("/content/:id/publish", post(handlers::publish))
                .route("/content/:id/archive", post(handlers::archive))
                .route("/content/:id/revise", post(handlers::create_revision))
                .route("/content/:id/regions", put(handlers::restrict_regions))
                .layer(middleware::from_fn(auth::actor_middleware)),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
