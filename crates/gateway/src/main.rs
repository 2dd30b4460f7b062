//! Quillpress API Gateway
//!
//! The main entry point for all external API requests.
//! Handles:
//! - Authentication and authorization
//! - Rate limiting
//! - Request routing
//! - The moderation workflow surface
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use quillpress_common::{config::AppConfig, db::DbPool, metrics};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.observability.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting Quillpress API Gateway v{}", quillpress_common::VERSION);

    let config = Arc::new(config);

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port > 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .set_buckets_for_metric(
                metrics_exporter_prometheus::Matcher::Full(format!(
                    "{}_request_duration_seconds",
                    metrics::METRICS_PREFIX
                )),
                metrics::LATENCY_BUCKETS,
            )?
            .install()?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }

    // Run schema migrations on the primary before the pool comes up
    info!("Running database migrations...");
    let migration_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("../../migrations").run(&migration_pool).await?;
    migration_pool.close().await;

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Global rate limiter
    let limiter = middleware::rate_limit::create_rate_limiter(
        state.config.rate_limit.requests_per_second,
        state.config.rate_limit.burst,
    );
    let rate_limit_enabled = state.config.rate_limit.enabled;
    let limit = state.config.rate_limit.requests_per_second;

    // API routes
    let api_routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        // Auth endpoints
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Article listings
        .route("/articles", get(handlers::articles::list_articles))
        .route("/articles", post(handlers::articles::create_article))
        .route("/articles/popular", get(handlers::articles::popular_articles))
        .route("/articles/favorites", get(handlers::articles::favorite_articles))
        .route("/articles/{id}", get(handlers::articles::article_detail))
        .route("/articles/{id}/update", post(handlers::articles::update_article))
        .route("/articles/{id}/delete", post(handlers::articles::delete_article))
        // Categories
        .route("/categories", get(handlers::categories::list_categories))
        .route("/categories", post(handlers::categories::create_category))
        .route(
            "/categories/{slug}/articles",
            get(handlers::articles::articles_by_category),
        )
        // Authors
        .route("/authors", get(handlers::articles::list_authors))
        .route("/authors/{id}/articles", get(handlers::articles::articles_by_author))
        // Interactions
        .route("/articles/{id}/like", post(handlers::interactions::like_article))
        .route("/articles/{id}/dislike", post(handlers::interactions::dislike_article))
        .route("/articles/{id}/bookmark", post(handlers::interactions::bookmark_article))
        .route("/articles/{id}/rate", post(handlers::interactions::rate_article))
        .route("/articles/{id}/comments", post(handlers::interactions::add_comment))
        // Publication review
        .route("/articles/{id}/approve", post(handlers::moderation::approve_article))
        .route("/articles/{id}/reject", post(handlers::moderation::reject_article))
        // Admin panel and moderation requests
        .route("/admin/panel", get(handlers::moderation::admin_panel))
        .route(
            "/admin/edit-requests/{id}/approve",
            post(handlers::moderation::approve_edit_request),
        )
        .route(
            "/admin/edit-requests/{id}/reject",
            post(handlers::moderation::reject_edit_request),
        )
        .route(
            "/admin/delete-requests/{id}/approve",
            post(handlers::moderation::approve_delete_request),
        )
        .route(
            "/admin/delete-requests/{id}/reject",
            post(handlers::moderation::reject_delete_request),
        )
        // User management
        .route("/admin/users", get(handlers::users::manage_users))
        .route("/admin/users/{id}/assign-admin", post(handlers::users::assign_admin))
        .route("/admin/users/{id}/remove-admin", post(handlers::users::remove_admin))
        .route("/admin/users/ban", post(handlers::users::ban_users))
        // Profile
        .route("/profile", get(handlers::profile::profile));

    // Compose the app
    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::actor::resolve_actor,
        ));

    if rate_limit_enabled {
        app = app.layer(axum::middleware::from_fn(move |request, next| {
            let limiter = limiter.clone();
            async move {
                middleware::rate_limit::rate_limit_middleware(request, next, limiter, limit).await
            }
        }));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
