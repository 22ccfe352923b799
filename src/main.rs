//! Chat Backend
//!
//! A REST API server for a conversational chat application. Persists chat
//! sessions and messages, relays conversation history to upstream LLM
//! providers, and returns assistant responses to the browser client.

mod api;
mod config;
mod error;
mod orchestrator;
mod providers;
mod storage;

use api::utils::RouterState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use config::Config;
use orchestrator::Orchestrator;
use providers::ProviderAdapter;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use storage::{MemStorage, Storage};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Configuration loaded: {:?}", config.server);

    // The upload directory must exist before the first request; failing
    // here is a configuration-time error and intentionally fatal
    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to create upload directory {}: {}",
                config.uploads.dir,
                e
            )
        })?;

    // Wire up the store, provider adapter, and orchestrator explicitly;
    // all state is constructed here and injected into the handlers
    let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
    let provider_adapter = ProviderAdapter::new(&config.providers);
    let orchestrator = Arc::new(Orchestrator::new(storage.clone(), provider_adapter));
    let router_state: RouterState = (storage, orchestrator, config.clone());

    // Multipart bodies may carry up to five files of ten MiB each
    let upload_body_limit = config.uploads.max_files * config.uploads.max_file_bytes
        + 1024 * 1024;

    // Build our application with routes
    let app = Router::new()
        // Health check and hello world
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        // Session management API
        .route(
            "/api/sessions",
            get(api::sessions::list_sessions).post(api::sessions::create_session),
        )
        .route(
            "/api/sessions/:id",
            get(api::sessions::get_session)
                .patch(api::sessions::update_session)
                .delete(api::sessions::delete_session),
        )
        // Message API
        .route(
            "/api/sessions/:id/messages",
            get(api::messages::list_messages).post(api::messages::send_message),
        )
        .route("/api/messages/:id", delete(api::messages::delete_message))
        // File upload API
        .route(
            "/api/upload",
            post(api::upload::upload_files).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(router_state);

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("🚀 Server running on http://{}", addr);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from Chat Backend!".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
