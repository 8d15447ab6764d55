//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Request timeouts
//! - Health check endpoint
//! - CORS restricted to the configured client origins

use crate::api::handlers::AppState;
use crate::api::middleware::{
    security_headers_middleware, trace_id_middleware, SecurityHeadersConfig, TRACE_ID_HEADER,
};
use crate::api::routes::build_api_routes;
use crate::core::config::{SecurityConfig, ServerConfig};
use crate::core::error::InventoryError;
use crate::core::Config;
use crate::db::manager::DatabaseManager;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: &Config, db: Arc<DatabaseManager>) -> Self {
        Self::with_state(config, AppState::new(db, &config.security))
    }

    /// Create a server around already wired application state
    pub fn with_state(config: &Config, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
            config: config.server.clone(),
        }
    }

    /// Build the Axum router with all routes and middleware
    pub fn build_router(config: &Config, state: AppState) -> Router {
        let security_headers = SecurityHeadersConfig::from(&config.security);

        Router::new()
            .route("/health", get(health_check))
            .merge(build_api_routes(state))
            .fallback(route_not_found)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(Self::build_cors_layer(&config.security))
                    .layer(middleware::from_fn(trace_id_middleware))
                    .layer(middleware::from_fn_with_state(
                        security_headers,
                        security_headers_middleware,
                    ))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout,
                    ))),
            )
    }

    /// Build CORS layer from allowed origins configuration
    fn build_cors_layer(security: &SecurityConfig) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .expose_headers([HeaderName::from_static("x-trace-id")]);

        if security.allowed_origins.iter().any(|o| o == "*") {
            return cors.allow_origin(Any).allow_headers(Any);
        }

        let origins: Vec<HeaderValue> = security
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        cors.allow_origin(AllowOrigin::list(origins))
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            request_timeout = self.config.request_timeout,
            trace_header = TRACE_ID_HEADER,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Consume the server, returning its router
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

async fn route_not_found() -> InventoryError {
    InventoryError::NotFound("Ruta no encontrada.".to_string())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
