//! Application startup and lifecycle management.

use crate::config::AssignmentConfig;
use crate::handlers;
use crate::services::Collaborators;
use axum::extract::DefaultBodyLimit;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AssignmentConfig,
    pub collaborators: Collaborators,
}

/// Any origin, method and header, with credentials. The request's own values
/// are mirrored back because `*` is not allowed together with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.uploads.max_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/", post(handlers::process_question))
        .route("/debug/:function_name", post(handlers::debug_function))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application, choosing collaborators from the configuration.
    pub async fn build(config: AssignmentConfig) -> Result<Self, AppError> {
        let collaborators = Collaborators::from_config(&config)?;
        Self::build_with(config, collaborators).await
    }

    /// Build the application around explicitly supplied collaborators.
    pub async fn build_with(
        config: AssignmentConfig,
        collaborators: Collaborators,
    ) -> Result<Self, AppError> {
        let addr: SocketAddr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            mode = ?config.mode,
            upload_dir = %config.uploads.dir.display(),
            "Assignment service listening on port {}",
            port
        );

        let router = build_router(AppState {
            config,
            collaborators,
        });

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Run until `signal` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
