//! Application startup and lifecycle management.

use crate::config::{StorageBackend, TourConfig};
use crate::handlers;
use crate::models::RouteOptions;
use crate::services::persistence::ArtifactPersister;
use crate::services::pipeline::TourPipeline;
use crate::services::providers::huggingface::{HuggingFaceConfig, HuggingFaceProvider};
use crate::services::providers::TextProvider;
use crate::services::routing::{GoogleRoutesClient, GoogleRoutesConfig, RouteProvider};
use crate::services::{ArtifactStore, BlobStorage, LocalStorage, PgArtifactStore, Storage};
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, RequestId,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Largest accepted request body (uploads included).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TourPipeline>,
    /// Directory served at `/files` when the local storage backend is used.
    pub files_dir: Option<PathBuf>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/generate-kml", post(handlers::generate_kml))
        .route("/api/kml/upload", post(handlers::upload_kml));

    if let Some(dir) = &state.files_dir {
        router = router.nest_service("/files", ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Id set by `request_id_middleware`, which runs outside the trace layer.
fn request_id_of<B>(request: &axum::http::Request<B>) -> &str {
    request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.as_str())
        .unwrap_or("-")
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: TourConfig) -> Result<Self, AppError> {
        let store = PgArtifactStore::connect(
            config.database.url.expose_secret(),
            config.database.max_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            e
        })?;
        store.run_migrations().await?;

        let (storage, files_dir): (Arc<dyn Storage>, Option<PathBuf>) =
            match config.storage.backend {
                StorageBackend::Local => {
                    let local = LocalStorage::new(
                        &config.storage.local_path,
                        &config.storage.public_base_url,
                    )
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            "Failed to initialize local storage at {}: {}",
                            config.storage.local_path,
                            e
                        );
                        e
                    })?;
                    let dir = local.base_path().to_path_buf();
                    (Arc::new(local) as Arc<dyn Storage>, Some(dir))
                }
                StorageBackend::Blob => {
                    let token = config.storage.blob_token.clone().ok_or_else(|| {
                        AppError::ConfigError(anyhow::anyhow!("BLOB_READ_WRITE_TOKEN is not set"))
                    })?;
                    let blob: Arc<dyn Storage> =
                        Arc::new(BlobStorage::new(&config.storage.blob_api_url, token));
                    (blob, None)
                }
            };
        tracing::info!(backend = ?config.storage.backend, "Initialized storage");

        let text_provider: Arc<dyn TextProvider> =
            Arc::new(HuggingFaceProvider::new(HuggingFaceConfig {
                api_url: config.genai.api_url.clone(),
                api_key: config.genai.api_key.clone(),
                model: config.genai.model.clone(),
                timeout: Duration::from_secs(config.genai.timeout_secs),
            })?);
        tracing::info!(model = %config.genai.model, "Initialized text provider");

        let route_provider: Arc<dyn RouteProvider> =
            Arc::new(GoogleRoutesClient::new(GoogleRoutesConfig {
                api_url: config.routes.api_url.clone(),
                api_key: config.routes.api_key.clone(),
                timeout: Duration::from_secs(30),
            })?);

        let artifacts: Arc<dyn ArtifactStore> = Arc::new(store);
        let pipeline = TourPipeline::new(
            text_provider,
            route_provider,
            ArtifactPersister::new(storage, artifacts),
            config.pipeline.clone(),
            RouteOptions {
                language_code: config.routes.language_code.clone(),
                units: config.routes.units,
            },
        );

        let state = AppState {
            pipeline: Arc::new(pipeline),
            files_dir,
        };
        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
