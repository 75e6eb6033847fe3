//! Application startup and lifecycle management.

use crate::config::RecipeConfig;
use crate::handlers::{health, recipes, video};
use crate::services::{Database, EdamamClient, RecipeSource};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::genai::invoker::TextGenerator;
use service_core::genai::veo::{VeoClient, VeoConfig};
use service_core::genai::video::VideoGenerator;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RecipeConfig,
    pub db: Database,
    pub generator: Arc<TextGenerator>,
    pub video: Arc<VideoGenerator>,
    pub source: Arc<dyn RecipeSource>,
}

/// Build the service router on top of the given state.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/generate-recipes", post(recipes::generate_recipes))
        .route("/recipe-requests", get(recipes::recent_requests))
        .route("/generate-video", post(video::generate_video))
        .route("/videos", get(video::list_videos));

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RecipeConfig) -> Result<Self, AppError> {
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        db.run_migrations().await?;

        let generator = Arc::new(TextGenerator::from_settings(&config.genai)?);

        let veo = VeoClient::new(
            VeoConfig {
                model: config.video.model.clone(),
                api_base: config.genai.api_base.clone(),
            },
            config.genai.primary_key()?,
        );
        let video =
            Arc::new(VideoGenerator::new(Arc::new(veo)).with_poll_interval(config.video.poll_interval));

        let source = Arc::new(EdamamClient::new(config.edamam.clone()));

        Self::with_state(AppState {
            config,
            db,
            generator,
            video,
            source,
        })
        .await
    }

    /// Build around pre-constructed state (used by tests to inject mock
    /// backends).
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("recipe-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = app_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
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
