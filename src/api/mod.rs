//! HTTP surface: extraction endpoint, artifact serving, health check.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::pipeline::ExtractionPipeline;

pub mod handlers;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ExtractionPipeline>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pipeline: Arc<ExtractionPipeline>, config: Arc<Config>) -> Self {
        Self { pipeline, config }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let artifacts = ServeDir::new(&state.config.storage.downloads_dir);

    Router::new()
        .route(
            "/api/process_video_details",
            get(handlers::process_video_details),
        )
        .route("/health", get(handlers::health_check))
        .nest_service("/files", artifacts)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
