//! Application router assembly

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::features::{self, FeatureState};
use crate::middleware;

/// Create the application router with all routes and middleware
pub fn app(state: FeatureState, config: &Config) -> Router {
    let api_routes = features::router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", api_routes)
        // Apply layers from innermost to outermost
        .layer(DefaultBodyLimit::max(config.uploads.max_upload_bytes))
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(state): State<FeatureState>) -> Result<Response, StatusCode> {
    // The upload directory is the only persistent state; a server that
    // cannot see it cannot serve anything.
    match tokio::fs::metadata(state.uploads.dir()).await {
        Ok(meta) if meta.is_dir() => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "upload_dir": "available"
            })),
        )
            .into_response()),
        _ => {
            tracing::error!(dir = %state.uploads.dir().display(), "upload directory unavailable");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}
