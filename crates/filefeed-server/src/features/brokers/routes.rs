use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::features::FeatureState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use filefeed_ingest::BROKER_LOOKUP_FAILED;

use super::queries::bootstrap;

pub fn brokers_routes() -> Router<FeatureState> {
    Router::new().route("/brokers/bootstrap", get(bootstrap_broker))
}

#[tracing::instrument(skip(state))]
async fn bootstrap_broker(State(state): State<FeatureState>) -> Result<Response, AppError> {
    match bootstrap::handle(state.discovery.as_ref()).await {
        Some(response) => Ok(Json(ApiResponse::success(response)).into_response()),
        None => Err(AppError::NotFound(BROKER_LOOKUP_FAILED.to_string())),
    }
}
