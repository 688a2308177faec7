use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::features::FeatureState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::commands::{produce, ProduceFileCommand, ProduceFileError};

pub fn produce_routes() -> Router<FeatureState> {
    Router::new().route("/files/:filename/produce", post(produce_file))
}

#[tracing::instrument(skip(state), fields(filename = %filename))]
async fn produce_file(
    State(state): State<FeatureState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let response = produce::handle(
        &state.uploads,
        state.ingestor.as_ref(),
        ProduceFileCommand {
            file_name: filename,
        },
    )
    .await?;

    Ok(Json(ApiResponse::success(response)).into_response())
}

impl From<ProduceFileError> for AppError {
    fn from(err: ProduceFileError) -> Self {
        match err {
            ProduceFileError::NotFound(name) => {
                AppError::NotFound(format!("File not found: {}", name))
            },
            ProduceFileError::Storage(source) => AppError::Io(source),
        }
    }
}
