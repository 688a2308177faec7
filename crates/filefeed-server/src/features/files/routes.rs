use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::features::FeatureState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post},
    Json, Router,
};
use serde::Serialize;

use super::commands::{
    delete as delete_cmd, upload, DeleteFileCommand, DeleteFileError, UploadFileCommand,
    UploadFileError,
};
use super::queries::list;

pub fn files_routes() -> Router<FeatureState> {
    Router::new()
        .route("/files", post(upload_file).get(list_files))
        .route("/files/:filename", delete(delete_file))
}

/// Body of a successful upload; mirrors the upload-then-produce flow, so
/// both steps report their own outcome.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_success: bool,
    pub produce_success: bool,
    pub message: String,
    pub file_name: String,
    pub size: u64,
    pub checksum: String,
}

#[tracing::instrument(skip(state, multipart))]
async fn upload_file(
    State(state): State<FeatureState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut file_name: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Failed to read multipart field: {}", err)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|name| name.to_string());
            let data = field.bytes().await.map_err(|err| {
                AppError::BadRequest(format!("Failed to read file bytes: {}", err))
            })?;
            content = Some(data.to_vec());
        }
    }

    let content =
        content.ok_or_else(|| AppError::BadRequest("No file field in multipart data".into()))?;

    let command = UploadFileCommand {
        file_name: file_name.unwrap_or_default(),
        content,
    };

    let saved = upload::handle(&state.uploads, command).await?;

    // The original upload flow produces the file right away; the upload is
    // kept even when producing fails, so it can be replayed later.
    let outcome = state.ingestor.ingest_file(&saved.path).await;

    let response = UploadResponse {
        upload_success: true,
        produce_success: outcome.success,
        message: outcome.message,
        file_name: saved.file_name,
        size: saved.size,
        checksum: saved.checksum,
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state))]
async fn list_files(State(state): State<FeatureState>) -> Result<Response, AppError> {
    let response = list::handle(&state.uploads).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(state), fields(filename = %filename))]
async fn delete_file(
    State(state): State<FeatureState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    delete_cmd::handle(
        &state.uploads,
        DeleteFileCommand {
            file_name: filename.clone(),
        },
    )
    .await?;

    Ok(Json(ApiResponse::success(serde_json::json!({ "deleted": filename }))).into_response())
}

impl From<UploadFileError> for AppError {
    fn from(err: UploadFileError) -> Self {
        match err {
            UploadFileError::Storage(source) => AppError::Io(source),
            validation => AppError::Validation(validation.to_string()),
        }
    }
}

impl From<DeleteFileError> for AppError {
    fn from(err: DeleteFileError) -> Self {
        match err {
            DeleteFileError::NotFound(name) => AppError::NotFound(format!("File not found: {}", name)),
            DeleteFileError::Storage(source) => AppError::Io(source),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error_maps_to_validation() {
        let err = AppError::from(UploadFileError::FileNameRequired);
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_delete_error_maps_to_not_found() {
        let err = AppError::from(DeleteFileError::NotFound("a.txt".to_string()));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
