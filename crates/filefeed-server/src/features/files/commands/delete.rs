use crate::uploads::UploadStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFileCommand {
    pub file_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteFileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

#[tracing::instrument(skip(store, command), fields(file_name = %command.file_name))]
pub async fn handle(
    store: &UploadStore,
    command: DeleteFileCommand,
) -> Result<(), DeleteFileError> {
    let Some(path) = store.resolve(&command.file_name) else {
        return Err(DeleteFileError::NotFound(command.file_name));
    };

    if !store.remove(&path).await? {
        return Err(DeleteFileError::NotFound(command.file_name));
    }

    tracing::info!(file_name = %command.file_name, "File deleted");
    Ok(())
}
