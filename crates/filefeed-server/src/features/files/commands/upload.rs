use crate::uploads::{SavedUpload, UploadStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFileCommand {
    pub file_name: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadFileError {
    #[error("A file name is required")]
    FileNameRequired,
    #[error("File name must not exceed 255 characters")]
    FileNameLength,
    #[error("Only support extensions: {allowed}")]
    UnsupportedExtension { allowed: String },
    #[error("File content is required and cannot be empty")]
    ContentRequired,
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl UploadFileCommand {
    pub fn validate(&self, store: &UploadStore) -> Result<(), UploadFileError> {
        if self.file_name.trim().is_empty() {
            return Err(UploadFileError::FileNameRequired);
        }
        if self.file_name.len() > 255 {
            return Err(UploadFileError::FileNameLength);
        }
        if !store.extension_allowed(&self.file_name) {
            return Err(UploadFileError::UnsupportedExtension {
                allowed: store.allowed_extensions_upper(),
            });
        }
        if self.content.is_empty() {
            return Err(UploadFileError::ContentRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(store, command), fields(file_name = %command.file_name))]
pub async fn handle(
    store: &UploadStore,
    command: UploadFileCommand,
) -> Result<SavedUpload, UploadFileError> {
    command.validate(store)?;

    let saved = store.save(&command.file_name, &command.content).await?;

    tracing::info!(
        stored_as = %saved.file_name,
        size = saved.size,
        checksum = %saved.checksum,
        "File uploaded"
    );

    Ok(saved)
}
