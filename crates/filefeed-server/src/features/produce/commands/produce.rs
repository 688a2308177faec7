use crate::uploads::UploadStore;
use filefeed_ingest::FileIngest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProduceFileCommand {
    pub file_name: String,
}

/// Outcome of one produce attempt. A resolved-but-failed pipeline is an
/// outcome, not an HTTP error; only a file that was never uploaded is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProduceFileResponse {
    pub produce_success: bool,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProduceFileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

#[tracing::instrument(skip(store, ingestor, command), fields(file_name = %command.file_name))]
pub async fn handle(
    store: &UploadStore,
    ingestor: &dyn FileIngest,
    command: ProduceFileCommand,
) -> Result<ProduceFileResponse, ProduceFileError> {
    let Some(path) = store.resolve(&command.file_name) else {
        return Err(ProduceFileError::NotFound(command.file_name));
    };

    if !tokio::fs::try_exists(&path).await? {
        return Err(ProduceFileError::NotFound(command.file_name));
    }

    let outcome = ingestor.ingest_file(&path).await;

    Ok(ProduceFileResponse {
        produce_success: outcome.success,
        message: outcome.message,
    })
}
