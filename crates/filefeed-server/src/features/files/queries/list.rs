use crate::uploads::UploadStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub files: Vec<String>,
}

#[tracing::instrument(skip(store))]
pub async fn handle(store: &UploadStore) -> std::io::Result<ListFilesResponse> {
    let files = store.list().await?;
    Ok(ListFilesResponse { files })
}
