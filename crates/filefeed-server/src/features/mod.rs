//! Feature modules implementing the filefeed API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes:
//!
//! - **files**: upload, list, and delete operations on the upload directory
//! - **produce**: replay an uploaded file to the configured Kafka topic
//! - **brokers**: report the broker currently registered in ZooKeeper
//!
//! Commands are write operations (upload, delete, produce), queries are read
//! operations (list, bootstrap); handlers call them directly.

pub mod brokers;
pub mod files;
pub mod produce;

use axum::Router;
use filefeed_ingest::{BrokerDiscovery, FileIngest};
use std::sync::Arc;

use crate::uploads::UploadStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Upload directory access
    pub uploads: UploadStore,
    /// File-to-Kafka pipeline, behind its seam for testability
    pub ingestor: Arc<dyn FileIngest>,
    /// Broker discovery, behind its seam for testability
    pub discovery: Arc<dyn BrokerDiscovery>,
}

/// Creates the API router with all feature routes mounted
///
/// - `POST   /files` - upload a file and produce it to the topic
/// - `GET    /files` - list uploaded files
/// - `DELETE /files/{filename}` - delete an uploaded file
/// - `POST   /files/{filename}/produce` - replay an uploaded file
/// - `GET    /brokers/bootstrap` - resolved Kafka broker address
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .merge(files::files_routes())
        .merge(produce::produce_routes())
        .merge(brokers::brokers_routes())
        .with_state(state)
}
