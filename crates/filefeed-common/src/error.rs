//! Error types for filefeed

use thiserror::Error;

/// Result type alias for filefeed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Main error type for filefeed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Broker discovery error: {0}")]
    Discovery(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
