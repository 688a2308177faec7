//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 5001;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default upload directory.
pub const DEFAULT_UPLOAD_DIR: &str = "./data";

/// Default maximum upload size in bytes (64 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Extensions accepted for upload, comma-separated.
pub const DEFAULT_ALLOWED_EXTENSIONS: &str = "txt,csv,json";

/// Default ZooKeeper connection string.
pub const DEFAULT_ZK_HOSTS: &str = "localhost:2181";

/// Default destination topic.
pub const DEFAULT_KAFKA_TOPIC: &str = "_schema";

/// Default per-message delivery timeout in seconds.
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub uploads: UploadConfig,
    pub zookeeper: ZkConfig,
    pub kafka: KafkaConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Upload directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_upload_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

/// ZooKeeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZkConfig {
    pub hosts: String,
}

/// Kafka producer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    pub topic: String,
    pub send_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("FEED_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: std::env::var("FEED_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: std::env::var("FEED_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            uploads: UploadConfig {
                dir: PathBuf::from(
                    std::env::var("FEED_UPLOAD_DIR")
                        .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
                ),
                max_upload_bytes: std::env::var("FEED_MAX_UPLOAD_BYTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
                allowed_extensions: std::env::var("FEED_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string())
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            zookeeper: ZkConfig {
                hosts: std::env::var("ZK_HOSTS").unwrap_or_else(|_| DEFAULT_ZK_HOSTS.to_string()),
            },
            kafka: KafkaConfig {
                topic: std::env::var("KAFKA_TOPIC")
                    .unwrap_or_else(|_| DEFAULT_KAFKA_TOPIC.to_string()),
                send_timeout_secs: std::env::var("FEED_SEND_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SEND_TIMEOUT_SECS),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                allow_credentials: std::env::var("CORS_ALLOW_CREDENTIALS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.uploads.dir.as_os_str().is_empty() {
            anyhow::bail!("Upload directory cannot be empty");
        }

        if self.uploads.max_upload_bytes == 0 {
            anyhow::bail!("Maximum upload size must be greater than 0");
        }

        if self.uploads.allowed_extensions.is_empty() {
            anyhow::bail!("At least one upload extension must be allowed");
        }

        if self.zookeeper.hosts.trim().is_empty() {
            anyhow::bail!("ZooKeeper host list cannot be empty");
        }

        if self.kafka.topic.trim().is_empty() {
            anyhow::bail!("Kafka topic cannot be empty");
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            uploads: UploadConfig {
                dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                    .split(',')
                    .map(str::to_string)
                    .collect(),
            },
            zookeeper: ZkConfig {
                hosts: DEFAULT_ZK_HOSTS.to_string(),
            },
            kafka: KafkaConfig {
                topic: DEFAULT_KAFKA_TOPIC.to_string(),
                send_timeout_secs: DEFAULT_SEND_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
        }
    }
}
