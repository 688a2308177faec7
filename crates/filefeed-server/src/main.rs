//! Filefeed Server - Main entry point

use anyhow::Result;
use filefeed_common::logging::{init_logging, LogConfig};
use filefeed_ingest::{BrokerDiscovery, FileIngest, Ingestor, KafkaPublisher, ZkDiscovery};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing::info;

use filefeed_server::{app::app, config::Config, features::FeatureState, uploads::UploadStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::builder()
        .log_file_prefix("filefeed-server".to_string())
        .filter_directives("filefeed_server=debug,tower_http=debug,axum=trace".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    info!("Starting Filefeed Server");

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    // Bootstrap the upload directory
    let uploads = UploadStore::new(
        config.uploads.dir.clone(),
        config.uploads.allowed_extensions.clone(),
    );
    uploads.ensure_dir().await?;
    info!(dir = %config.uploads.dir.display(), "Upload directory ready");

    // Wire the pipeline: ZooKeeper discovery feeding a fully acknowledged
    // Kafka producer, both behind their seams
    let discovery: Arc<dyn BrokerDiscovery> =
        Arc::new(ZkDiscovery::new(config.zookeeper.hosts.clone()));
    let publisher =
        KafkaPublisher::with_send_timeout(Duration::from_secs(config.kafka.send_timeout_secs));
    let ingestor: Arc<dyn FileIngest> = Arc::new(Ingestor::new(
        ZkDiscovery::new(config.zookeeper.hosts.clone()),
        publisher,
        config.kafka.topic.clone(),
    ));
    info!(
        zk_hosts = %config.zookeeper.hosts,
        topic = %config.kafka.topic,
        "Ingestion pipeline initialized"
    );

    // Create application state and router
    let state = FeatureState {
        uploads,
        ingestor,
        discovery,
    };
    let router = app(state, &config);

    // Create socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start server with graceful shutdown
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give ongoing requests time to complete
    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
