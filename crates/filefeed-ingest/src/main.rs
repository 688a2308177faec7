//! Filefeed Ingest - command-line ingestion tool

use anyhow::Result;
use clap::Parser;
use filefeed_common::logging::{init_logging, LogConfig, LogLevel};
use filefeed_ingest::{BrokerDiscovery, Ingestor, KafkaPublisher, ZkDiscovery};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "filefeed-ingest")]
#[command(author, version, about = "Produce uploaded files to Kafka")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Resolve a broker and produce one file's contents to a topic
    Produce {
        /// Path of the file to produce
        file: PathBuf,

        /// Destination topic
        #[arg(short, long, env = "KAFKA_TOPIC", default_value = "_schema")]
        topic: String,

        /// ZooKeeper connection string
        #[arg(long, env = "ZK_HOSTS", default_value = "localhost:2181")]
        zk_hosts: String,
    },

    /// Print the bootstrap broker currently registered in ZooKeeper
    Bootstrap {
        /// ZooKeeper connection string
        #[arg(long, env = "ZK_HOSTS", default_value = "localhost:2181")]
        zk_hosts: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("filefeed-ingest".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    match cli.command {
        Command::Produce {
            file,
            topic,
            zk_hosts,
        } => {
            info!(file = %file.display(), topic, "producing file");
            let ingestor = Ingestor::new(ZkDiscovery::new(zk_hosts), KafkaPublisher::new(), topic);
            let outcome = ingestor.ingest_file(&file).await;
            if !outcome.success {
                anyhow::bail!("{}", outcome.message);
            }
            info!("{}", outcome.message);
        },
        Command::Bootstrap { zk_hosts } => {
            let discovery = ZkDiscovery::new(zk_hosts);
            match discovery.resolve_broker().await {
                Some(address) => println!("{}", address),
                None => anyhow::bail!("{}", filefeed_ingest::BROKER_LOOKUP_FAILED),
            }
        },
    }

    Ok(())
}
