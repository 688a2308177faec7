//! Ingestion orchestration
//!
//! One linear attempt per call: resolve a broker, parse the file, publish
//! the payloads. Nothing here retries and nothing escapes as an error; every
//! failure is folded into an [`IngestOutcome`] the caller can show to a
//! user.

use crate::discovery::BrokerDiscovery;
use crate::parser::parse_payloads;
use crate::publish::PayloadPublisher;
use async_trait::async_trait;
use std::path::Path;
use tracing::{error, info};

/// User-facing message when no broker could be resolved
pub const BROKER_LOOKUP_FAILED: &str = "Failed to get Kafka broker from ZooKeeper!";

/// Result of one ingestion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub success: bool,
    pub message: String,
}

impl IngestOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Object-safe view of the orchestrator, for callers that hold it behind a
/// trait object (the HTTP server state) and for stubbing in tests
#[async_trait]
pub trait FileIngest: Send + Sync {
    async fn ingest_file(&self, path: &Path) -> IngestOutcome;
}

/// Composes discovery, parsing, and publishing over a fixed topic
pub struct Ingestor<D, P> {
    discovery: D,
    publisher: P,
    topic: String,
}

impl<D, P> Ingestor<D, P>
where
    D: BrokerDiscovery,
    P: PayloadPublisher,
{
    pub fn new(discovery: D, publisher: P, topic: impl Into<String>) -> Self {
        Self {
            discovery,
            publisher,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Resolve a broker, parse `path`, and publish every payload.
    ///
    /// The outcome message names the resolved broker once resolution has
    /// succeeded, whether or not the remaining steps do.
    pub async fn ingest_file(&self, path: &Path) -> IngestOutcome {
        let Some(broker) = self.discovery.resolve_broker().await else {
            return IngestOutcome::failed(BROKER_LOOKUP_FAILED);
        };

        let message = format!("Kafka broker: {}", broker);

        let payloads = match parse_payloads(path) {
            Ok(payloads) => payloads,
            Err(err) => {
                error!(error = %err, path = %path.display(), "payload parsing failed");
                return IngestOutcome::failed(message);
            },
        };

        match self
            .publisher
            .publish(&broker, &self.topic, &payloads)
            .await
        {
            Ok(sent) => {
                info!(
                    sent,
                    broker = %broker,
                    topic = %self.topic,
                    path = %path.display(),
                    "file produced to topic"
                );
                IngestOutcome::succeeded(message)
            },
            Err(err) => {
                error!(error = %err, broker = %broker, topic = %self.topic, "publish failed");
                IngestOutcome::failed(message)
            },
        }
    }
}

#[async_trait]
impl<D, P> FileIngest for Ingestor<D, P>
where
    D: BrokerDiscovery,
    P: PayloadPublisher,
{
    async fn ingest_file(&self, path: &Path) -> IngestOutcome {
        Ingestor::ingest_file(self, path).await
    }
}
