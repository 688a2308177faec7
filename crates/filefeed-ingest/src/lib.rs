//! Filefeed Ingest Library
//!
//! The file-to-Kafka ingestion pipeline: resolve a live broker through
//! ZooKeeper, split an uploaded file into message payloads, and produce each
//! payload to a configured topic.
//!
//! # Pipeline
//!
//! - [`discovery`]: broker lookup under `/brokers/ids`
//! - [`parser`]: extension-dispatched payload extraction (txt, json, csv)
//! - [`publish`]: fully acknowledged Kafka producer
//! - [`orchestrator`]: the resolve → parse → publish composition
//!
//! # Example
//!
//! ```no_run
//! use filefeed_ingest::{Ingestor, KafkaPublisher, ZkDiscovery};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ingestor = Ingestor::new(
//!         ZkDiscovery::new("localhost:2181"),
//!         KafkaPublisher::new(),
//!         "_schema",
//!     );
//!     let outcome = ingestor.ingest_file(Path::new("./data/words.txt")).await;
//!     println!("{}: {}", outcome.success, outcome.message);
//! }
//! ```

pub mod discovery;
pub mod orchestrator;
pub mod parser;
pub mod publish;

// Re-export commonly used types
pub use discovery::{BrokerAddress, BrokerDiscovery, ZkDiscovery};
pub use orchestrator::{FileIngest, IngestOutcome, Ingestor, BROKER_LOOKUP_FAILED};
pub use parser::{parse_payloads, MessagePayload, ParseError, PayloadFormat};
pub use publish::{KafkaPublisher, PayloadPublisher, PublishError};
