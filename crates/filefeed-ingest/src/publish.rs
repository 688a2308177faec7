//! Kafka payload publishing
//!
//! A publish call opens its own producer against the resolved broker, sends
//! every payload to the topic, and only returns once the broker has
//! acknowledged each one. Producers are configured with `acks=all`, trading
//! send latency for replicated durability on every message.

use crate::discovery::BrokerAddress;
use crate::parser::MessagePayload;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default upper bound on how long a single message may sit undelivered
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors surfaced by a publish call
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to create producer for {broker}: {source}")]
    Connect { broker: String, source: KafkaError },

    #[error("failed to deliver payload to topic {topic}: {source}")]
    Delivery { topic: String, source: KafkaError },

    #[error("producer shut down before topic {topic} was flushed")]
    Interrupted { topic: String },
}

/// Seam for payload publishing so the pipeline can run against fakes in tests
#[async_trait]
pub trait PayloadPublisher: Send + Sync {
    /// Send every payload to `topic` on `broker` and wait for broker
    /// acknowledgment of all of them. Returns the number of payloads sent.
    ///
    /// The first failure aborts the call; there is no partial-success
    /// reporting, and a failed publish is restarted from the beginning of
    /// the file by the caller.
    async fn publish(
        &self,
        broker: &BrokerAddress,
        topic: &str,
        payloads: &[MessagePayload],
    ) -> Result<usize, PublishError>;
}

/// Kafka-backed publisher using a fully acknowledged producer per call
pub struct KafkaPublisher {
    send_timeout: Duration,
}

impl KafkaPublisher {
    pub fn new() -> Self {
        Self {
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_send_timeout(send_timeout: Duration) -> Self {
        Self { send_timeout }
    }

    fn producer(&self, broker: &BrokerAddress) -> Result<FutureProducer, PublishError> {
        ClientConfig::new()
            .set("bootstrap.servers", broker.to_string())
            .set("acks", "all")
            .set("message.timeout.ms", self.send_timeout.as_millis().to_string())
            .create()
            .map_err(|source| PublishError::Connect {
                broker: broker.to_string(),
                source,
            })
    }
}

impl Default for KafkaPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayloadPublisher for KafkaPublisher {
    async fn publish(
        &self,
        broker: &BrokerAddress,
        topic: &str,
        payloads: &[MessagePayload],
    ) -> Result<usize, PublishError> {
        let producer = self.producer(broker)?;
        debug!(broker = %broker, topic, count = payloads.len(), "producing payloads");

        // Issue every send before waiting on any acknowledgment. Records
        // carry no key, so the broker's default partitioner governs
        // distribution.
        let mut deliveries = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let record = FutureRecord::<(), str>::to(topic).payload(payload.as_str());
            match producer.send_result(record) {
                Ok(delivery) => deliveries.push(delivery),
                Err((source, _record)) => {
                    return Err(PublishError::Delivery {
                        topic: topic.to_string(),
                        source,
                    });
                },
            }
        }

        // The flush step: block until the broker has acknowledged every
        // outstanding send.
        for delivery in deliveries {
            match delivery.await {
                Ok(Ok(_)) => {},
                Ok(Err((source, _message))) => {
                    return Err(PublishError::Delivery {
                        topic: topic.to_string(),
                        source,
                    });
                },
                Err(_canceled) => {
                    return Err(PublishError::Interrupted {
                        topic: topic.to_string(),
                    });
                },
            }
        }

        info!(broker = %broker, topic, count = payloads.len(), "all payloads acknowledged");
        Ok(payloads.len())
    }
}
