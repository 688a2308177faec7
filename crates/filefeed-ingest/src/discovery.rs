//! Kafka broker discovery through ZooKeeper
//!
//! Kafka brokers register themselves as children of `/brokers/ids`, each
//! node carrying a JSON document with the broker's advertised `host` and
//! `port`. [`ZkDiscovery`] reads the first registered broker and returns its
//! address; every failure mode (unreachable ensemble, missing path, empty
//! registry, undecodable node data) is logged and collapses to `None` so
//! callers treat "no broker" as a single condition.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::fmt;
use tracing::{error, info, warn};

/// Default registry path brokers register under
pub const BROKER_IDS_PATH: &str = "/brokers/ids";

/// Address of a live Kafka broker, as advertised in ZooKeeper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
}

impl BrokerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Broker registration node data; only the address fields matter here.
/// Registrations written by older tooling carry the port as a string.
#[derive(Debug, Deserialize)]
struct BrokerNode {
    host: String,
    #[serde(deserialize_with = "port_from_number_or_string")]
    port: u16,
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(port) => Ok(port),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// Seam for broker resolution so the pipeline can run against fakes in tests
#[async_trait]
pub trait BrokerDiscovery: Send + Sync {
    /// Resolve the address of a live broker, or `None` when no broker is
    /// available for any reason.
    async fn resolve_broker(&self) -> Option<BrokerAddress>;
}

/// ZooKeeper-backed broker discovery
///
/// Opens a fresh session per lookup; registrations are ephemeral nodes and a
/// cached session would outlive the brokers it observed.
pub struct ZkDiscovery {
    hosts: String,
    broker_path: String,
}

impl ZkDiscovery {
    /// `hosts` is a ZooKeeper connection string, e.g. `"zk1:2181,zk2:2181"`
    pub fn new(hosts: impl Into<String>) -> Self {
        Self {
            hosts: hosts.into(),
            broker_path: BROKER_IDS_PATH.to_string(),
        }
    }

    /// Override the registry path (for namespaced ZooKeeper layouts)
    pub fn with_broker_path(mut self, path: impl Into<String>) -> Self {
        self.broker_path = path.into();
        self
    }

    async fn lookup(&self) -> anyhow::Result<Option<BrokerAddress>> {
        let client = zookeeper_client::Client::connect(&self.hosts).await?;

        let ids = match client.list_children(&self.broker_path).await {
            Ok(ids) => ids,
            Err(zookeeper_client::Error::NoNode) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let Some(first) = ids.first() else {
            return Ok(None);
        };

        let node = format!("{}/{}", self.broker_path, first);
        let (data, _stat) = client.get_data(&node).await?;
        let broker: BrokerNode = serde_json::from_slice(&data)?;

        Ok(Some(BrokerAddress::new(broker.host, broker.port)))
    }
}

#[async_trait]
impl BrokerDiscovery for ZkDiscovery {
    async fn resolve_broker(&self) -> Option<BrokerAddress> {
        match self.lookup().await {
            Ok(Some(address)) => {
                info!(broker = %address, "resolved Kafka broker from ZooKeeper");
                Some(address)
            },
            Ok(None) => {
                warn!(path = %self.broker_path, "no brokers registered in ZooKeeper");
                None
            },
            Err(err) => {
                error!(error = %err, hosts = %self.hosts, "broker lookup failed");
                None
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let address = BrokerAddress::new("kafka-0.internal", 9092);
        assert_eq!(address.to_string(), "kafka-0.internal:9092");
    }

    #[test]
    fn test_broker_node_numeric_port() {
        let node: BrokerNode =
            serde_json::from_str(r#"{"host": "10.0.0.5", "port": 9092}"#).unwrap();
        assert_eq!(node.host, "10.0.0.5");
        assert_eq!(node.port, 9092);
    }

    #[test]
    fn test_broker_node_string_port() {
        let node: BrokerNode =
            serde_json::from_str(r#"{"host": "10.0.0.5", "port": "9092"}"#).unwrap();
        assert_eq!(node.port, 9092);
    }

    #[test]
    fn test_broker_node_extra_fields_ignored() {
        let raw = r#"{"host": "b1", "port": 9092, "jmx_port": -1, "version": 4}"#;
        let node: BrokerNode = serde_json::from_str(raw).unwrap();
        assert_eq!(node.host, "b1");
    }

    #[test]
    fn test_broker_node_bad_port_rejected() {
        assert!(serde_json::from_str::<BrokerNode>(r#"{"host": "b1", "port": "nope"}"#).is_err());
        assert!(serde_json::from_str::<BrokerNode>(r#"{"host": "b1"}"#).is_err());
    }
}
