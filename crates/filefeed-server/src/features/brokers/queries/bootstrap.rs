use filefeed_ingest::BrokerDiscovery;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResponse {
    /// Bootstrap address of the first registered broker, as `host:port`
    pub broker: String,
}

#[tracing::instrument(skip(discovery))]
pub async fn handle(discovery: &dyn BrokerDiscovery) -> Option<BootstrapResponse> {
    let address = discovery.resolve_broker().await?;
    Some(BootstrapResponse {
        broker: address.to_string(),
    })
}
