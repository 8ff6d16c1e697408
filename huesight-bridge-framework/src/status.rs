//! Liveness announcements on `{key_prefix}/@/status`.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::publisher::Publisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeState {
    Running,
    Offline,
}

/// Status document of a bridge process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeStatus {
    /// Bridge name, e.g. "hue".
    pub bridge: String,
    pub version: String,
    pub status: BridgeState,
    /// Bridge-specific fields, flattened into the document.
    #[serde(flatten)]
    pub metadata: serde_json::Value,
}

impl BridgeStatus {
    pub fn new(bridge: impl Into<String>, version: impl Into<String>, status: BridgeState) -> Self {
        Self {
            bridge: bridge.into(),
            version: version.into(),
            status,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub async fn publish(&self, publisher: &Publisher) -> Result<()> {
        publisher
            .publish_json(&publisher.keys().status_key(), self)
            .await
    }
}

/// Publishes the status of one bridge at startup and shutdown.
pub(crate) struct StatusPublisher {
    publisher: Publisher,
    bridge: String,
    version: String,
}

impl StatusPublisher {
    pub(crate) fn new(
        publisher: Publisher,
        bridge: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            publisher,
            bridge: bridge.into(),
            version: version.into(),
        }
    }

    fn status(&self, state: BridgeState) -> BridgeStatus {
        BridgeStatus::new(&self.bridge, &self.version, state)
    }

    pub(crate) async fn publish_running(&self, metadata: Option<serde_json::Value>) -> Result<()> {
        let status = match metadata {
            Some(metadata) => self.status(BridgeState::Running).with_metadata(metadata),
            None => self.status(BridgeState::Running),
        };
        status.publish(&self.publisher).await
    }

    pub(crate) async fn publish_offline(&self) -> Result<()> {
        self.status(BridgeState::Offline)
            .publish(&self.publisher)
            .await
    }
}
