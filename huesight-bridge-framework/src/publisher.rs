//! Record publisher for Zenoh.

use std::sync::Arc;

use huesight_common::{Format, KeyExprBuilder, MetricRecord, encode};

use crate::error::{BridgeError, Result};

/// Publisher for sending metric records to Zenoh.
///
/// Wraps a Zenoh session and a key expression builder rooted at the bridge's
/// key prefix.
#[derive(Clone, Debug)]
pub struct Publisher {
    session: Arc<zenoh::Session>,
    keys: KeyExprBuilder,
    format: Format,
}

impl Publisher {
    pub fn new(
        session: Arc<zenoh::Session>,
        key_prefix: impl Into<String>,
        format: Format,
    ) -> Self {
        Self {
            session,
            keys: KeyExprBuilder::new(key_prefix),
            format,
        }
    }

    pub fn key_prefix(&self) -> &str {
        self.keys.prefix()
    }

    pub fn keys(&self) -> &KeyExprBuilder {
        &self.keys
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Publish one record under `<prefix>/<source>/<measurement>/<device>`.
    pub async fn publish(&self, source: &str, device: &str, record: &MetricRecord) -> Result<()> {
        let key = self.keys.build(source, &record.measurement, device);
        let payload =
            encode(record, self.format).map_err(|e| BridgeError::Serialization(e.to_string()))?;

        self.publish_raw(&key, payload).await
    }

    /// Publish a batch of records.
    ///
    /// Failures are logged and counted, never propagated.
    pub async fn publish_batch<'a, I>(&self, records: I) -> PublishStats
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a MetricRecord)>,
    {
        let mut stats = PublishStats::default();

        for (source, device, record) in records {
            match self.publish(source, device, record).await {
                Ok(()) => stats.success += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(error = %e, "Failed to publish record");
                }
            }
        }

        stats
    }

    /// Publish raw bytes to a key.
    pub async fn publish_raw(&self, key: &str, payload: Vec<u8>) -> Result<()> {
        self.session
            .put(key, payload)
            .await
            .map_err(|e| BridgeError::Publish {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// Publish a JSON value to a key.
    pub async fn publish_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let payload =
            serde_json::to_vec(value).map_err(|e| BridgeError::Serialization(e.to_string()))?;
        self.publish_raw(key, payload).await
    }
}

/// Statistics from a batch publish operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishStats {
    pub success: usize,
    pub failed: usize,
}

impl PublishStats {
    /// Total number of attempted publishes.
    pub fn total(&self) -> usize {
        self.success + self.failed
    }

    /// Success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            100.0
        } else {
            (self.success as f64 / self.total() as f64) * 100.0
        }
    }
}
