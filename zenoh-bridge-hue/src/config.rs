//! Configuration for the Hue bridge.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use huesight_bridge_framework::{
    BridgeConfig, BridgeError, Format, LoggingConfig, Result, ZenohConfig,
};

use crate::assignment::RoomAssignments;
use crate::error::TargetError;

/// Complete bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HueBridgeConfig {
    /// Zenoh connection settings
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// Hue-specific settings
    pub hue: HueConfig,

    /// Encoding of published records
    #[serde(default)]
    pub serialization: Format,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig for HueBridgeConfig {
    fn zenoh(&self) -> &ZenohConfig {
        &self.zenoh
    }

    fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn key_prefix(&self) -> &str {
        &self.hue.key_prefix
    }

    fn format(&self) -> Format {
        self.serialization
    }

    fn validate(&self) -> Result<()> {
        if self.hue.timeout_secs == 0 {
            return Err(BridgeError::validation("hue.timeout_secs must be > 0"));
        }
        if self.hue.poll_interval_secs == 0 {
            return Err(BridgeError::validation("hue.poll_interval_secs must be > 0"));
        }
        BridgeTarget::parse_all(&self.hue.bridges)
            .map_err(|e| BridgeError::validation(format!("hue.bridges: {}", e)))?;
        Ok(())
    }
}

/// Hue poller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HueConfig {
    /// Key expression prefix (default: "huesight/hue")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Bridges to poll, each `[base url, application key]`
    #[serde(default)]
    pub bridges: Vec<Vec<String>>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout", alias = "timeout")]
    pub timeout_secs: u64,

    /// Seconds between poll cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Manual room assignments, each `[room, device, ...]`
    #[serde(default)]
    pub room_assignments: RoomAssignments,

    /// Log bridge traffic at info level
    #[serde(default)]
    pub debug: bool,
}

fn default_key_prefix() -> String {
    "huesight/hue".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_poll_interval() -> u64 {
    10
}

impl HueConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Base URLs of the configured bridges, in configured order.
    pub fn bridge_urls(&self) -> Vec<&str> {
        self.bridges
            .iter()
            .filter_map(|entry| entry.first().map(String::as_str))
            .collect()
    }
}

impl Default for HueConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            bridges: Vec::new(),
            timeout_secs: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            room_assignments: RoomAssignments::default(),
            debug: false,
        }
    }
}

/// A bridge to poll.
#[derive(Clone, PartialEq, Eq)]
pub struct BridgeTarget {
    pub url: String,
    pub application_key: String,
}

impl BridgeTarget {
    pub fn new(url: impl Into<String>, application_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            application_key: application_key.into(),
        }
    }

    /// Check the raw bridge list, all or nothing.
    ///
    /// Fails on an empty list or on any entry that is not exactly two
    /// non-empty strings.
    pub fn parse_all(entries: &[Vec<String>]) -> std::result::Result<Vec<Self>, TargetError> {
        if entries.is_empty() {
            return Err(TargetError::EmptyBridgeList);
        }

        entries
            .iter()
            .map(|entry| match entry.as_slice() {
                [url, key] if !url.is_empty() && !key.is_empty() => Ok(Self::new(url, key)),
                _ => Err(TargetError::InvalidBridgeEntry {
                    entry: entry.clone(),
                }),
            })
            .collect()
    }
}

impl fmt::Debug for BridgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeTarget")
            .field("url", &self.url)
            .field("application_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|entry| entry.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_config() {
        let config = HueBridgeConfig::parse(
            r#"{
                zenoh: { mode: "client", connect: ["tcp/127.0.0.1:7447"] },
                serialization: "cbor",
                hue: {
                    bridges: [["https://192.168.1.2", "secret"]],
                    timeout: 5,
                    room_assignments: [["Flur", "Motion sensor"]],
                    debug: true,
                },
            }"#,
        )
        .unwrap();

        assert_eq!(config.zenoh.mode, "client");
        assert_eq!(config.format(), Format::Cbor);
        assert_eq!(config.key_prefix(), "huesight/hue");
        assert_eq!(config.hue.timeout(), Duration::from_secs(5));
        assert_eq!(config.hue.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.hue.bridge_urls(), vec!["https://192.168.1.2"]);
        assert_eq!(config.hue.room_assignments.resolve("Motion sensor"), Some("Flur"));
        assert!(config.hue.debug);
    }

    #[test]
    fn test_sample_config_loads() {
        let config =
            HueBridgeConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/hue.json5")).unwrap();
        assert_eq!(config.hue.bridges.len(), 1);
        assert_eq!(config.hue.poll_interval_secs, 30);
        assert_eq!(config.hue.room_assignments.len(), 1);
    }

    #[test]
    fn test_hue_defaults() {
        let hue: HueConfig = json5::from_str("{}").unwrap();
        assert_eq!(hue.key_prefix, "huesight/hue");
        assert_eq!(hue.timeout_secs, 10);
        assert_eq!(hue.poll_interval_secs, 10);
        assert!(hue.bridges.is_empty());
        assert!(hue.room_assignments.is_empty());
        assert!(!hue.debug);
    }

    #[test]
    fn test_validation_rejects_bad_bridges() {
        let empty = HueBridgeConfig::parse("{ hue: { bridges: [] } }");
        assert!(matches!(empty, Err(BridgeError::ConfigValidation(_))));

        let short = HueBridgeConfig::parse("{ hue: { bridges: [['https://bridge']] } }");
        assert!(matches!(short, Err(BridgeError::ConfigValidation(_))));
    }

    #[test]
    fn test_validation_rejects_zero_durations() {
        let result = HueBridgeConfig::parse(
            "{ hue: { bridges: [['https://bridge', 'key']], timeout_secs: 0 } }",
        );
        assert!(matches!(result, Err(BridgeError::ConfigValidation(_))));

        let result = HueBridgeConfig::parse(
            "{ hue: { bridges: [['https://bridge', 'key']], poll_interval_secs: 0 } }",
        );
        assert!(matches!(result, Err(BridgeError::ConfigValidation(_))));
    }

    #[test]
    fn test_parse_targets() {
        let targets = BridgeTarget::parse_all(&entries(&[
            &["https://a", "key-a"],
            &["https://b/prefix", "key-b"],
        ]))
        .unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1], BridgeTarget::new("https://b/prefix", "key-b"));
    }

    #[test]
    fn test_parse_targets_errors() {
        assert_eq!(
            BridgeTarget::parse_all(&[]),
            Err(TargetError::EmptyBridgeList)
        );

        for bad in [
            &["https://a"][..],
            &["https://a", "key", "extra"][..],
            &["", "key"][..],
            &["https://a", ""][..],
        ] {
            let raw = entries(&[&["https://ok", "key"], bad]);
            assert!(matches!(
                BridgeTarget::parse_all(&raw),
                Err(TargetError::InvalidBridgeEntry { .. })
            ));
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let target = BridgeTarget::new("https://bridge", "very-secret");
        let debug = format!("{:?}", target);
        assert!(debug.contains("https://bridge"));
        assert!(!debug.contains("very-secret"));
    }
}
