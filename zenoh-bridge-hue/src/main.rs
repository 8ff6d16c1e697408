//! Zenoh bridge for Philips Hue bridges.
//!
//! Polls the configured bridges and publishes light and sensor readings to
//! Zenoh as metric records.

use anyhow::Result;
use huesight_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};

use zenoh_bridge_hue::config::HueBridgeConfig;
use zenoh_bridge_hue::poller::HuePoller;

#[tokio::main]
async fn main() -> Result<()> {
    let args = BridgeArgs::parse_with_default("hue.json5");

    let config = HueBridgeConfig::load(&args.config).map_err(|e| anyhow::anyhow!("{}", e))?;

    let mut runner = BridgeRunner::new_with_args("hue", config, Some(&args))
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?
        .with_status_publishing();

    let hue_config = runner.config().hue.clone();

    tracing::info!(
        "Hue bridge running (prefix: {}, bridges: {}, interval: {}s)",
        hue_config.key_prefix,
        hue_config.bridges.len(),
        hue_config.poll_interval_secs
    );

    let metadata = serde_json::json!({
        "bridges": hue_config.bridge_urls(),
        "poll_interval_secs": hue_config.poll_interval_secs,
        "timeout_secs": hue_config.timeout_secs,
        "room_assignments": hue_config.room_assignments.len(),
    });

    let poller = HuePoller::new(hue_config);
    let publisher = runner.publisher();
    runner.spawn(poller.run(publisher));

    // Run until Ctrl+C
    runner
        .run_with_metadata(Some(metadata))
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
}
