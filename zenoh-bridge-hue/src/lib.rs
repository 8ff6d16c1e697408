//! Zenoh bridge for Philips Hue bridges.
//!
//! This bridge polls the CLIP v2 resource API of one or more Hue bridges,
//! resolves every sensor and light reading to the device it belongs to and
//! the room that device sits in, and publishes the result to Zenoh as metric
//! records.
//!
//! # Key Expressions
//!
//! ```text
//! huesight/hue/<bridge>/huebridge_light/<device>
//! huesight/hue/<bridge>/huebridge_temperature/<device>
//! huesight/hue/<bridge>/huebridge_light_level/<device>
//! huesight/hue/<bridge>/huebridge_motion/<device>
//! huesight/hue/<bridge>/huebridge_device_power/<device>
//! huesight/hue/@/errors
//! huesight/hue/@/status
//! ```

pub mod accumulator;
pub mod assignment;
pub mod client;
pub mod config;
pub mod correlate;
pub mod error;
pub mod poller;
pub mod resource;
pub mod topology;

pub use accumulator::{Accumulator, MetricSink};
pub use assignment::RoomAssignments;
pub use client::HueClient;
pub use config::{BridgeTarget, HueBridgeConfig, HueConfig};
pub use correlate::Correlator;
pub use error::{CycleError, FetchError, TargetError};
pub use poller::HuePoller;
pub use topology::TopologyIndex;
