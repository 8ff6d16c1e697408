//! Typed views of the bridge's CLIP v2 resources.
//!
//! Only the fields needed for metrics are decoded. Every struct falls back to
//! zero values for missing fields, so an incomplete reading simply fails its
//! validity check instead of failing the whole collection.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Resource type discriminator as used in `rtype` references and API paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Device,
    Room,
    Light,
    Temperature,
    LightLevel,
    Motion,
    DevicePower,
    /// Any reference type this bridge does not interpret (zone, button, ...).
    #[default]
    #[serde(other)]
    Unknown,
}

impl ResourceType {
    /// Name used in the `/clip/v2/resource/<name>` path.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Device => "device",
            ResourceType::Room => "room",
            ResourceType::Light => "light",
            ResourceType::Temperature => "temperature",
            ResourceType::LightLevel => "light_level",
            ResourceType::Motion => "motion",
            ResourceType::DevicePower => "device_power",
            ResourceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource collection that can be fetched from the bridge.
pub trait Resource: DeserializeOwned + Default + Send {
    const KIND: ResourceType;
}

/// Envelope of every CLIP v2 GET response.
#[derive(Debug, Deserialize)]
pub struct ResourceList<T> {
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(default)]
    pub data: Vec<T>,
}

/// Entry of the response `errors` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub description: String,
}

/// Reference to another resource (`owner`, `children[]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResourceLink {
    pub rid: String,
    pub rtype: ResourceType,
}

impl ResourceLink {
    /// Id of the referenced device, if this link points at a device.
    pub fn device_id(&self) -> Option<&str> {
        (self.rtype == ResourceType::Device).then_some(self.rid.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,
    pub archetype: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Device {
    pub id: String,
    pub metadata: Metadata,
}

impl Resource for Device {
    const KIND: ResourceType = ResourceType::Device;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Room {
    pub id: String,
    pub metadata: Metadata,
    pub children: Vec<ResourceLink>,
}

impl Resource for Room {
    const KIND: ResourceType = ResourceType::Room;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Light {
    pub id: String,
    pub on: OnState,
    pub owner: ResourceLink,
}

impl Resource for Light {
    const KIND: ResourceType = ResourceType::Light;
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct OnState {
    pub on: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Temperature {
    pub id: String,
    pub enabled: bool,
    pub temperature: TemperatureReport,
    pub owner: ResourceLink,
}

impl Temperature {
    pub fn is_reportable(&self) -> bool {
        self.enabled && self.temperature.temperature_valid
    }
}

impl Resource for Temperature {
    const KIND: ResourceType = ResourceType::Temperature;
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct TemperatureReport {
    /// Degrees Celsius.
    pub temperature: f64,
    pub temperature_valid: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LightLevel {
    pub id: String,
    pub enabled: bool,
    pub light: LightLevelReport,
    pub owner: ResourceLink,
}

impl LightLevel {
    pub fn is_reportable(&self) -> bool {
        self.enabled && self.light.light_level_valid
    }
}

impl Resource for LightLevel {
    const KIND: ResourceType = ResourceType::LightLevel;
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct LightLevelReport {
    /// `10000 * log10(lux) + 1`.
    pub light_level: i64,
    pub light_level_valid: bool,
}

impl LightLevelReport {
    /// Illuminance in lux.
    pub fn lux(&self) -> f64 {
        10f64.powf((self.light_level as f64 - 1.0) / 10000.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Motion {
    pub id: String,
    pub enabled: bool,
    pub motion: MotionReport,
    pub owner: ResourceLink,
}

impl Motion {
    pub fn is_reportable(&self) -> bool {
        self.enabled && self.motion.motion_valid
    }
}

impl Resource for Motion {
    const KIND: ResourceType = ResourceType::Motion;
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct MotionReport {
    pub motion: bool,
    pub motion_valid: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DevicePower {
    pub id: String,
    pub power_state: PowerState,
    pub owner: ResourceLink,
}

impl Resource for DevicePower {
    const KIND: ResourceType = ResourceType::DevicePower;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PowerState {
    /// "normal", "low" or "critical".
    pub battery_state: String,
    /// Percent.
    pub battery_level: i64,
}
