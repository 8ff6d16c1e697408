//! Manual room assignments.

use serde::{Deserialize, Serialize};

/// User supplied room rules, each `[room, device, device, ...]`.
///
/// Rules are checked in order and take precedence over the room membership
/// reported by the bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomAssignments(Vec<Vec<String>>);

impl RoomAssignments {
    pub fn new(rules: Vec<Vec<String>>) -> Self {
        Self(rules)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Room assigned to `device_name` by the first matching rule.
    ///
    /// The device name is looked up across the whole rule, room name
    /// included, and only counts when its first occurrence is past the room
    /// slot. `["Flur"]` therefore never matches and `["Flur", "Flur"]` does
    /// not place a device named "Flur".
    pub fn resolve(&self, device_name: &str) -> Option<&str> {
        self.0.iter().find_map(|rule| {
            let position = rule.iter().position(|name| name == device_name)?;
            (position > 0).then(|| rule[0].as_str())
        })
    }
}

impl From<Vec<Vec<String>>> for RoomAssignments {
    fn from(rules: Vec<Vec<String>>) -> Self {
        Self(rules)
    }
}
