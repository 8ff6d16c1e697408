//! Per-bridge index of devices and room membership.

use std::collections::HashMap;

use crate::resource::{Device, Room};

/// Lookup tables built from one bridge's device and room lists.
///
/// Rebuilt on every poll cycle. Duplicate ids resolve to the first entry in
/// list order, and a device listed in several rooms belongs to the first room
/// that names it.
#[derive(Debug, Default)]
pub struct TopologyIndex<'a> {
    devices: HashMap<&'a str, &'a Device>,
    rooms_by_device: HashMap<&'a str, &'a Room>,
}

impl<'a> TopologyIndex<'a> {
    pub fn new(devices: &'a [Device], rooms: &'a [Room]) -> Self {
        let mut device_map = HashMap::with_capacity(devices.len());
        for device in devices {
            device_map.entry(device.id.as_str()).or_insert(device);
        }

        let mut rooms_by_device = HashMap::new();
        for room in rooms {
            for child in &room.children {
                if let Some(device_id) = child.device_id() {
                    rooms_by_device.entry(device_id).or_insert(room);
                }
            }
        }

        Self {
            devices: device_map,
            rooms_by_device,
        }
    }

    pub fn find_device(&self, id: &str) -> Option<&'a Device> {
        self.devices.get(id).copied()
    }

    pub fn find_room_containing(&self, device_id: &str) -> Option<&'a Room> {
        self.rooms_by_device.get(device_id).copied()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}
