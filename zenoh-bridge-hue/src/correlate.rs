//! Turning bridge readings into enriched metric records.
//!
//! Every reading only knows the id of the device that hosts it. The
//! [`Correlator`] resolves that id to the device's display name and the room
//! it sits in, either from a manual assignment or from the bridge's own room
//! list, and hands one record per reading to the sink.

use huesight_common::{FieldValue, Fields, Tags};

use crate::accumulator::MetricSink;
use crate::assignment::RoomAssignments;
use crate::resource::{DevicePower, Light, LightLevel, Motion, ResourceLink, Temperature};
use crate::topology::TopologyIndex;

/// Device name used when a reading's owner cannot be resolved.
pub const UNDEFINED_DEVICE: &str = "<undefined>";
/// Room name used when a device is in no room.
pub const UNASSIGNED_ROOM: &str = "<unassigned>";

pub const MEASUREMENT_LIGHT: &str = "huebridge_light";
pub const MEASUREMENT_TEMPERATURE: &str = "huebridge_temperature";
pub const MEASUREMENT_LIGHT_LEVEL: &str = "huebridge_light_level";
pub const MEASUREMENT_MOTION: &str = "huebridge_motion";
pub const MEASUREMENT_DEVICE_POWER: &str = "huebridge_device_power";

pub const TAG_URL: &str = "huebridge_url";
pub const TAG_DEVICE: &str = "huebridge_device";
pub const TAG_ROOM: &str = "huebridge_room";

/// Resolves owners against one bridge's topology.
pub struct Correlator<'a> {
    bridge_url: &'a str,
    topology: &'a TopologyIndex<'a>,
    assignments: &'a RoomAssignments,
}

impl<'a> Correlator<'a> {
    pub fn new(
        bridge_url: &'a str,
        topology: &'a TopologyIndex<'a>,
        assignments: &'a RoomAssignments,
    ) -> Self {
        Self {
            bridge_url,
            topology,
            assignments,
        }
    }

    /// Display name of the owning device, or [`UNDEFINED_DEVICE`].
    pub fn device_name(&self, owner: &ResourceLink) -> &'a str {
        owner
            .device_id()
            .and_then(|id| self.topology.find_device(id))
            .map_or(UNDEFINED_DEVICE, |device| device.metadata.name.as_str())
    }

    /// Device and room names of the owning device.
    ///
    /// Rooms are only looked up for known devices. A manual assignment wins
    /// over the room list reported by the bridge.
    pub fn device_and_room(&self, owner: &ResourceLink) -> (&'a str, &'a str) {
        let Some(device) = owner
            .device_id()
            .and_then(|id| self.topology.find_device(id))
        else {
            return (UNDEFINED_DEVICE, UNASSIGNED_ROOM);
        };

        let name = device.metadata.name.as_str();
        let room = self
            .assignments
            .resolve(name)
            .or_else(|| {
                self.topology
                    .find_room_containing(&device.id)
                    .map(|room| room.metadata.name.as_str())
            })
            .unwrap_or(UNASSIGNED_ROOM);

        (name, room)
    }

    pub fn lights<S: MetricSink + ?Sized>(&self, lights: &[Light], sink: &mut S) -> usize {
        for light in lights {
            let (device, room) = self.device_and_room(&light.owner);
            sink.add_counter(
                MEASUREMENT_LIGHT,
                fields([("on", light.on.on.into())]),
                self.tags(device, Some(room)),
            );
        }
        lights.len()
    }

    pub fn temperatures<S: MetricSink + ?Sized>(
        &self,
        temperatures: &[Temperature],
        sink: &mut S,
    ) -> usize {
        let mut count = 0;
        for reading in temperatures.iter().filter(|t| t.is_reportable()) {
            let (device, room) = self.device_and_room(&reading.owner);
            sink.add_counter(
                MEASUREMENT_TEMPERATURE,
                fields([("temperature", reading.temperature.temperature.into())]),
                self.tags(device, Some(room)),
            );
            count += 1;
        }
        count
    }

    pub fn light_levels<S: MetricSink + ?Sized>(
        &self,
        light_levels: &[LightLevel],
        sink: &mut S,
    ) -> usize {
        let mut count = 0;
        for reading in light_levels.iter().filter(|l| l.is_reportable()) {
            let (device, room) = self.device_and_room(&reading.owner);
            sink.add_counter(
                MEASUREMENT_LIGHT_LEVEL,
                fields([
                    ("light_level", reading.light.light_level.into()),
                    ("light_level_lux", reading.light.lux().into()),
                ]),
                self.tags(device, Some(room)),
            );
            count += 1;
        }
        count
    }

    pub fn motions<S: MetricSink + ?Sized>(&self, motions: &[Motion], sink: &mut S) -> usize {
        let mut count = 0;
        for reading in motions.iter().filter(|m| m.is_reportable()) {
            let (device, room) = self.device_and_room(&reading.owner);
            sink.add_counter(
                MEASUREMENT_MOTION,
                fields([("motion", reading.motion.motion.into())]),
                self.tags(device, Some(room)),
            );
            count += 1;
        }
        count
    }

    /// Battery levels carry no room tag.
    pub fn device_powers<S: MetricSink + ?Sized>(
        &self,
        device_powers: &[DevicePower],
        sink: &mut S,
    ) -> usize {
        for reading in device_powers {
            let device = self.device_name(&reading.owner);
            sink.add_counter(
                MEASUREMENT_DEVICE_POWER,
                fields([("battery_level", reading.power_state.battery_level.into())]),
                self.tags(device, None),
            );
        }
        device_powers.len()
    }

    fn tags(&self, device: &str, room: Option<&str>) -> Tags {
        let mut tags = Tags::new();
        tags.insert(TAG_URL.to_string(), self.bridge_url.to_string());
        tags.insert(TAG_DEVICE.to_string(), device.to_string());
        if let Some(room) = room {
            tags.insert(TAG_ROOM.to_string(), room.to_string());
        }
        tags
    }
}

fn fields<const N: usize>(values: [(&str, FieldValue); N]) -> Fields {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Accumulator;
    use crate::resource::{
        Device, LightLevelReport, Metadata, MotionReport, OnState, PowerState, ResourceType, Room,
        TemperatureReport,
    };

    const URL: &str = "https://192.168.1.2";

    fn device(id: &str, name: &str) -> Device {
        Device {
            id: id.to_string(),
            metadata: Metadata {
                name: name.to_string(),
                archetype: String::new(),
            },
        }
    }

    fn room(name: &str, device_ids: &[&str]) -> Room {
        Room {
            id: format!("room-{}", name),
            metadata: Metadata {
                name: name.to_string(),
                archetype: String::new(),
            },
            children: device_ids.iter().map(|id| owner(id)).collect(),
        }
    }

    fn owner(id: &str) -> ResourceLink {
        ResourceLink {
            rid: id.to_string(),
            rtype: ResourceType::Device,
        }
    }

    fn light(owner_id: &str, on: bool) -> Light {
        Light {
            id: format!("light-{}", owner_id),
            on: OnState { on },
            owner: owner(owner_id),
        }
    }

    struct Home {
        devices: Vec<Device>,
        rooms: Vec<Room>,
    }

    impl Home {
        fn new() -> Self {
            Self {
                devices: vec![
                    device("d-lamp1", "Lamp 1"),
                    device("d-lamp2", "Lamp 2"),
                    device("d-sensor", "Motion sensor"),
                ],
                rooms: vec![
                    room("Wohnzimmer", &["d-lamp1"]),
                    room("Arbeitszimmer", &["d-lamp2"]),
                ],
            }
        }
    }

    fn run<F>(home: &Home, assignments: &RoomAssignments, f: F) -> Accumulator
    where
        F: FnOnce(&Correlator<'_>, &mut Accumulator),
    {
        let topology = TopologyIndex::new(&home.devices, &home.rooms);
        let correlator = Correlator::new(URL, &topology, assignments);
        let mut acc = Accumulator::new();
        f(&correlator, &mut acc);
        acc
    }

    #[test]
    fn test_light_on_off() {
        let home = Home::new();
        let acc = run(&home, &RoomAssignments::default(), |c, sink| {
            assert_eq!(
                c.lights(&[light("d-lamp1", true), light("d-lamp2", false)], sink),
                2
            );
        });

        let records = acc.records();
        assert_eq!(records[0].measurement, MEASUREMENT_LIGHT);
        assert_eq!(records[0].field("on"), Some(&FieldValue::Integer(1)));
        assert_eq!(records[1].field("on"), Some(&FieldValue::Integer(0)));
        assert_eq!(records[0].tag(TAG_URL), Some(URL));
    }

    #[test]
    fn test_room_from_topology() {
        let home = Home::new();
        let acc = run(&home, &RoomAssignments::default(), |c, sink| {
            c.lights(&[light("d-lamp1", true)], sink);
        });

        let record = &acc.records()[0];
        assert_eq!(record.tag(TAG_DEVICE), Some("Lamp 1"));
        assert_eq!(record.tag(TAG_ROOM), Some("Wohnzimmer"));
    }

    #[test]
    fn test_assignment_beats_topology() {
        let home = Home::new();
        let assignments =
            RoomAssignments::new(vec![vec!["Flur".to_string(), "Lamp 2".to_string()]]);
        let acc = run(&home, &assignments, |c, sink| {
            c.lights(&[light("d-lamp2", true)], sink);
        });

        assert_eq!(acc.records()[0].tag(TAG_ROOM), Some("Flur"));
    }

    #[test]
    fn test_sentinels() {
        let home = Home::new();
        let assignments =
            RoomAssignments::new(vec![vec!["Flur".to_string(), UNDEFINED_DEVICE.to_string()]]);
        let acc = run(&home, &assignments, |c, sink| {
            c.lights(&[light("d-sensor", true), light("d-unknown", true)], sink);
        });

        let records = acc.records();
        assert_eq!(records[0].tag(TAG_DEVICE), Some("Motion sensor"));
        assert_eq!(records[0].tag(TAG_ROOM), Some(UNASSIGNED_ROOM));

        // Overrides are not consulted for unresolved owners
        assert_eq!(records[1].tag(TAG_DEVICE), Some(UNDEFINED_DEVICE));
        assert_eq!(records[1].tag(TAG_ROOM), Some(UNASSIGNED_ROOM));
    }

    #[test]
    fn test_owner_must_be_a_device() {
        let home = Home::new();
        let acc = run(&home, &RoomAssignments::default(), |c, sink| {
            let mut reading = light("d-lamp1", true);
            reading.owner.rtype = ResourceType::Unknown;
            c.lights(&[reading], sink);
        });

        assert_eq!(acc.records()[0].tag(TAG_DEVICE), Some(UNDEFINED_DEVICE));
    }

    #[test]
    fn test_flagged_readings_filtered() {
        let home = Home::new();
        let temperature = |enabled, valid| Temperature {
            id: "t".to_string(),
            enabled,
            temperature: TemperatureReport {
                temperature: 20.45,
                temperature_valid: valid,
            },
            owner: owner("d-sensor"),
        };
        let motion = |enabled, valid| Motion {
            id: "m".to_string(),
            enabled,
            motion: MotionReport {
                motion: true,
                motion_valid: valid,
            },
            owner: owner("d-sensor"),
        };
        let light_level = |enabled, valid| LightLevel {
            id: "l".to_string(),
            enabled,
            light: LightLevelReport {
                light_level: 1563,
                light_level_valid: valid,
            },
            owner: owner("d-sensor"),
        };

        let acc = run(&home, &RoomAssignments::default(), |c, sink| {
            let temps = [
                temperature(true, true),
                temperature(false, true),
                temperature(true, false),
            ];
            assert_eq!(c.temperatures(&temps, sink), 1);

            let motions = [motion(true, true), motion(false, true), motion(true, false)];
            assert_eq!(c.motions(&motions, sink), 1);

            let levels = [
                light_level(true, true),
                light_level(false, true),
                light_level(true, false),
            ];
            assert_eq!(c.light_levels(&levels, sink), 1);
        });

        let records = acc.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].field("temperature"), Some(&FieldValue::Float(20.45)));
        assert_eq!(records[1].field("motion"), Some(&FieldValue::Integer(1)));
        assert_eq!(records[2].field("light_level"), Some(&FieldValue::Integer(1563)));

        let lux = records[2].field("light_level_lux").unwrap().as_f64();
        assert!((lux - 10f64.powf(0.1562)).abs() < 1e-9);
    }

    #[test]
    fn test_device_power_has_no_room() {
        let home = Home::new();
        let acc = run(&home, &RoomAssignments::default(), |c, sink| {
            let power = DevicePower {
                id: "p".to_string(),
                power_state: PowerState {
                    battery_state: "normal".to_string(),
                    battery_level: 100,
                },
                owner: owner("d-lamp1"),
            };
            c.device_powers(&[power], sink);
        });

        let record = &acc.records()[0];
        assert_eq!(record.measurement, MEASUREMENT_DEVICE_POWER);
        assert_eq!(record.field("battery_level"), Some(&FieldValue::Integer(100)));
        assert_eq!(record.tag(TAG_DEVICE), Some("Lamp 1"));
        assert_eq!(record.tag(TAG_ROOM), None);
    }

    #[test]
    fn test_device_power_unknown_owner() {
        let home = Home::new();
        let assignments = RoomAssignments::new(vec![vec![
            "Flur".to_string(),
            UNDEFINED_DEVICE.to_string(),
        ]]);
        let acc = run(&home, &assignments, |c, sink| {
            let power = DevicePower {
                id: "p".to_string(),
                power_state: PowerState {
                    battery_state: "low".to_string(),
                    battery_level: 7,
                },
                owner: owner("d-unknown"),
            };
            assert_eq!(c.device_powers(&[power], sink), 1);
        });

        assert_eq!(acc.records().len(), 1);
        let record = &acc.records()[0];
        assert_eq!(record.field("battery_level"), Some(&FieldValue::Integer(7)));
        assert_eq!(record.tag(TAG_DEVICE), Some(UNDEFINED_DEVICE));
        assert_eq!(record.tag(TAG_ROOM), None);
    }
}
