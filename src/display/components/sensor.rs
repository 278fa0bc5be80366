/*
 *  display/components/sensor.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sensor view: every sensor of the configured kind, one per frame
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::debug;

use crate::charmap::{encode, CharMap};
use crate::display::frame::Frame;
use crate::model::{Sensor, SensorId, SensorKind, Snapshot, SnapshotError};

pub const SENSOR_TITLE: &str = "CBPi3 LCD Sensormode";
pub const SENSOR_RULE: &str = "--------------------";
const NO_DATA: &str = "No Data";

/// Ids of the sensors shown for `kind`, in scan order.
pub fn matching_sensors(snap: &Snapshot, kind: SensorKind) -> Vec<SensorId> {
    let mut ids: Vec<_> = snap.sensors.iter().filter(|s| s.kind() == Some(kind)).map(|s| s.id).collect();
    ids.sort_unstable();
    ids
}

pub fn sensor_frame(sensor: &Sensor, reading: Result<&str, SnapshotError>, charmap: CharMap) -> Frame {
    let value = match reading {
        Ok(v) => v,
        Err(e) => {
            debug!("{}", e);
            NO_DATA
        }
    };
    let name = encode(&sensor.name, charmap);
    let value = encode(value, charmap);
    Frame::new([SENSOR_TITLE, SENSOR_RULE, &name, &value])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SensorConfig, SpindelMeasurement};

    fn sensor(id: SensorId, name: &str, config: SensorConfig, value: Option<&str>) -> Sensor {
        Sensor { id, name: name.to_string(), config, value: value.map(str::to_string) }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            sensors: vec![
                sensor(4, "Keller", SensorConfig::OneWire, Some("12.5")),
                sensor(2, "Würze", SensorConfig::OneWire, None),
                sensor(9, "Feuchte", SensorConfig::Unknown, Some("55")),
                sensor(
                    3,
                    "Spindel",
                    SensorConfig::ISpindel { measurement: SpindelMeasurement::Gravity, gravity_unit: None },
                    Some("1.050"),
                ),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_matching_sensors_filters_by_kind() {
        let snap = snapshot();
        assert_eq!(matching_sensors(&snap, SensorKind::OneWire), vec![2, 4]);
        assert_eq!(matching_sensors(&snap, SensorKind::ISpindel), vec![3]);
        // host types outside the known kinds never match
        for kind in SensorKind::ALL {
            assert!(!matching_sensors(&snap, kind).contains(&9));
        }
        assert!(matching_sensors(&snap, SensorKind::Ph).is_empty());
    }

    #[test]
    fn test_sensor_frame_lines() {
        let snap = snapshot();
        let s = snap.sensor(4).unwrap();
        let frame = sensor_frame(s, snap.read_sensor(4), CharMap::A00);
        assert_eq!(frame.line(0), SENSOR_TITLE);
        assert_eq!(frame.line(1), SENSOR_RULE);
        assert_eq!(frame.line(2), "Keller              ");
        assert_eq!(frame.line(3), "12.5                ");
    }

    #[test]
    fn test_sensor_frame_without_reading() {
        let snap = snapshot();
        let s = snap.sensor(2).unwrap();
        let frame = sensor_frame(s, snap.read_sensor(2), CharMap::A02);
        assert_eq!(frame.line(2), "Würze               ");
        assert_eq!(frame.line(3), "No Data             ");
    }
}
