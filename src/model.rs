/*
 *  model.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Brewery state snapshot handed over by the host every tick
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

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::deutils::{
    default_zero_f64, deserialize_epoch_opt, deserialize_id_opt, deserialize_loose_string_opt,
    deserialize_numeric_f64, deserialize_numeric_i64,
};

pub type KettleId = u32;
pub type FermenterId = u32;
pub type ActorId = u32;
pub type SensorId = u32;

pub const BOIL_STEP: &str = "Boil";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("sensor {0} is not known to the host")]
    UnknownSensor(SensorId),
    #[error("sensor {0} has no reading")]
    NoReading(SensorId),
}

/// Temperature scale the host runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TempUnit {
    #[default]
    C,
    F,
}

impl fmt::Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempUnit::C => f.write_str("C"),
            TempUnit::F => f.write_str("F"),
        }
    }
}

/// The step currently running in the brew session.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProcessStep {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_epoch_opt")]
    pub timer_end: Option<DateTime<Utc>>,
    // hop offsets in minutes, kept raw, parsed at use
    #[serde(default, deserialize_with = "deserialize_loose_string_opt")]
    pub hop_1: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string_opt")]
    pub hop_2: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string_opt")]
    pub hop_3: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string_opt")]
    pub hop_4: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string_opt")]
    pub hop_5: Option<String>,
}

impl ProcessStep {
    pub fn is_boil(&self) -> bool {
        self.name == BOIL_STEP
    }

    pub fn hop_offsets(&self) -> [Option<&str>; 5] {
        [
            self.hop_1.as_deref(),
            self.hop_2.as_deref(),
            self.hop_3.as_deref(),
            self.hop_4.as_deref(),
            self.hop_5.as_deref(),
        ]
    }

    /// Whole seconds until the step timer fires, None when no timer runs.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.timer_end.map(|end| (end - now).num_seconds())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Kettle {
    pub id: KettleId,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_id_opt")]
    pub sensor: Option<SensorId>,
    #[serde(default, deserialize_with = "deserialize_id_opt")]
    pub heater: Option<ActorId>,
    #[serde(default = "default_zero_f64", deserialize_with = "deserialize_numeric_f64")]
    pub target_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fermenter {
    pub id: FermenterId,
    #[serde(default)]
    pub brewname: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_id_opt")]
    pub sensor: Option<SensorId>,
    #[serde(default, deserialize_with = "deserialize_id_opt")]
    pub sensor2: Option<SensorId>,
    #[serde(default, deserialize_with = "deserialize_id_opt")]
    pub heater: Option<ActorId>,
    #[serde(default, deserialize_with = "deserialize_id_opt")]
    pub cooler: Option<ActorId>,
    #[serde(default = "default_zero_f64", deserialize_with = "deserialize_numeric_f64")]
    pub target_temp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TaskState {
    #[serde(rename = "A", alias = "active")]
    Active,
    #[default]
    #[serde(rename = "I", alias = "inactive")]
    Inactive,
    #[serde(rename = "D", alias = "done")]
    Done,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FermenterTask {
    pub fermenter_id: FermenterId,
    #[serde(default, deserialize_with = "deserialize_epoch_opt")]
    pub timer_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: TaskState,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    #[serde(default, deserialize_with = "deserialize_numeric_i64")]
    pub state: i64,
}

impl Actor {
    pub fn is_on(&self) -> bool {
        self.state != 0
    }
}

/// Sensor hardware class, used to filter the sensor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorKind {
    #[default]
    OneWire,
    ISpindel,
    Mqtt,
    SystemTemp,
    Manometer,
    Ph,
}

impl SensorKind {
    pub const ALL: [SensorKind; 6] = [
        SensorKind::OneWire,
        SensorKind::ISpindel,
        SensorKind::Mqtt,
        SensorKind::SystemTemp,
        SensorKind::Manometer,
        SensorKind::Ph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::OneWire => "ONE_WIRE_SENSOR",
            SensorKind::ISpindel => "iSpindel",
            SensorKind::Mqtt => "MQTT_SENSOR",
            SensorKind::SystemTemp => "SystemTempSensor",
            SensorKind::Manometer => "eManometer",
            SensorKind::Ph => "PHSensor",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SensorKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown sensor type '{}'", s))
    }
}

/// What an iSpindel channel reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SpindelMeasurement {
    Gravity,
    Temperature,
    Battery,
    Tilt,
    #[default]
    #[serde(other)]
    Other,
}

/// Kind specific sensor configuration, tagged by the host's type name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum SensorConfig {
    #[serde(rename = "ONE_WIRE_SENSOR")]
    OneWire,
    #[serde(rename = "iSpindel")]
    ISpindel {
        #[serde(default)]
        measurement: SpindelMeasurement,
        #[serde(default)]
        gravity_unit: Option<String>,
    },
    #[serde(rename = "MQTT_SENSOR")]
    Mqtt,
    #[serde(rename = "SystemTempSensor")]
    SystemTemp,
    #[serde(rename = "eManometer")]
    Manometer,
    #[serde(rename = "PHSensor")]
    Ph,
    /// Any other host sensor type; never shown in sensor mode
    #[serde(other)]
    Unknown,
}

impl SensorConfig {
    pub fn kind(&self) -> Option<SensorKind> {
        match self {
            SensorConfig::OneWire => Some(SensorKind::OneWire),
            SensorConfig::ISpindel { .. } => Some(SensorKind::ISpindel),
            SensorConfig::Mqtt => Some(SensorKind::Mqtt),
            SensorConfig::SystemTemp => Some(SensorKind::SystemTemp),
            SensorConfig::Manometer => Some(SensorKind::Manometer),
            SensorConfig::Ph => Some(SensorKind::Ph),
            SensorConfig::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    #[serde(flatten)]
    pub config: SensorConfig,
    #[serde(default, deserialize_with = "deserialize_loose_string_opt")]
    pub value: Option<String>,
}

impl Sensor {
    pub fn kind(&self) -> Option<SensorKind> {
        self.config.kind()
    }

    /// Present only for iSpindel channels measuring gravity.
    /// The inner value is the configured unit, if any.
    pub fn gravity_unit(&self) -> Option<Option<&str>> {
        match &self.config {
            SensorConfig::ISpindel { measurement: SpindelMeasurement::Gravity, gravity_unit } => {
                Some(gravity_unit.as_deref())
            }
            _ => None,
        }
    }

    pub fn reading(&self) -> Option<f64> {
        self.value.as_deref().and_then(|v| v.trim().parse::<f64>().ok())
    }
}

/// Everything the display needs from the host for one tick.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub active_step: Option<ProcessStep>,
    #[serde(default)]
    pub kettles: Vec<Kettle>,
    #[serde(default)]
    pub fermenters: Vec<Fermenter>,
    #[serde(default)]
    pub fermenter_tasks: Vec<FermenterTask>,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default)]
    pub brewery_name: Option<String>,
    #[serde(default)]
    pub unit: TempUnit,
    #[serde(default)]
    pub version: Option<String>,
}

impl Snapshot {
    pub fn kettle(&self, id: KettleId) -> Option<&Kettle> {
        self.kettles.iter().find(|k| k.id == id)
    }

    pub fn fermenter(&self, id: FermenterId) -> Option<&Fermenter> {
        self.fermenters.iter().find(|f| f.id == id)
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    /// Kettle ids in scan order.
    pub fn kettle_ids(&self) -> Vec<KettleId> {
        let mut ids: Vec<_> = self.kettles.iter().map(|k| k.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Fermenter ids in scan order.
    pub fn fermenter_ids(&self) -> Vec<FermenterId> {
        let mut ids: Vec<_> = self.fermenters.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Unassigned or unknown actors count as off.
    pub fn actor_on(&self, id: Option<ActorId>) -> bool {
        id.and_then(|id| self.actors.iter().find(|a| a.id == id))
            .map(Actor::is_on)
            .unwrap_or(false)
    }

    /// Numeric reading of an assigned sensor, None when anything is missing.
    pub fn sensor_value(&self, id: Option<SensorId>) -> Option<f64> {
        id.and_then(|id| self.sensor(id)).and_then(Sensor::reading)
    }

    /// Raw reading text for the sensor view.
    pub fn read_sensor(&self, id: SensorId) -> Result<&str, SnapshotError> {
        let sensor = self.sensor(id).ok_or(SnapshotError::UnknownSensor(id))?;
        sensor
            .value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(SnapshotError::NoReading(id))
    }

    pub fn is_fermenting(&self) -> bool {
        self.fermenter_tasks.iter().any(|t| t.state == TaskState::Active)
    }

    /// Latest listed task of the fermenter whose timer has been started.
    pub fn running_task(&self, fermenter_id: FermenterId) -> Option<&FermenterTask> {
        self.fermenter_tasks
            .iter()
            .filter(|t| t.fermenter_id == fermenter_id && t.timer_start.is_some())
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_YAML: &str = r#"
active_step:
  name: Boil
  timer_end: 1700005400
  hop_1: 80
  hop_2: ""
kettles:
  - id: 2
    name: Sudkessel
    sensor: 1
    heater: "4"
    target_temp: 100
  - id: 1
    name: HLT
fermenters:
  - id: 1
    brewname: Pale Ale
    name: Ferm1
    sensor: 1
    sensor2: 3
    target_temp: "18.5"
fermenter_tasks:
  - fermenter_id: 1
    timer_start: "2023-11-14T22:13:20Z"
    state: A
actors:
  - id: 4
    state: 1
sensors:
  - id: 1
    name: Wort
    type: ONE_WIRE_SENSOR
    value: 97.3
  - id: 3
    name: Spindel SG
    type: iSpindel
    measurement: Gravity
    gravity_unit: SG
    value: "1.012"
  - id: 5
    name: Pressure
    type: eManometer
unit: C
version: "3.0"
"#;

    fn snapshot() -> Snapshot {
        serde_yaml::from_str(SNAPSHOT_YAML).unwrap()
    }

    #[test]
    fn test_snapshot_parses_loose_fields() {
        let snap = snapshot();
        let step = snap.active_step.as_ref().unwrap();
        assert!(step.is_boil());
        assert_eq!(step.timer_end.unwrap().timestamp(), 1_700_005_400);
        assert_eq!(step.hop_offsets()[0], Some("80"));
        assert_eq!(step.hop_offsets()[1], Some(""));
        assert_eq!(step.hop_offsets()[2], None);

        let kettle = snap.kettle(2).unwrap();
        assert_eq!(kettle.heater, Some(4));
        assert_eq!(kettle.target_temp, 100.0);
        assert_eq!(snap.kettle(1).unwrap().sensor, None);
        assert_eq!(snap.fermenter(1).unwrap().target_temp, 18.5);
    }

    #[test]
    fn test_scan_order_is_by_id() {
        assert_eq!(snapshot().kettle_ids(), vec![1, 2]);
    }

    #[test]
    fn test_sensor_config_is_tagged() {
        let snap = snapshot();
        assert_eq!(snap.sensor(1).unwrap().kind(), Some(SensorKind::OneWire));
        let spindel = snap.sensor(3).unwrap();
        assert_eq!(spindel.kind(), Some(SensorKind::ISpindel));
        assert_eq!(spindel.gravity_unit(), Some(Some("SG")));
        assert_eq!(snap.sensor(1).unwrap().gravity_unit(), None);
        assert_eq!(snap.sensor(5).unwrap().kind(), Some(SensorKind::Manometer));
    }

    #[test]
    fn test_unknown_sensor_type_keeps_snapshot() {
        let yaml = r#"
kettles:
  - id: 1
    name: Sudkessel
    sensor: 1
sensors:
  - id: 1
    name: Wort
    type: ONE_WIRE_SENSOR
    value: 97.3
  - id: 2
    name: Keller
    type: DHT22Sensor
    value: "55"
"#;
        let snap: Snapshot = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(snap.sensors.len(), 2);
        let dht = snap.sensor(2).unwrap();
        assert_eq!(dht.config, SensorConfig::Unknown);
        assert_eq!(dht.kind(), None);
        assert_eq!(dht.gravity_unit(), None);
        // the rest of the snapshot is still usable
        assert_eq!(snap.sensor_value(snap.kettle(1).unwrap().sensor), Some(97.3));
    }

    #[test]
    fn test_actor_and_sensor_lookups() {
        let snap = snapshot();
        assert!(snap.actor_on(Some(4)));
        assert!(!snap.actor_on(Some(9)));
        assert!(!snap.actor_on(None));
        assert_eq!(snap.sensor_value(Some(1)), Some(97.3));
        assert_eq!(snap.sensor_value(Some(5)), None);
        assert_eq!(snap.read_sensor(5), Err(SnapshotError::NoReading(5)));
        assert_eq!(snap.read_sensor(8), Err(SnapshotError::UnknownSensor(8)));
    }

    #[test]
    fn test_fermentation_state() {
        let snap = snapshot();
        assert!(snap.is_fermenting());
        assert!(snap.running_task(1).is_some());
        assert!(snap.running_task(2).is_none());
        assert!(!Snapshot::default().is_fermenting());
    }

    #[test]
    fn test_sensor_kind_names_round_trip() {
        for kind in SensorKind::ALL {
            assert_eq!(kind.as_str().parse::<SensorKind>(), Ok(kind));
        }
        assert!("DHT22".parse::<SensorKind>().is_err());
    }
}
