/*
 *  params.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host side LCD parameters, created on first use and re-read every tick
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

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, RwLock};

use log::{info, warn};
use thiserror::Error;

use crate::charmap::CharMap;
use crate::model::{KettleId, SensorKind};

pub const PARAM_ADDRESS: &str = "LCD_Address";
pub const PARAM_CHARMAP: &str = "LCD_Charactermap";
pub const PARAM_REFRESH: &str = "LCD_Refresh";
pub const PARAM_MODE: &str = "LCD_Display_Mode";
pub const PARAM_SENSOR_TYPE: &str = "LCD_Display_Sensortype";
pub const PARAM_SINGLE_KETTLE: &str = "LCD_Singledisplay";

pub const DEFAULT_ADDRESS: u8 = 0x27;
pub const DEFAULT_REFRESH_SECS: u64 = 3;
pub const DEFAULT_SINGLE_KETTLE: KettleId = 1;

#[derive(Error, Debug)]
pub enum ParamError {
    #[error("parameter file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parameter file {path} is malformed: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("parameter {name} has invalid value '{value}': {reason}")]
    Invalid { name: &'static str, value: String, reason: String },
    #[error("parameter store unavailable")]
    Poisoned,
}

/// How the host UI should offer a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Select(&'static [&'static str]),
    Kettle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: &'static str,
    pub description: &'static str,
}

const CHARMAP_OPTIONS: &[&str] = &["A00", "A02"];
const REFRESH_OPTIONS: &[&str] = &["1", "2", "3", "4", "5", "6"];
const MODE_OPTIONS: &[&str] = &["Multidisplay", "Singledisplay", "Sensordisplay"];
const SENSOR_OPTIONS: &[&str] = &[
    "ONE_WIRE_SENSOR",
    "iSpindel",
    "MQTT_SENSOR",
    "SystemTempSensor",
    "eManometer",
    "PHSensor",
];

pub const ADDRESS_SPEC: ParameterSpec = ParameterSpec {
    name: PARAM_ADDRESS,
    kind: ParamKind::Text,
    default: "0x27",
    description: "Address of the LCD, CBPi reboot required",
};
pub const CHARMAP_SPEC: ParameterSpec = ParameterSpec {
    name: PARAM_CHARMAP,
    kind: ParamKind::Select(CHARMAP_OPTIONS),
    default: "A00",
    description: "Character map of the LCD ROM, A00 needs custom umlaut glyphs",
};
pub const REFRESH_SPEC: ParameterSpec = ParameterSpec {
    name: PARAM_REFRESH,
    kind: ParamKind::Select(REFRESH_OPTIONS),
    default: "3",
    description: "Seconds each kettle, fermenter or sensor stays on screen",
};
pub const MODE_SPEC: ParameterSpec = ParameterSpec {
    name: PARAM_MODE,
    kind: ParamKind::Select(MODE_OPTIONS),
    default: "Multidisplay",
    description: "View used while a brew step is active",
};
pub const SENSOR_TYPE_SPEC: ParameterSpec = ParameterSpec {
    name: PARAM_SENSOR_TYPE,
    kind: ParamKind::Select(SENSOR_OPTIONS),
    default: "ONE_WIRE_SENSOR",
    description: "Sensor type shown in Sensordisplay mode",
};
pub const SINGLE_KETTLE_SPEC: ParameterSpec = ParameterSpec {
    name: PARAM_SINGLE_KETTLE,
    kind: ParamKind::Kettle,
    default: "1",
    description: "Kettle shown in Singledisplay mode",
};

/// Host configuration storage.
pub trait ParameterStore: Send + Sync {
    /// None when the parameter has never been created.
    fn get(&self, name: &str) -> Result<Option<String>, ParamError>;

    /// Create the parameter with its default value.
    fn add(&self, spec: &ParameterSpec) -> Result<(), ParamError>;
}

/// Read a parameter, creating it with its default when missing.
/// Store failures degrade to the default.
pub fn get_or_create(store: &dyn ParameterStore, spec: &ParameterSpec) -> String {
    match store.get(spec.name) {
        Ok(Some(value)) => value,
        Ok(None) => {
            info!("parameter {} missing, created with default '{}'", spec.name, spec.default);
            if let Err(e) = store.add(spec) {
                warn!("could not create parameter {}: {}", spec.name, e);
            }
            spec.default.to_string()
        }
        Err(e) => {
            warn!("could not read parameter {}: {}, using '{}'", spec.name, e, spec.default);
            spec.default.to_string()
        }
    }
}

/// View used while a brew step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Multidisplay,
    Singledisplay,
    Sensordisplay,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DisplayMode::Multidisplay => "Multidisplay",
            DisplayMode::Singledisplay => "Singledisplay",
            DisplayMode::Sensordisplay => "Sensordisplay",
        };
        f.write_str(s)
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Multidisplay" => Ok(DisplayMode::Multidisplay),
            "Singledisplay" => Ok(DisplayMode::Singledisplay),
            "Sensordisplay" => Ok(DisplayMode::Sensordisplay),
            other => Err(format!("unknown display mode '{}'", other)),
        }
    }
}

/// Bus address as "0x27" hex or plain decimal.
pub fn parse_address(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("not a bus address: {}", e))
}

fn parse_refresh(s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(n) if (1..=6).contains(&n) => Ok(n),
        Ok(n) => Err(format!("{} is outside 1..6", n)),
        Err(e) => Err(e.to_string()),
    }
}

/// LCD settings as seen by one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub address: u8,
    pub charmap: CharMap,
    pub refresh_seconds: u64,
    pub mode: DisplayMode,
    pub sensor_type: SensorKind,
    pub single_kettle: KettleId,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            charmap: CharMap::A00,
            refresh_seconds: DEFAULT_REFRESH_SECS,
            mode: DisplayMode::Multidisplay,
            sensor_type: SensorKind::OneWire,
            single_kettle: DEFAULT_SINGLE_KETTLE,
        }
    }
}

/// Settings plus every value that had to fall back to its default.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: DisplayConfig,
    pub issues: Vec<ParamError>,
}

fn field<T, F>(store: &dyn ParameterStore, spec: &ParameterSpec, fallback: T, parse: F, issues: &mut Vec<ParamError>) -> T
where
    F: Fn(&str) -> Result<T, String>,
{
    let raw = get_or_create(store, spec);
    match parse(&raw) {
        Ok(v) => v,
        Err(reason) => {
            issues.push(ParamError::Invalid { name: spec.name, value: raw, reason });
            fallback
        }
    }
}

impl DisplayConfig {
    pub fn load(store: &dyn ParameterStore) -> LoadedConfig {
        let d = DisplayConfig::default();
        let mut issues = Vec::new();
        let config = DisplayConfig {
            address: field(store, &ADDRESS_SPEC, d.address, parse_address, &mut issues),
            charmap: field(store, &CHARMAP_SPEC, d.charmap, |s| s.parse(), &mut issues),
            refresh_seconds: field(store, &REFRESH_SPEC, d.refresh_seconds, parse_refresh, &mut issues),
            mode: field(store, &MODE_SPEC, d.mode, |s| s.parse(), &mut issues),
            sensor_type: field(store, &SENSOR_TYPE_SPEC, d.sensor_type, |s| s.parse(), &mut issues),
            single_kettle: field(
                store,
                &SINGLE_KETTLE_SPEC,
                d.single_kettle,
                |s| s.trim().parse::<KettleId>().map_err(|e| e.to_string()),
                &mut issues,
            ),
        };
        LoadedConfig { config, issues }
    }

    /// Per-tick read; bad values are logged and replaced by defaults.
    pub fn read(store: &dyn ParameterStore) -> DisplayConfig {
        let loaded = Self::load(store);
        for issue in &loaded.issues {
            warn!("{}, using default", issue);
        }
        loaded.config
    }
}

/// Parameters kept in memory, for tests and embedding.
#[derive(Default)]
pub struct MemoryParameterStore {
    values: RwLock<BTreeMap<String, String>>,
    created: Mutex<Vec<&'static str>>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(name.to_string(), value.to_string());
        }
    }

    /// Names created through add(), in order.
    pub fn created(&self) -> Vec<&'static str> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ParameterStore for MemoryParameterStore {
    fn get(&self, name: &str) -> Result<Option<String>, ParamError> {
        let values = self.values.read().map_err(|_| ParamError::Poisoned)?;
        Ok(values.get(name).cloned())
    }

    fn add(&self, spec: &ParameterSpec) -> Result<(), ParamError> {
        self.values
            .write()
            .map_err(|_| ParamError::Poisoned)?
            .entry(spec.name.to_string())
            .or_insert_with(|| spec.default.to_string());
        self.created.lock().map_err(|_| ParamError::Poisoned)?.push(spec.name);
        Ok(())
    }
}

/// Flat YAML map of name -> value, read on every access so edits apply
/// on the next tick. Created parameters are written back.
pub struct FileParameterStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileParameterStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf(), write_lock: Mutex::new(()) }
    }

    fn read_map(&self) -> Result<BTreeMap<String, serde_yaml::Value>, ParamError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(ParamError::Io { path: self.path.clone(), source }),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_yaml::from_str(&text).map_err(|source| ParamError::Yaml { path: self.path.clone(), source })
    }
}

fn scalar_to_string(v: &serde_yaml::Value) -> Option<String> {
    match v {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl ParameterStore for FileParameterStore {
    fn get(&self, name: &str) -> Result<Option<String>, ParamError> {
        Ok(self.read_map()?.get(name).and_then(scalar_to_string))
    }

    fn add(&self, spec: &ParameterSpec) -> Result<(), ParamError> {
        let _guard = self.write_lock.lock().map_err(|_| ParamError::Poisoned)?;
        let mut map = self.read_map()?;
        map.entry(spec.name.to_string())
            .or_insert_with(|| serde_yaml::Value::String(spec.default.to_string()));
        let text = serde_yaml::to_string(&map)
            .map_err(|source| ParamError::Yaml { path: self.path.clone(), source })?;
        fs::write(&self.path, text).map_err(|source| ParamError::Io { path: self.path.clone(), source })
    }
}
