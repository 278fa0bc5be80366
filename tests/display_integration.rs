/*
 *  tests/display_integration.rs
 *
 *  Integration tests for the display pipeline: host state in, LCD rows out
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 */

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use brewlcd::display::drivers::MockLcd;
use brewlcd::display::manager::ADDRESS_HEADLINE;
use brewlcd::display::scheduler::Clock;
use brewlcd::display::{LcdManager, Scheduler, ViewKind, WorkerTag};
use brewlcd::host::{BreweryHost, HostError, Notification, NotificationKind, StaticHost};
use brewlcd::model::{
    Actor, Fermenter, FermenterTask, Kettle, ProcessStep, Sensor, SensorConfig, Snapshot, TaskState, TempUnit,
};
use brewlcd::params::{
    MemoryParameterStore, PARAM_MODE, PARAM_REFRESH, PARAM_SENSOR_TYPE, PARAM_SINGLE_KETTLE,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

fn clock() -> Clock {
    Arc::new(now)
}

fn kettle(id: u32, name: &str, sensor: u32, target: f64) -> Kettle {
    Kettle { id, name: name.to_string(), sensor: Some(sensor), heater: Some(100 + id), target_temp: target }
}

fn onewire(id: u32, name: &str, value: &str) -> Sensor {
    Sensor { id, name: name.to_string(), config: SensorConfig::OneWire, value: Some(value.to_string()) }
}

fn boil_day() -> Snapshot {
    Snapshot {
        active_step: Some(ProcessStep {
            name: "Boil".to_string(),
            timer_end: Some(now() + chrono::Duration::seconds(5400)),
            hop_1: Some("80".to_string()),
            ..Default::default()
        }),
        kettles: vec![kettle(1, "Sudkessel", 7, 100.0), kettle(2, "Maische", 8, 65.0)],
        sensors: vec![onewire(7, "Wort", "97.3"), onewire(8, "Mash", "64.8")],
        actors: vec![Actor { id: 101, state: 0 }, Actor { id: 102, state: 0 }],
        unit: TempUnit::C,
        ..Default::default()
    }
}

fn fermenting() -> Snapshot {
    Snapshot {
        fermenters: vec![
            Fermenter {
                id: 1,
                brewname: "Helles".to_string(),
                name: "Tank 1".to_string(),
                sensor: Some(7),
                sensor2: None,
                heater: None,
                cooler: None,
                target_temp: 10.0,
            },
            Fermenter {
                id: 2,
                brewname: "Weizen".to_string(),
                name: "Tank 2".to_string(),
                sensor: Some(8),
                sensor2: None,
                heater: None,
                cooler: None,
                target_temp: 18.0,
            },
        ],
        fermenter_tasks: vec![FermenterTask { fermenter_id: 1, timer_start: None, state: TaskState::Active }],
        sensors: vec![onewire(7, "Tank 1", "10.2"), onewire(8, "Tank 2", "18.1")],
        unit: TempUnit::C,
        ..Default::default()
    }
}

async fn rig(snap: Snapshot, params: MemoryParameterStore) -> (Scheduler, MockLcd, Arc<StaticHost>) {
    let host = Arc::new(StaticHost::new(snap));
    let mock = MockLcd::new();
    let lcd = LcdManager::new(Box::new(mock.clone()));
    let scheduler = Scheduler::new(host.clone(), Arc::new(params), lcd)
        .with_clock(clock())
        .with_address_probe(|| "192.168.178.40".to_string());
    assert!(scheduler.start().await);
    (scheduler, mock, host)
}

#[tokio::test(start_paused = true)]
async fn test_singledisplay_boil_end_to_end() {
    let params = MemoryParameterStore::new()
        .with(PARAM_MODE, "Singledisplay")
        .with(PARAM_SINGLE_KETTLE, "1");
    let (mut scheduler, mock, _) = rig(boil_day(), params).await;

    assert_eq!(scheduler.tick().await, Some(ViewKind::Singledisplay));
    let rows = mock.rows();
    assert_eq!(rows[0], "Boil                ");
    assert_eq!(rows[1], "Sudkessel   01:30:00");
    assert_eq!(rows[2], "Set|Act: 100| 97.3°C");
    assert_eq!(rows[3], "Add Hop in: 00:10:00");

    // rendered in place, no clear after the one at open
    assert_eq!(mock.state().lock().unwrap().clear_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_singledisplay_mug_blinks_across_ticks() {
    let params = MemoryParameterStore::new().with(PARAM_MODE, "Singledisplay");
    let (mut scheduler, mock, host) = rig(boil_day(), params).await;
    host.update(|s| s.actors[0].state = 1);

    let mut column = Vec::new();
    for _ in 0..4 {
        scheduler.tick().await;
        column.push(mock.rows()[0].chars().nth(19));
    }
    assert_eq!(column, vec![Some('\u{0}'), Some(' '), Some('\u{0}'), Some(' ')]);
}

#[tokio::test(start_paused = true)]
async fn test_one_multidisplay_worker_at_a_time() {
    let params = MemoryParameterStore::new().with(PARAM_MODE, "Multidisplay").with(PARAM_REFRESH, "2");
    let (mut scheduler, mock, _) = rig(boil_day(), params).await;
    let workers = Arc::clone(scheduler.workers());

    assert_eq!(scheduler.tick().await, Some(ViewKind::Multidisplay));
    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(700)).await;
        scheduler.tick().await;
    }
    assert!(workers.is_running(WorkerTag::Multidisplay));
    assert_eq!(workers.launches(WorkerTag::Multidisplay), 1);

    // two kettles at two seconds each
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!workers.is_running(WorkerTag::Multidisplay));

    scheduler.tick().await;
    assert_eq!(workers.launches(WorkerTag::Multidisplay), 2);

    let state = mock.state();
    let state = state.lock().unwrap();
    let shown: Vec<&str> = state.history.iter().skip(1).map(|rows| rows[1].as_str()).collect();
    assert!(shown[0].starts_with("Sudkessel"));
    assert!(shown[1].starts_with("Maische"));
}

#[tokio::test(start_paused = true)]
async fn test_fermentation_scan_survives_write_failures() {
    let (mut scheduler, mock, _) = rig(fermenting(), MemoryParameterStore::new().with(PARAM_REFRESH, "1")).await;
    mock.state().lock().unwrap().simulate_write_failure = true;

    assert_eq!(scheduler.tick().await, Some(ViewKind::FermentationMultidisplay));
    tokio::time::sleep(Duration::from_secs(3)).await;

    let workers = scheduler.workers();
    assert!(!workers.is_running(WorkerTag::FermentationMultidisplay));
    assert_eq!(scheduler.lcd().stats().failures(), 2);

    mock.state().lock().unwrap().simulate_write_failure = false;
    scheduler.tick().await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(scheduler.lcd().stats().frames(), 2);
    assert_eq!(mock.rows()[0], "Weizen              ");
}

#[tokio::test(start_paused = true)]
async fn test_sensordisplay_runs_inside_tick() {
    let params = MemoryParameterStore::new()
        .with(PARAM_MODE, "Sensordisplay")
        .with(PARAM_SENSOR_TYPE, "ONE_WIRE_SENSOR")
        .with(PARAM_REFRESH, "1");
    let (mut scheduler, mock, _) = rig(boil_day(), params).await;

    assert_eq!(scheduler.tick().await, Some(ViewKind::Sensordisplay));
    // both sensors were shown before tick returned
    assert_eq!(scheduler.lcd().stats().frames(), 2);
    let rows = mock.rows();
    assert_eq!(rows[0], "CBPi3 LCD Sensormode");
    assert!(rows[2].starts_with("Mash"));
}

/// Hands out queued snapshots in order, repeating the last one.
struct ScriptedHost {
    queue: Mutex<VecDeque<Snapshot>>,
}

impl ScriptedHost {
    fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { queue: Mutex::new(snapshots.into()) }
    }
}

impl BreweryHost for ScriptedHost {
    fn snapshot(&self) -> Result<Snapshot, HostError> {
        let mut queue = self.queue.lock().unwrap();
        match queue.len() {
            0 => Err(HostError::Unavailable("script empty".to_string())),
            1 => Ok(queue[0].clone()),
            _ => Ok(queue.pop_front().unwrap()),
        }
    }

    fn notify(&self, _notification: Notification) {}
}

#[tokio::test(start_paused = true)]
async fn test_sensordisplay_mixed_sensors() {
    let mut full = boil_day();
    full.sensors = vec![
        onewire(1, "Keller", "12.5"),
        Sensor { id: 2, name: "Würze".to_string(), config: SensorConfig::OneWire, value: None },
        Sensor { id: 3, name: "Feuchte".to_string(), config: SensorConfig::Unknown, value: Some("55".to_string()) },
        onewire(4, "Kühlung", "4.0"),
        onewire(5, "Spüle", "21.0"),
    ];
    // sensor 5 is gone by the time its turn comes
    let mut shrunk = full.clone();
    shrunk.sensors.retain(|s| s.id != 5);
    // one snapshot for the tick, then one per scanned sensor
    let host = Arc::new(ScriptedHost::new(vec![full.clone(), full.clone(), full.clone(), full, shrunk]));

    let mock = MockLcd::new();
    let lcd = LcdManager::new(Box::new(mock.clone()));
    let params = MemoryParameterStore::new()
        .with(PARAM_MODE, "Sensordisplay")
        .with(PARAM_SENSOR_TYPE, "ONE_WIRE_SENSOR")
        .with(PARAM_REFRESH, "2");
    let mut scheduler = Scheduler::new(host, Arc::new(params), lcd).with_clock(clock());
    assert!(scheduler.start().await);

    let started = tokio::time::Instant::now();
    assert_eq!(scheduler.tick().await, Some(ViewKind::Sensordisplay));
    // every matching sensor is paced, the vanished one included
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(8) && elapsed < Duration::from_secs(9), "{:?}", elapsed);

    assert_eq!(scheduler.lcd().stats().frames(), 3);
    assert_eq!(scheduler.lcd().stats().failures(), 0);

    let state = mock.state();
    let state = state.lock().unwrap();
    let frames: Vec<&[String; 4]> = state.history.iter().skip(1).collect();
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame[0], "CBPi3 LCD Sensormode");
        assert_eq!(frame[1], "--------------------");
    }
    assert_eq!(frames[0][2], "Keller              ");
    assert_eq!(frames[0][3], "12.5                ");
    assert_eq!(frames[1][2], "Würze               ");
    assert_eq!(frames[1][3], "No Data             ");
    assert_eq!(frames[2][2], "Kühlung             ");
    assert_eq!(frames[2][3], "4.0                 ");
    // each frame starts from a cleared screen
    assert_eq!(state.clear_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_standby_shows_address() {
    let snap = Snapshot {
        brewery_name: Some("Garage Brewing".to_string()),
        version: Some("3.0".to_string()),
        ..Default::default()
    };
    let (mut scheduler, mock, _) = rig(snap, MemoryParameterStore::new()).await;

    assert_eq!(scheduler.tick().await, Some(ViewKind::Standby));
    let rows = mock.rows();
    assert_eq!(rows[0], "CraftBeerPi 3.0     ");
    assert_eq!(rows[1], "Garage Brewing      ");
    assert_eq!(rows[2], "IP: 192.168.178.40  ");
}

#[tokio::test(start_paused = true)]
async fn test_init_failure_keeps_ticking_offline() {
    let host = Arc::new(StaticHost::new(boil_day()));
    let mock = MockLcd::new();
    mock.state().lock().unwrap().simulate_init_failure = true;
    let lcd = LcdManager::new(Box::new(mock.clone()));
    let params = MemoryParameterStore::new().with(PARAM_MODE, "Singledisplay");
    let mut scheduler = Scheduler::new(host.clone(), Arc::new(params), lcd).with_clock(clock());

    assert!(!scheduler.start().await);
    let notes = host.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].headline, ADDRESS_HEADLINE);
    assert_eq!(notes[0].kind, NotificationKind::Danger);

    assert_eq!(scheduler.tick().await, Some(ViewKind::Singledisplay));
    assert_eq!(scheduler.lcd().stats().frames(), 0);
    assert_eq!(mock.state().lock().unwrap().write_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_parameters_created_with_defaults() {
    let params = Arc::new(MemoryParameterStore::new());
    let host = Arc::new(StaticHost::new(Snapshot::default()));
    let lcd = LcdManager::new(Box::new(MockLcd::new()));
    let scheduler = Scheduler::new(host, params.clone(), lcd).with_address_probe(|| "x".to_string());
    scheduler.start().await;

    let mut created = params.created();
    created.sort_unstable();
    assert_eq!(
        created,
        vec![
            "LCD_Address",
            "LCD_Charactermap",
            "LCD_Display_Mode",
            "LCD_Display_Sensortype",
            "LCD_Refresh",
            "LCD_Singledisplay",
        ]
    );
}
