/*
 *  display/scheduler.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Tick driven view scheduler
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

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};
use tokio::time::{interval, sleep, MissedTickBehavior};

use super::components::{
    fermenter_frame, matching_sensors, multidisplay_frame, sensor_frame, singledisplay_frame, standby_frame,
};
use super::frame::Frame;
use super::manager::LcdManager;
use super::mode_controller::DisplayModeController;
use super::workers::{WorkerGuard, WorkerRegistry, WorkerTag};
use super::ViewKind;
use crate::host::{BreweryHost, Notification, NotificationKind};
use crate::model::{ProcessStep, Snapshot};
use crate::netaddr;
use crate::params::{DisplayConfig, ParamError, ParameterStore, PARAM_SENSOR_TYPE};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;
pub type AddressProbe = fn() -> String;

const SENSOR_TYPE_HEADLINE: &str = "LCD sensor type";
const SENSOR_TYPE_TIMEOUT: Duration = Duration::from_secs(30);

/// What a scan worker carries off the tick.
#[derive(Clone)]
struct ScanContext {
    host: Arc<dyn BreweryHost>,
    lcd: LcdManager,
    clock: Clock,
    config: DisplayConfig,
}

impl ScanContext {
    /// Fresh state for the next item; the scan's first snapshot stands in
    /// when the host cannot deliver.
    fn refresh(&self, fallback: &Snapshot) -> Snapshot {
        match self.host.snapshot() {
            Ok(s) => s,
            Err(e) => {
                debug!("snapshot refresh failed mid scan: {}", e);
                fallback.clone()
            }
        }
    }

    async fn show(&self, what: &str, frame: &Frame) {
        if let Err(e) = self.lcd.present(frame, true).await {
            warn!("{}: frame not written: {}", what, e);
        }
    }

    async fn pace(&self) {
        sleep(Duration::from_secs(self.config.refresh_seconds)).await;
    }
}

pub struct Scheduler {
    host: Arc<dyn BreweryHost>,
    params: Arc<dyn ParameterStore>,
    lcd: LcdManager,
    workers: Arc<WorkerRegistry>,
    controller: DisplayModeController,
    blink: bool,
    address_probe: AddressProbe,
    clock: Clock,
}

impl Scheduler {
    pub fn new(host: Arc<dyn BreweryHost>, params: Arc<dyn ParameterStore>, lcd: LcdManager) -> Self {
        Self {
            host,
            params,
            lcd,
            workers: WorkerRegistry::new(),
            controller: DisplayModeController::new(),
            blink: false,
            address_probe: netaddr::local_address,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_address_probe(mut self, probe: AddressProbe) -> Self {
        self.address_probe = probe;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn lcd(&self) -> &LcdManager {
        &self.lcd
    }

    pub fn workers(&self) -> &Arc<WorkerRegistry> {
        &self.workers
    }

    /// Read the parameters once, report bad ones and bring up the LCD.
    /// Returns whether the display is online.
    pub async fn start(&self) -> bool {
        let loaded = DisplayConfig::load(self.params.as_ref());
        for issue in &loaded.issues {
            warn!("{}, using default", issue);
            if let ParamError::Invalid { name, .. } = issue {
                if *name == PARAM_SENSOR_TYPE {
                    self.host.notify(Notification {
                        headline: SENSOR_TYPE_HEADLINE.to_string(),
                        message: issue.to_string(),
                        kind: NotificationKind::Warning,
                        timeout: Some(SENSOR_TYPE_TIMEOUT),
                    });
                }
            }
        }
        let cfg = &loaded.config;
        info!(
            "LCD address {:#04x}, charmap {}, refresh {}s, mode {}, sensor type {}, single kettle {}",
            cfg.address, cfg.charmap, cfg.refresh_seconds, cfg.mode, cfg.sensor_type, cfg.single_kettle
        );
        self.lcd.open(cfg.address, self.host.as_ref()).await
    }

    /// One scheduling pass. Returns the view dispatched, None when the host
    /// had nothing to offer.
    pub async fn tick(&mut self) -> Option<ViewKind> {
        let snap = match self.host.snapshot() {
            Ok(s) => s,
            Err(e) => {
                warn!("no brewery state this tick: {}", e);
                return None;
            }
        };
        let config = DisplayConfig::read(self.params.as_ref());
        self.controller.update_mode(&snap, config.mode);
        let view = self.controller.current_mode();

        match view {
            ViewKind::Multidisplay | ViewKind::FermentationMultidisplay => self.launch_scan(view, snap, config),
            ViewKind::Singledisplay => self.show_single(&snap, &config).await,
            ViewKind::Sensordisplay => self.sensor_scan(snap, &config).await,
            ViewKind::Standby => self.show_standby(&snap, &config).await,
        }
        Some(view)
    }

    /// Tick forever at `period`. A long tick delays the next one.
    pub async fn run(mut self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    fn scan_context(&self, config: DisplayConfig) -> ScanContext {
        ScanContext {
            host: Arc::clone(&self.host),
            lcd: self.lcd.clone(),
            clock: Arc::clone(&self.clock),
            config,
        }
    }

    fn launch_scan(&self, view: ViewKind, snap: Snapshot, config: DisplayConfig) {
        let tag = match view {
            ViewKind::FermentationMultidisplay => WorkerTag::FermentationMultidisplay,
            _ => WorkerTag::Multidisplay,
        };
        let Some(guard) = self.workers.try_claim(tag) else {
            return;
        };
        let ctx = self.scan_context(config);
        match tag {
            WorkerTag::Multidisplay => {
                let Some(step) = snap.active_step.clone() else {
                    return;
                };
                debug!("starting kettle scan for step '{}'", step.name);
                tokio::spawn(kettle_scan(ctx, step, snap, guard));
            }
            WorkerTag::FermentationMultidisplay => {
                debug!("starting fermenter scan");
                tokio::spawn(fermenter_scan(ctx, snap, guard));
            }
        }
    }

    async fn show_single(&mut self, snap: &Snapshot, config: &DisplayConfig) {
        let Some(step) = snap.active_step.as_ref() else {
            return;
        };
        let (frame, shown) =
            singledisplay_frame(step, config.single_kettle, snap, config.charmap, (self.clock)(), self.blink);
        self.blink = shown;
        if let Err(e) = self.lcd.present(&frame, false).await {
            warn!("Singledisplay frame not written: {}", e);
        }
    }

    /// Runs inside the tick; the next tick waits for it.
    async fn sensor_scan(&self, snap: Snapshot, config: &DisplayConfig) {
        let ids = matching_sensors(&snap, config.sensor_type);
        if ids.is_empty() {
            debug!("no {} sensors to show", config.sensor_type);
            return;
        }
        let ctx = self.scan_context(config.clone());
        for id in ids {
            let current = ctx.refresh(&snap);
            match current.sensor(id) {
                Some(sensor) => {
                    let frame = sensor_frame(sensor, current.read_sensor(id), config.charmap);
                    ctx.show(&format!("sensor {}", id), &frame).await;
                }
                None => warn!("sensor {} disappeared during scan", id),
            }
            ctx.pace().await;
        }
    }

    async fn show_standby(&self, snap: &Snapshot, config: &DisplayConfig) {
        let address = (self.address_probe)();
        let local = (self.clock)().with_timezone(&Local).naive_local();
        let frame = standby_frame(snap, &address, config.charmap, local);
        if let Err(e) = self.lcd.present(&frame, false).await {
            warn!("standby frame not written: {}", e);
        }
    }
}

/// Every kettle once, against the step that was active when the scan began.
async fn kettle_scan(ctx: ScanContext, step: ProcessStep, first: Snapshot, _guard: WorkerGuard) {
    for id in first.kettle_ids() {
        let current = ctx.refresh(&first);
        match current.kettle(id) {
            Some(kettle) => {
                let frame = multidisplay_frame(&step, kettle, &current, ctx.config.charmap, (ctx.clock)());
                ctx.show(&format!("kettle {}", id), &frame).await;
            }
            None => warn!("kettle {} disappeared during scan", id),
        }
        ctx.pace().await;
    }
}

async fn fermenter_scan(ctx: ScanContext, first: Snapshot, _guard: WorkerGuard) {
    for id in first.fermenter_ids() {
        let current = ctx.refresh(&first);
        match current.fermenter(id) {
            Some(fermenter) => {
                let frame = fermenter_frame(fermenter, &current, ctx.config.charmap, (ctx.clock)());
                ctx.show(&format!("fermenter {}", id), &frame).await;
            }
            None => warn!("fermenter {} disappeared during scan", id),
        }
        ctx.pace().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::MockLcd;
    use crate::host::StaticHost;
    use crate::model::{Kettle, TempUnit};
    use crate::params::{MemoryParameterStore, PARAM_MODE, PARAM_REFRESH};
    use chrono::TimeZone;

    fn fixed_clock() -> Clock {
        Arc::new(|| Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap())
    }

    fn brewing() -> Snapshot {
        Snapshot {
            active_step: Some(ProcessStep { name: "Mash In".to_string(), ..Default::default() }),
            kettles: vec![
                Kettle { id: 1, name: "Mash".to_string(), sensor: None, heater: None, target_temp: 65.0 },
                Kettle { id: 2, name: "Boil".to_string(), sensor: None, heater: None, target_temp: 100.0 },
            ],
            unit: TempUnit::C,
            ..Default::default()
        }
    }

    async fn scheduler(snap: Snapshot, mode: &str) -> (Scheduler, MockLcd, Arc<StaticHost>) {
        let host = Arc::new(StaticHost::new(snap));
        let params = Arc::new(MemoryParameterStore::new().with(PARAM_MODE, mode).with(PARAM_REFRESH, "1"));
        let mock = MockLcd::new();
        let lcd = LcdManager::new(Box::new(mock.clone()));
        let sched = Scheduler::new(host.clone(), params, lcd)
            .with_clock(fixed_clock())
            .with_address_probe(|| "10.0.0.7".to_string());
        assert!(sched.start().await);
        (sched, mock, host)
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_brewery_shows_standby() {
        let (mut sched, mock, _) = scheduler(Snapshot::default(), "Multidisplay").await;
        assert_eq!(sched.tick().await, Some(ViewKind::Standby));
        assert_eq!(mock.rows()[2], "IP: 10.0.0.7        ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_failure_skips_tick() {
        let (mut sched, mock, host) = scheduler(Snapshot::default(), "Multidisplay").await;
        host.set_offline(Some("restarting"));
        assert_eq!(sched.tick().await, None);
        assert_eq!(mock.state().lock().unwrap().history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_multidisplay_scans_every_kettle() {
        let (mut sched, mock, _) = scheduler(brewing(), "Multidisplay").await;
        assert_eq!(sched.tick().await, Some(ViewKind::Multidisplay));
        assert!(sched.workers().is_running(WorkerTag::Multidisplay));

        sleep(Duration::from_secs(5)).await;
        assert!(!sched.workers().is_running(WorkerTag::Multidisplay));

        let state = mock.state();
        let state = state.lock().unwrap();
        // one history entry from open, then one per kettle
        let kettle_lines: Vec<_> = state.history.iter().skip(1).map(|h| h[1].clone()).collect();
        assert_eq!(kettle_lines.len(), 2);
        assert!(kettle_lines[0].starts_with("Mash"));
        assert!(kettle_lines[1].starts_with("Boil"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_sensor_type_notifies_once() {
        let host = Arc::new(StaticHost::new(Snapshot::default()));
        let params = Arc::new(MemoryParameterStore::new().with(PARAM_SENSOR_TYPE, "Thermocouple"));
        let lcd = LcdManager::new(Box::new(MockLcd::new()));
        let mut sched = Scheduler::new(host.clone(), params, lcd).with_address_probe(|| "x".to_string());
        sched.start().await;
        sched.tick().await;
        sched.tick().await;
        let notes = host.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Warning);
        assert!(notes[0].message.contains("Thermocouple"));
    }
}
