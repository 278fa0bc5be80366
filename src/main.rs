/*
 *  main.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
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

use anyhow::Context;
use env_logger::Env;
use log::{error, info, warn};
use tokio::signal::unix::{signal, SignalKind};

use brewlcd::config::{self, DriverKind};
use brewlcd::display::drivers::{ConsoleLcd, MockLcd};
use brewlcd::display::{BoxedSurface, LcdManager, Scheduler};
use brewlcd::host::FileHost;
use brewlcd::params::{DisplayConfig, FileParameterStore, ParameterStore};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

fn build_surface(driver: DriverKind, params: &dyn ParameterStore) -> BoxedSurface {
    match driver {
        DriverKind::Console => {
            // the address is only read at startup
            let address = DisplayConfig::read(params).address;
            Box::new(ConsoleLcd::new(address))
        }
        DriverKind::Mock => Box::new(MockLcd::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {} ({})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE, BUILD_PROFILE);
    info!(
        "state {}, parameters {}, tick {}ms, driver {:?}",
        cfg.state_file().display(),
        cfg.parameters_file().display(),
        cfg.tick_ms(),
        cfg.driver()
    );

    let host = Arc::new(FileHost::new(cfg.state_file()));
    let params = Arc::new(FileParameterStore::new(cfg.parameters_file()));
    let surface = build_surface(cfg.driver(), params.as_ref());
    let lcd = LcdManager::new(surface);

    let scheduler = Scheduler::new(host, params, lcd.clone());
    if !scheduler.start().await {
        warn!("LCD offline, ticking without output");
    }

    tokio::select! {
        res = signal_handler() => {
            if let Err(e) = res {
                error!("signal handling failed: {}", e);
            }
        }
        _ = scheduler.run(Duration::from_millis(cfg.tick_ms())) => {}
    }

    let stats = lcd.stats();
    info!("{} frames written, {} failed", stats.frames(), stats.failures());
    Ok(())
}
