/*
 *  display/components/fermenter.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fermentation view: one fermenter per frame with task timer,
 *  temperatures, gravity and heater/cooler indicators
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

use chrono::{DateTime, Utc};
use log::debug;

use crate::charmap::{encode, CharMap};
use crate::display::frame::{Frame, LCD_COLS};
use crate::glyphs::{COOLING, MUG};
use crate::model::{Fermenter, Snapshot};
use crate::timefmt::format_interval;

const HEATER_COL: usize = LCD_COLS - 3;
const WAITING_FOR_SPINDEL: &str = "waiting for iSpindel";
const SPECIFIC_GRAVITY: &str = "SG";

fn timer_line(f: &Fermenter, snap: &Snapshot, charmap: CharMap, now: DateTime<Utc>) -> String {
    let name = encode(&f.name, charmap);
    match snap.running_task(f.id).and_then(|t| t.timer_start) {
        Some(start) => format_interval(&name, (start - now).num_seconds().abs()),
        None => name.into_owned(),
    }
}

fn temperature_line(f: &Fermenter, snap: &Snapshot) -> String {
    match snap.sensor_value(f.sensor) {
        Some(v) => format!("Set|Act:{:5.1}°{:4.1}°{}", f.target_temp, v, snap.unit),
        None => {
            debug!("fermenter {} has no current sensor value", f.id);
            format!("Set|Act:{:5.1}° N/A °{}", f.target_temp, snap.unit)
        }
    }
}

/// Line 4 is only used when sensor2 is an iSpindel measuring gravity.
fn gravity_line(f: &Fermenter, snap: &Snapshot) -> String {
    let Some(sensor) = f.sensor2.and_then(|id| snap.sensor(id)) else {
        return String::new();
    };
    let Some(unit) = sensor.gravity_unit() else {
        return String::new();
    };
    match sensor.reading().filter(|v| *v != 0.0) {
        Some(v) if unit == Some(SPECIFIC_GRAVITY) => format!("Gravity:{:5.3}{}", v, SPECIFIC_GRAVITY),
        Some(v) => format!("Gravity:{:4.1}{}", v, unit.unwrap_or("")),
        None => WAITING_FOR_SPINDEL.to_string(),
    }
}

pub fn fermenter_frame(f: &Fermenter, snap: &Snapshot, charmap: CharMap, now: DateTime<Utc>) -> Frame {
    let line1 = encode(&f.brewname, charmap);
    let line2 = timer_line(f, snap, charmap, now);
    let line3 = temperature_line(f, snap);
    let line4 = gravity_line(f, snap);
    let mut frame = Frame::new([&line1, &line2, &line3, &line4]);

    // mug in column 18, three cooling cells right after it or in its place
    let heater = snap.actor_on(f.heater);
    if heater {
        frame.set_cell(0, HEATER_COL, MUG);
    }
    if snap.actor_on(f.cooler) {
        let first = if heater { HEATER_COL + 1 } else { HEATER_COL };
        frame.fill_cells(0, first..=LCD_COLS - 1, COOLING);
    }
    frame
}
