/*
 *  display/components/kettle.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Kettle views, one kettle per frame, used by the multi and single
 *  kettle displays while a brew step is active
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
use log::{debug, warn};

use crate::charmap::{encode, CharMap};
use crate::display::frame::{fit_to, Frame, LCD_COLS};
use crate::glyphs::MUG;
use crate::hops::next_hop_alert;
use crate::model::{Kettle, KettleId, ProcessStep, Snapshot};
use crate::timefmt::format_hms;

/// Kettle name width when the step countdown shares line 2
const KETTLE_NAME_WIDTH: usize = 11;
const HEATER_COL: usize = LCD_COLS - 1;
const NO_KETTLE: &str = "no kettle name";

fn step_line(step: &ProcessStep, charmap: CharMap) -> String {
    encode(&step.name, charmap).into_owned()
}

fn kettle_line(step: &ProcessStep, kettle: &Kettle, charmap: CharMap, now: DateTime<Utc>) -> String {
    let name = encode(&kettle.name, charmap);
    match step.seconds_remaining(now) {
        Some(remaining) => format!("{} {}", fit_to(&name, KETTLE_NAME_WIDTH), format_hms(remaining)),
        None => name.into_owned(),
    }
}

/// Lines 3 and 4: target against actual, or boil setpoint and hop countdown.
fn temperature_lines(step: &ProcessStep, kettle: &Kettle, snap: &Snapshot, now: DateTime<Utc>) -> (String, String) {
    let unit = snap.unit;
    let current = snap.sensor_value(kettle.sensor);
    if current.is_none() {
        debug!("kettle {} has no current sensor value", kettle.id);
    }

    if !step.is_boil() {
        let line3 = format!("Targ. Temp:{:6.2}°{}", kettle.target_temp, unit);
        let line4 = match current {
            Some(v) => format!("Curr. Temp:{:6.2}°{}", v, unit),
            None => "Curr. Temp: No Data".to_string(),
        };
        return (line3, line4);
    }

    let line3 = match current {
        Some(v) => format!("Set|Act:{:4.0}|{:5.1}°{}", kettle.target_temp, v, unit),
        None => format!("Set|Act:{:4.0}| N/A °{}", kettle.target_temp, unit),
    };
    let line4 = step
        .seconds_remaining(now)
        .and_then(|remaining| next_hop_alert(step, remaining))
        .map(|alert| format!("Add Hop in: {}", alert))
        .unwrap_or_default();
    (line3, line4)
}

fn kettle_frame(step: &ProcessStep, kettle: &Kettle, snap: &Snapshot, charmap: CharMap, now: DateTime<Utc>) -> Frame {
    let line1 = step_line(step, charmap);
    let line2 = kettle_line(step, kettle, charmap, now);
    let (line3, line4) = temperature_lines(step, kettle, snap, now);
    Frame::new([&line1, &line2, &line3, &line4])
}

/// One slot of the multi kettle scan. The heater mug sits in the last
/// column of line 1 while the kettle's heater is on.
pub fn multidisplay_frame(
    step: &ProcessStep,
    kettle: &Kettle,
    snap: &Snapshot,
    charmap: CharMap,
    now: DateTime<Utc>,
) -> Frame {
    let mut frame = kettle_frame(step, kettle, snap, charmap, now);
    if snap.actor_on(kettle.heater) {
        frame.set_cell(0, HEATER_COL, MUG);
    }
    frame
}

/// The configured kettle, redrawn every tick.
///
/// `blink` is the mug state shown on the previous tick. The mug appears
/// only on every other tick while the heater runs, so the returned flag
/// is what to pass in next time.
pub fn singledisplay_frame(
    step: &ProcessStep,
    kettle_id: KettleId,
    snap: &Snapshot,
    charmap: CharMap,
    now: DateTime<Utc>,
    blink: bool,
) -> (Frame, bool) {
    let Some(kettle) = snap.kettle(kettle_id) else {
        warn!("kettle {} configured for Singledisplay does not exist", kettle_id);
        let line1 = step_line(step, charmap);
        return (Frame::new([&line1, NO_KETTLE, "", ""]), false);
    };

    let mut frame = kettle_frame(step, kettle, snap, charmap, now);
    let show = !blink && snap.actor_on(kettle.heater);
    frame.set_cell(0, HEATER_COL, if show { MUG } else { ' ' });
    (frame, show)
}
