/*
 *  display/components/standby.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Idle screen: host version, brewery, address and wall clock
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

use chrono::NaiveDateTime;

use crate::charmap::{encode, CharMap};
use crate::display::frame::Frame;
use crate::model::Snapshot;

pub const PRODUCT_NAME: &str = "CraftBeerPi";
const NO_BREWERY: &str = "No Brewery";

/// `local_now` is wall clock time in the host's zone.
pub fn standby_frame(snap: &Snapshot, address: &str, charmap: CharMap, local_now: NaiveDateTime) -> Frame {
    let title = match snap.version.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => format!("{} {}", PRODUCT_NAME, v),
        None => PRODUCT_NAME.to_string(),
    };
    let brewery = snap
        .brewery_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(NO_BREWERY);
    let brewery = encode(brewery, charmap);
    let address = format!("IP: {}", address);
    let clock = local_now.format("%Y-%m-%d %H:%M:%S").to_string();
    Frame::new([&title, &brewery, &address, &clock])
}
