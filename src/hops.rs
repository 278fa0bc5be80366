/*
 *  hops.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Countdown to the next hop addition during the boil
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

use crate::model::ProcessStep;
use crate::timefmt::{format_hms, MINUTE};

/// Hop offsets count minutes left in the boil when the addition is due.
/// Only whole minutes count; anything else is skipped.
fn parse_offset(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Seconds until the next hop addition, or None when nothing is pending.
pub fn next_hop_countdown(step: &ProcessStep, seconds_remaining: i64) -> Option<i64> {
    if !step.is_boil() || step.timer_end.is_none() {
        return None;
    }
    step.hop_offsets()
        .into_iter()
        .flatten()
        .filter_map(parse_offset)
        .filter_map(|minutes| minutes.checked_mul(MINUTE).and_then(|s| seconds_remaining.checked_sub(s)))
        .filter(|&candidate| candidate > 0)
        .min()
}

/// The countdown as `HH:MM:SS`.
pub fn next_hop_alert(step: &ProcessStep, seconds_remaining: i64) -> Option<String> {
    next_hop_countdown(step, seconds_remaining).map(format_hms)
}
