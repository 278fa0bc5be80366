/*
 *  timefmt.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Countdown and elapsed-time formatting for 20 column lines
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

use crate::display::frame::LCD_COLS;

pub const MINUTE: i64 = 60;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;
pub const WEEK: i64 = 7 * DAY;

/// Label width when the time part carries weeks or days.
const LABEL_WIDTH_LONG: usize = 7;
/// Label width when the time part is plain HH:MM:SS.
const LABEL_WIDTH_SHORT: usize = 10;

/// Converts seconds into "HH:MM:SS". Negative input shows as 00:00:00.
///
/// Hours are not wrapped, a 25 hour countdown reads "25:00:00".
pub fn format_hms(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    let hours = secs / HOUR;
    let minutes = (secs % HOUR) / MINUTE;
    let seconds = secs % MINUTE;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Broken down interval, most significant unit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Interval {
    pub fn from_seconds(total_seconds: i64) -> Self {
        let mut rest = total_seconds.max(0);
        let weeks = rest / WEEK;
        rest %= WEEK;
        let days = rest / DAY;
        rest %= DAY;
        let hours = rest / HOUR;
        rest %= HOUR;
        let minutes = rest / MINUTE;
        let seconds = rest % MINUTE;
        Self { weeks, days, hours, minutes, seconds }
    }
}

fn fit_label(label: &str, width: usize) -> String {
    let mut out: String = label.chars().take(width).collect();
    let used = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

/// Formats `"<label> <time>"` for a single 20 column line.
///
/// The longer the interval, the less precision and the shorter the label:
/// weeks drop the seconds, days keep them, and under a day the label gets
/// ten columns.
pub fn format_interval(label: &str, seconds: i64) -> String {
    let iv = Interval::from_seconds(seconds);
    let line = if iv.weeks >= 1 {
        format!(
            "{} W{} D{} {:02}:{:02}",
            fit_label(label, LABEL_WIDTH_LONG),
            iv.weeks,
            iv.days,
            iv.hours,
            iv.minutes
        )
    } else if iv.days >= 1 {
        format!(
            "{} D{} {:02}:{:02}:{:02}",
            fit_label(label, LABEL_WIDTH_LONG),
            iv.days,
            iv.hours,
            iv.minutes,
            iv.seconds
        )
    } else {
        format!(
            "{} {:02}:{:02}:{:02}",
            fit_label(label, LABEL_WIDTH_SHORT),
            iv.hours,
            iv.minutes,
            iv.seconds
        )
    };
    line.chars().take(LCD_COLS).collect()
}
