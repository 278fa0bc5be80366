/*
 *  display/components/mod.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Line builders, one module per view
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

pub mod kettle;
pub mod sensor;
pub mod fermenter;
pub mod standby;

// Re-exports
pub use kettle::{multidisplay_frame, singledisplay_frame};
pub use sensor::{matching_sensors, sensor_frame};
pub use fermenter::fermenter_frame;
pub use standby::standby_frame;
