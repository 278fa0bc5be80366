/*
 *  display/mod.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - frames, surfaces and the view scheduler
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod frame;

// Surfaces
pub mod drivers;

// Display manager
pub mod manager;

// Line builders
pub mod components;

// View selection and scheduling
pub mod mode_controller;
pub mod workers;
pub mod scheduler;

// Re-exports for convenience
pub use traits::CharDisplay;
pub use error::DisplayError;
pub use frame::{Frame, LCD_COLS, LCD_ROWS};
pub use manager::{BoxedSurface, LcdManager};
pub use mode_controller::DisplayModeController;
pub use workers::{WorkerRegistry, WorkerTag};
pub use scheduler::Scheduler;

/// What the LCD is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Nothing brewing or fermenting
    Standby,
    /// All kettles in turn during a brew step
    Multidisplay,
    /// One configured kettle during a brew step
    Singledisplay,
    /// All sensors of one kind in turn during a brew step
    Sensordisplay,
    /// All fermenters in turn while a fermentation task runs
    FermentationMultidisplay,
}
