/*
 *  display/mode_controller.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  View selection - picks the view for each tick from the brewery
 *  state and the configured display mode
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

use super::ViewKind;
use crate::model::Snapshot;
use crate::params::DisplayMode;
use std::time::Instant;

/// Display mode controller - determines which view to show from state
pub struct DisplayModeController {
    current_mode: ViewKind,
    last_mode_change: Instant,
}

impl Default for DisplayModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayModeController {
    /// Create a new display mode controller, starting in standby
    pub fn new() -> Self {
        Self {
            current_mode: ViewKind::Standby,
            last_mode_change: Instant::now(),
        }
    }

    /// Get current view
    pub fn current_mode(&self) -> ViewKind {
        self.current_mode
    }

    /// Priority: active brew step > active fermentation > standby
    pub fn determine_mode(snapshot: &Snapshot, configured: DisplayMode) -> ViewKind {
        if snapshot.active_step.is_some() {
            match configured {
                DisplayMode::Multidisplay => ViewKind::Multidisplay,
                DisplayMode::Singledisplay => ViewKind::Singledisplay,
                DisplayMode::Sensordisplay => ViewKind::Sensordisplay,
            }
        } else if snapshot.is_fermenting() {
            ViewKind::FermentationMultidisplay
        } else {
            ViewKind::Standby
        }
    }

    /// Determine and update the view for this tick
    /// Returns true if the view changed
    pub fn update_mode(&mut self, snapshot: &Snapshot, configured: DisplayMode) -> bool {
        let new_mode = Self::determine_mode(snapshot, configured);
        log::debug!("determined view: {:?}", new_mode);

        if new_mode != self.current_mode {
            log::info!(
                "Display mode changed: {:?} -> {:?} after {}s",
                self.current_mode,
                new_mode,
                self.time_since_mode_change().as_secs()
            );
            self.current_mode = new_mode;
            self.last_mode_change = Instant::now();
            true
        } else {
            false
        }
    }

    /// Time spent in the current view
    pub fn time_since_mode_change(&self) -> std::time::Duration {
        self.last_mode_change.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FermenterTask, ProcessStep, TaskState};

    fn fermenting(state: TaskState) -> Snapshot {
        Snapshot {
            fermenter_tasks: vec![FermenterTask { fermenter_id: 1, timer_start: None, state }],
            ..Default::default()
        }
    }

    #[test]
    fn test_active_step_follows_configured_mode() {
        let snap = Snapshot {
            active_step: Some(ProcessStep { name: "Mash In".to_string(), ..Default::default() }),
            ..fermenting(TaskState::Active)
        };
        assert_eq!(DisplayModeController::determine_mode(&snap, DisplayMode::Multidisplay), ViewKind::Multidisplay);
        assert_eq!(DisplayModeController::determine_mode(&snap, DisplayMode::Singledisplay), ViewKind::Singledisplay);
        assert_eq!(DisplayModeController::determine_mode(&snap, DisplayMode::Sensordisplay), ViewKind::Sensordisplay);
    }

    #[test]
    fn test_fermentation_beats_standby() {
        assert_eq!(
            DisplayModeController::determine_mode(&fermenting(TaskState::Active), DisplayMode::Singledisplay),
            ViewKind::FermentationMultidisplay
        );
        assert_eq!(
            DisplayModeController::determine_mode(&fermenting(TaskState::Done), DisplayMode::Multidisplay),
            ViewKind::Standby
        );
        assert_eq!(
            DisplayModeController::determine_mode(&Snapshot::default(), DisplayMode::Multidisplay),
            ViewKind::Standby
        );
    }

    #[test]
    fn test_mode_change_detection() {
        let mut controller = DisplayModeController::new();

        // Initial mode should be Standby
        assert_eq!(controller.current_mode(), ViewKind::Standby);

        // Idle brewery should not change (already Standby)
        assert!(!controller.update_mode(&Snapshot::default(), DisplayMode::Multidisplay));

        // Fermentation starts
        assert!(controller.update_mode(&fermenting(TaskState::Active), DisplayMode::Multidisplay));
        assert_eq!(controller.current_mode(), ViewKind::FermentationMultidisplay);

        // Second update with the same state should not change
        let before = controller.time_since_mode_change();
        assert!(!controller.update_mode(&fermenting(TaskState::Active), DisplayMode::Multidisplay));
        assert!(controller.time_since_mode_change() >= before);
    }

    #[test]
    fn test_dwell_time_resets_on_change() {
        let mut controller = DisplayModeController::new();
        std::thread::sleep(std::time::Duration::from_millis(30));
        assert!(controller.time_since_mode_change() >= std::time::Duration::from_millis(30));

        assert!(controller.update_mode(&fermenting(TaskState::Active), DisplayMode::Multidisplay));
        assert!(controller.time_since_mode_change() < std::time::Duration::from_millis(30));
    }
}
