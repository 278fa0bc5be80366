/*
 *  display/workers.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Registry of background scan workers, at most one alive per view
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

use log::debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Views whose scans outlive a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerTag {
    Multidisplay,
    FermentationMultidisplay,
}

impl WorkerTag {
    fn index(self) -> usize {
        match self {
            WorkerTag::Multidisplay => 0,
            WorkerTag::FermentationMultidisplay => 1,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    running: AtomicBool,
    launches: AtomicU64,
}

/// One flag per tag, claimed with compare-and-swap.
#[derive(Debug, Default)]
pub struct WorkerRegistry {
    slots: [Slot; 2],
}

impl WorkerRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the tag. None while another worker holds it.
    pub fn try_claim(self: &Arc<Self>, tag: WorkerTag) -> Option<WorkerGuard> {
        let slot = &self.slots[tag.index()];
        if slot
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("{:?} worker already running, not spawning new", tag);
            return None;
        }
        slot.launches.fetch_add(1, Ordering::Relaxed);
        Some(WorkerGuard { registry: Arc::clone(self), tag })
    }

    pub fn is_running(&self, tag: WorkerTag) -> bool {
        self.slots[tag.index()].running.load(Ordering::Acquire)
    }

    /// How many workers have been started for the tag
    pub fn launches(&self, tag: WorkerTag) -> u64 {
        self.slots[tag.index()].launches.load(Ordering::Relaxed)
    }
}

/// Held by a running worker; the tag is free again once dropped.
#[derive(Debug)]
pub struct WorkerGuard {
    registry: Arc<WorkerRegistry>,
    tag: WorkerTag,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.registry.slots[self.tag.index()].running.store(false, Ordering::Release);
        debug!("{:?} worker finished", self.tag);
    }
}
