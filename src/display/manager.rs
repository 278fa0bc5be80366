/*
 *  display/manager.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Shared handle on the character surface: startup, glyph upload and
 *  frame presentation under one lock
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

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::Mutex as TokMutex;

use crate::display::error::DisplayError;
use crate::display::frame::Frame;
use crate::display::traits::CharDisplay;
use crate::glyphs::GLYPH_TABLE;
use crate::host::{BreweryHost, Notification, NotificationKind};

pub type BoxedSurface = Box<dyn CharDisplay>;

pub const ADDRESS_HEADLINE: &str = "LCD Address is wrong";
pub const ADDRESS_HINT: &str =
    "Change LCD Address in parameters, to detect the address enter in a Raspi command prompt: sudo i2cdetect -y 1";

/// Counters for what went out to the surface
#[derive(Debug, Default)]
pub struct FrameStats {
    frames: AtomicU64,
    failures: AtomicU64,
}

impl FrameStats {
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Cloneable handle on the one physical display
///
/// Every clone shares the surface lock, so the four rows of one frame are
/// always written together. Until `open` succeeds the handle is offline and
/// presenting is a silent no-op.
#[derive(Clone)]
pub struct LcdManager {
    surface: Arc<TokMutex<BoxedSurface>>,
    online: Arc<AtomicBool>,
    stats: Arc<FrameStats>,
}

impl LcdManager {
    pub fn new(surface: BoxedSurface) -> Self {
        Self {
            surface: Arc::new(TokMutex::new(surface)),
            online: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(FrameStats::default()),
        }
    }

    /// Initialize the surface and upload the glyph table.
    ///
    /// A failure is reported to the brewer as a persistent notification and
    /// leaves the handle offline; the caller keeps running either way.
    pub async fn open(&self, address: u8, host: &dyn BreweryHost) -> bool {
        let mut surface = self.surface.lock().await;
        match init_surface(surface.as_mut()) {
            Ok(()) => {
                info!("LCD ready at {:#04x}, {} glyphs loaded", address, GLYPH_TABLE.len());
                self.online.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                error!("wrong LCD address {:#04x}: {}", address, e);
                host.notify(Notification::persistent(NotificationKind::Danger, ADDRESS_HEADLINE, ADDRESS_HINT));
                self.online.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Write a frame: cursor hidden, optional clear, rows top to bottom.
    pub async fn present(&self, frame: &Frame, clear: bool) -> Result<(), DisplayError> {
        if !self.is_online() {
            debug!("LCD offline, frame dropped");
            return Ok(());
        }
        let mut surface = self.surface.lock().await;
        let result = write_frame(surface.as_mut(), frame, clear);
        match &result {
            Ok(()) => self.stats.frames.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.stats.failures.fetch_add(1, Ordering::Relaxed),
        };
        result
    }
}

fn init_surface(surface: &mut dyn CharDisplay) -> Result<(), DisplayError> {
    surface.init()?;
    for slot in GLYPH_TABLE.iter() {
        surface.define_glyph(slot.code, &slot.bitmap)?;
    }
    surface.set_cursor_visible(false)?;
    surface.clear()?;
    surface.flush()
}

fn write_frame(surface: &mut dyn CharDisplay, frame: &Frame, clear: bool) -> Result<(), DisplayError> {
    surface.set_cursor_visible(false)?;
    if clear {
        surface.clear()?;
    }
    for (row, line) in frame.lines().iter().enumerate() {
        surface.set_cursor_position(row, 0)?;
        surface.write_str(line.as_str())?;
    }
    surface.flush()
}
