/*
 *  display/traits.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definition for character display surfaces
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

use crate::display::error::DisplayError;
use crate::glyphs::GlyphBitmap;

/// Number of programmable glyph slots on an HD44780 style controller
pub const GLYPH_SLOTS: u8 = 8;

/// Minimal hardware abstraction - all character surfaces implement this
///
/// Mirrors what an HD44780 behind an I2C backpack offers: a cursor, a
/// string write at the cursor and eight user defined characters. Nothing
/// here buffers; `flush` exists for surfaces that do.
pub trait CharDisplay: Send {
    /// Initialize the controller and probe the bus address
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Blank every cell and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), DisplayError>;

    /// Move the cursor, row 0-3 and column 0-19
    fn set_cursor_position(&mut self, row: usize, col: usize) -> Result<(), DisplayError>;

    /// Write at the cursor and advance it. Characters past the last
    /// column are dropped.
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Program one CGRAM slot (0-7)
    fn define_glyph(&mut self, code: u8, bitmap: &GlyphBitmap) -> Result<(), DisplayError>;

    /// Push buffered cells out
    ///
    /// Default is a no-op for surfaces that write through.
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}
