/*
 *  display/drivers/console.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Terminal stand-in for the I2C module, draws the grid on stdout
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

use std::io::{self, Write};

use log::{debug, info};

use crate::display::error::DisplayError;
use crate::display::frame::{LCD_COLS, LCD_ROWS};
use crate::display::traits::{CharDisplay, GLYPH_SLOTS};
use crate::glyphs::{
    GlyphBitmap, GLYPH_CODE_A_UMLAUT, GLYPH_CODE_COOLING, GLYPH_CODE_MUG, GLYPH_CODE_O_UMLAUT,
    GLYPH_CODE_SHARP_S, GLYPH_CODE_U_UMLAUT,
};

/// 7-bit I2C addresses outside the reserved blocks
pub const I2C_ADDRESS_RANGE: std::ops::RangeInclusive<u8> = 0x03..=0x77;

/// Console rendering of a 20x4 module
///
/// Cells are kept in memory and the whole grid is printed inside a frame
/// on flush, only when something changed since the last print.
pub struct ConsoleLcd {
    address: u8,
    grid: [[char; LCD_COLS]; LCD_ROWS],
    cursor: (usize, usize),
    defined: [bool; GLYPH_SLOTS as usize],
    last_printed: Option<[[char; LCD_COLS]; LCD_ROWS]>,
    initialized: bool,
}

impl ConsoleLcd {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            grid: [[' '; LCD_COLS]; LCD_ROWS],
            cursor: (0, 0),
            defined: [false; GLYPH_SLOTS as usize],
            last_printed: None,
            initialized: false,
        }
    }

    /// Terminal friendly stand-in for a cell
    fn visible(&self, c: char) -> char {
        let code = c as u32;
        if code >= GLYPH_SLOTS as u32 {
            return c;
        }
        if !self.defined[code as usize] {
            return '?';
        }
        match code as u8 {
            GLYPH_CODE_MUG => 'H',
            GLYPH_CODE_COOLING => '*',
            GLYPH_CODE_A_UMLAUT => 'Ä',
            GLYPH_CODE_O_UMLAUT => 'Ö',
            GLYPH_CODE_U_UMLAUT => 'Ü',
            GLYPH_CODE_SHARP_S => 'ß',
            _ => '?',
        }
    }

    /// The framed block as printed
    pub fn render(&self) -> String {
        let border = format!("+{}+", "-".repeat(LCD_COLS));
        let mut out = String::with_capacity((LCD_COLS + 3) * (LCD_ROWS + 2));
        out.push_str(&border);
        out.push('\n');
        for row in self.grid.iter() {
            out.push('|');
            out.extend(row.iter().map(|&c| self.visible(c)));
            out.push_str("|\n");
        }
        out.push_str(&border);
        out
    }

    fn ensure_init(&self) -> Result<(), DisplayError> {
        if self.initialized { Ok(()) } else { Err(DisplayError::NotInitialized) }
    }
}

impl CharDisplay for ConsoleLcd {
    fn init(&mut self) -> Result<(), DisplayError> {
        if !I2C_ADDRESS_RANGE.contains(&self.address) {
            return Err(DisplayError::InitializationFailed(format!(
                "no device answers at address {:#04x}",
                self.address
            )));
        }
        info!("console LCD at {:#04x}, {}x{}", self.address, LCD_COLS, LCD_ROWS);
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_init()?;
        self.grid = [[' '; LCD_COLS]; LCD_ROWS];
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_cursor_visible(&mut self, _visible: bool) -> Result<(), DisplayError> {
        self.ensure_init()
    }

    fn set_cursor_position(&mut self, row: usize, col: usize) -> Result<(), DisplayError> {
        self.ensure_init()?;
        if row >= LCD_ROWS || col >= LCD_COLS {
            return Err(DisplayError::CursorOutOfRange { row, col });
        }
        self.cursor = (row, col);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_init()?;
        let (row, mut col) = self.cursor;
        for c in text.chars().take(LCD_COLS.saturating_sub(col)) {
            self.grid[row][col] = c;
            col += 1;
        }
        self.cursor = (row, col.min(LCD_COLS - 1));
        Ok(())
    }

    fn define_glyph(&mut self, code: u8, _bitmap: &GlyphBitmap) -> Result<(), DisplayError> {
        if code >= GLYPH_SLOTS {
            return Err(DisplayError::InvalidGlyphSlot(code));
        }
        self.ensure_init()?;
        self.defined[code as usize] = true;
        debug!("glyph slot {} defined", code);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.ensure_init()?;
        if self.last_printed == Some(self.grid) {
            return Ok(());
        }
        let block = self.render();
        let mut out = io::stdout().lock();
        writeln!(out, "{}", block)?;
        out.flush()?;
        self.last_printed = Some(self.grid);
        Ok(())
    }
}
