/*
 *  display/drivers/mock.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock character display for tests and headless runs
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

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::display::error::DisplayError;
use crate::display::frame::{LCD_COLS, LCD_ROWS};
use crate::display::traits::{CharDisplay, GLYPH_SLOTS};
use crate::glyphs::GlyphBitmap;

/// Mock display driver for testing
///
/// This driver simulates a 20x4 character module without hardware. It is
/// useful for:
/// - Unit tests
/// - Integration tests
/// - Running the daemon without a screen
///
/// Every operation is recorded in shared state, so a test can keep a
/// handle after the driver has been boxed and moved into the scheduler.
#[derive(Debug, Clone, Default)]
pub struct MockLcd {
    state: Arc<Mutex<MockLcdState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug)]
pub struct MockLcdState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Number of times flush() was called
    pub flush_count: usize,

    /// Number of write_str() calls
    pub write_count: usize,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    pub cursor_visible: bool,
    pub cursor: (usize, usize),

    /// Programmed CGRAM slots
    pub glyphs: BTreeMap<u8, GlyphBitmap>,

    /// Character cells, row major
    pub grid: [[char; LCD_COLS]; LCD_ROWS],

    /// Grid contents captured at every flush
    pub history: Vec<[String; LCD_ROWS]>,

    /// Simulate failures (for error testing)
    pub simulate_init_failure: bool,
    pub simulate_write_failure: bool,
}

impl Default for MockLcdState {
    fn default() -> Self {
        Self {
            init_count: 0,
            clear_count: 0,
            flush_count: 0,
            write_count: 0,
            is_initialized: false,
            cursor_visible: true,
            cursor: (0, 0),
            glyphs: BTreeMap::new(),
            grid: [[' '; LCD_COLS]; LCD_ROWS],
            history: Vec::new(),
            simulate_init_failure: false,
            simulate_write_failure: false,
        }
    }
}

impl MockLcdState {
    pub fn rows(&self) -> [String; LCD_ROWS] {
        self.grid.map(|row| row.iter().collect())
    }
}

impl MockLcd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockLcdState>> {
        Arc::clone(&self.state)
    }

    /// Current grid as four strings
    pub fn rows(&self) -> [String; LCD_ROWS] {
        self.lock().rows()
    }

    fn lock(&self) -> MutexGuard<'_, MockLcdState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ready(&self) -> Result<MutexGuard<'_, MockLcdState>, DisplayError> {
        let state = self.lock();
        if !state.is_initialized {
            return Err(DisplayError::NotInitialized);
        }
        Ok(state)
    }
}

impl CharDisplay for MockLcd {
    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();

        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let mut state = self.ready()?;
        state.clear_count += 1;
        state.grid = [[' '; LCD_COLS]; LCD_ROWS];
        state.cursor = (0, 0);
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), DisplayError> {
        self.ready()?.cursor_visible = visible;
        Ok(())
    }

    fn set_cursor_position(&mut self, row: usize, col: usize) -> Result<(), DisplayError> {
        if row >= LCD_ROWS || col >= LCD_COLS {
            return Err(DisplayError::CursorOutOfRange { row, col });
        }
        self.ready()?.cursor = (row, col);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        let mut state = self.ready()?;

        if state.simulate_write_failure {
            return Err(DisplayError::I2cError("Simulated write failure".to_string()));
        }

        state.write_count += 1;
        let (row, mut col) = state.cursor;
        for c in text.chars() {
            if col >= LCD_COLS {
                break;
            }
            state.grid[row][col] = c;
            col += 1;
        }
        state.cursor = (row, col.min(LCD_COLS - 1));
        Ok(())
    }

    fn define_glyph(&mut self, code: u8, bitmap: &GlyphBitmap) -> Result<(), DisplayError> {
        if code >= GLYPH_SLOTS {
            return Err(DisplayError::InvalidGlyphSlot(code));
        }
        self.ready()?.glyphs.insert(code, *bitmap);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.ready()?;
        state.flush_count += 1;
        let rows = state.rows();
        state.history.push(rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::GLYPH_BEER_MUG;

    #[test]
    fn test_mock_lcd_init() {
        let mut lcd = MockLcd::new();

        let state = lcd.state();
        assert_eq!(state.lock().unwrap().init_count, 0);
        assert!(!state.lock().unwrap().is_initialized);

        lcd.init().unwrap();

        assert_eq!(state.lock().unwrap().init_count, 1);
        assert!(state.lock().unwrap().is_initialized);
    }

    #[test]
    fn test_mock_lcd_requires_init() {
        let mut lcd = MockLcd::new();
        assert!(matches!(lcd.write_str("x"), Err(DisplayError::NotInitialized)));
    }

    #[test]
    fn test_mock_lcd_writes_at_cursor() {
        let mut lcd = MockLcd::new();
        lcd.init().unwrap();
        lcd.set_cursor_position(2, 15).unwrap();
        lcd.write_str("overflowing").unwrap();
        let rows = lcd.rows();
        assert_eq!(rows[2], format!("{}overf", " ".repeat(15)));
        assert_eq!(rows[0], " ".repeat(20));
    }

    #[test]
    fn test_mock_lcd_cursor_bounds() {
        let mut lcd = MockLcd::new();
        lcd.init().unwrap();
        assert!(lcd.set_cursor_position(4, 0).is_err());
        assert!(lcd.set_cursor_position(0, 20).is_err());
        assert!(lcd.set_cursor_position(3, 19).is_ok());
    }

    #[test]
    fn test_mock_lcd_glyph_slots() {
        let mut lcd = MockLcd::new();
        lcd.init().unwrap();
        lcd.define_glyph(0, &GLYPH_BEER_MUG).unwrap();
        assert!(matches!(lcd.define_glyph(8, &GLYPH_BEER_MUG), Err(DisplayError::InvalidGlyphSlot(8))));
        assert_eq!(lcd.state().lock().unwrap().glyphs.get(&0), Some(&GLYPH_BEER_MUG));
    }

    #[test]
    fn test_mock_lcd_clear_and_history() {
        let mut lcd = MockLcd::new();
        lcd.init().unwrap();
        lcd.write_str("Boil").unwrap();
        lcd.flush().unwrap();
        lcd.clear().unwrap();
        lcd.flush().unwrap();

        let state = lcd.state();
        let state = state.lock().unwrap();
        assert_eq!(state.clear_count, 1);
        assert_eq!(state.history.len(), 2);
        assert!(state.history[0][0].starts_with("Boil"));
        assert_eq!(state.history[1][0], " ".repeat(20));
    }

    #[test]
    fn test_mock_lcd_simulated_failure() {
        let mut lcd = MockLcd::new();
        lcd.state().lock().unwrap().simulate_init_failure = true;
        assert!(lcd.init().is_err());

        lcd.state().lock().unwrap().simulate_init_failure = false;
        lcd.init().unwrap();
        lcd.state().lock().unwrap().simulate_write_failure = true;
        assert!(lcd.write_str("x").is_err());
    }
}
