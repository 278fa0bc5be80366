/*
 *  display/frame.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed width lines and the four line frame written per refresh
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

use std::ops::RangeInclusive;

use arrayvec::ArrayString;

pub const LCD_COLS: usize = 20;
pub const LCD_ROWS: usize = 4;

/// One display row. Sized for 20 chars of up to 4 bytes each.
pub type Line = ArrayString<{ LCD_COLS * 4 }>;

/// Pad or cut `text` to exactly `width` chars.
pub fn fit_to(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let used = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

/// A full display row: exactly 20 chars, never wrapped.
pub fn fit(text: &str) -> Line {
    let mut line = Line::new();
    let mut used = 0;
    for c in text.chars().take(LCD_COLS) {
        // capacity covers 20 chars of any width
        let _ = line.try_push(c);
        used += 1;
    }
    for _ in used..LCD_COLS {
        let _ = line.try_push(' ');
    }
    line
}

/// Four rows as written in one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: [Line; LCD_ROWS],
}

impl Default for Frame {
    fn default() -> Self {
        Self::blank()
    }
}

impl Frame {
    pub fn new(lines: [&str; LCD_ROWS]) -> Self {
        Self { lines: lines.map(fit) }
    }

    pub fn blank() -> Self {
        Self::new(["", "", "", ""])
    }

    pub fn lines(&self) -> &[Line; LCD_ROWS] {
        &self.lines
    }

    /// Row text; out of range rows read as empty.
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }

    /// Overwrite one cell, keeping the row at 20 chars.
    pub fn set_cell(&mut self, row: usize, col: usize, ch: char) {
        self.fill_cells(row, col..=col, ch);
    }

    /// Overwrite a run of cells with the same char.
    pub fn fill_cells(&mut self, row: usize, cols: RangeInclusive<usize>, ch: char) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let updated: String = line
            .chars()
            .enumerate()
            .map(|(i, c)| if cols.contains(&i) { ch } else { c })
            .collect();
        *line = fit(&updated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc").as_str(), "abc                 ");
        assert_eq!(fit("abcdefghijklmnopqrstuvwxyz").as_str(), "abcdefghijklmnopqrst");
        assert_eq!(fit("").chars().count(), LCD_COLS);
    }

    #[test]
    fn test_fit_counts_chars_not_bytes() {
        let line = fit("Targ. Temp: 65.00°C äöüß and more");
        assert_eq!(line.chars().count(), LCD_COLS);
        assert!(line.as_str().starts_with("Targ. Temp: 65.00°C"));
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to("Sudkessel Nr 2", 11), "Sudkessel N");
        assert_eq!(fit_to("HLT", 11), "HLT        ");
    }

    #[test]
    fn test_cell_overlay() {
        let mut frame = Frame::new(["Mash In", "", "", ""]);
        frame.set_cell(0, 19, '\u{0}');
        assert_eq!(frame.line(0).chars().nth(19), Some('\u{0}'));
        assert_eq!(frame.line(0).chars().count(), LCD_COLS);

        frame.fill_cells(0, 17..=19, '\u{1}');
        assert!(frame.line(0).ends_with("\u{1}\u{1}\u{1}"));

        // off-grid writes are ignored
        frame.set_cell(7, 0, 'x');
        frame.set_cell(0, 25, 'x');
        assert_eq!(frame.line(0).chars().count(), LCD_COLS);
    }
}
