/*
 *  glyphs.rs
 *
 *  BrewLCD - brewing telemetry on a 20x4 LCD
 *  (c) 2020-26 Stuart Hunter
 *
 *  Custom 5x8 glyphs uploaded to the CGRAM slots at startup
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

/// One glyph: 8 rows, low 5 bits of each row are the pixels (MSB = left).
pub type GlyphBitmap = [u8; 8];

pub const GLYPH_CODE_MUG: u8 = 0;
pub const GLYPH_CODE_COOLING: u8 = 1;
pub const GLYPH_CODE_A_UMLAUT: u8 = 2;
pub const GLYPH_CODE_O_UMLAUT: u8 = 3;
pub const GLYPH_CODE_U_UMLAUT: u8 = 4;
pub const GLYPH_CODE_SHARP_S: u8 = 5;

/// Heater indicator as it appears inside a line.
pub const MUG: char = '\u{0}';
/// Cooler indicator, drawn three cells wide.
pub const COOLING: char = '\u{1}';

pub const GLYPH_BEER_MUG: GlyphBitmap = [
    0b11100, 0b00000, 0b11100, 0b11111, 0b11101, 0b11101, 0b11111, 0b11100,
];

// a star rather than a snowflake, reads better at 5x8
pub const GLYPH_COOLING: GlyphBitmap = [
    0b00100, 0b10101, 0b01110, 0b11111, 0b01110, 0b10101, 0b00100, 0b00000,
];

// the A00 ROM has lowercase umlauts only, and no sharp s
pub const GLYPH_A_UMLAUT: GlyphBitmap = [
    0b10001, 0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b00000,
];
pub const GLYPH_O_UMLAUT: GlyphBitmap = [
    0b10001, 0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110, 0b00000,
];
pub const GLYPH_U_UMLAUT: GlyphBitmap = [
    0b01010, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110, 0b00000,
];
pub const GLYPH_SHARP_S: GlyphBitmap = [
    0b00000, 0b00000, 0b11100, 0b10010, 0b10100, 0b10010, 0b11100, 0b10000,
];

/// A programmable character slot and what goes into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSlot {
    pub code: u8,
    pub name: &'static str,
    pub bitmap: GlyphBitmap,
}

/// Everything registered with the display at startup, in slot order.
pub const GLYPH_TABLE: [GlyphSlot; 6] = [
    GlyphSlot { code: GLYPH_CODE_MUG, name: "beer mug", bitmap: GLYPH_BEER_MUG },
    GlyphSlot { code: GLYPH_CODE_COOLING, name: "cooling", bitmap: GLYPH_COOLING },
    GlyphSlot { code: GLYPH_CODE_A_UMLAUT, name: "A umlaut", bitmap: GLYPH_A_UMLAUT },
    GlyphSlot { code: GLYPH_CODE_O_UMLAUT, name: "O umlaut", bitmap: GLYPH_O_UMLAUT },
    GlyphSlot { code: GLYPH_CODE_U_UMLAUT, name: "U umlaut", bitmap: GLYPH_U_UMLAUT },
    GlyphSlot { code: GLYPH_CODE_SHARP_S, name: "sharp s", bitmap: GLYPH_SHARP_S },
];

/// The in-line character for a glyph code.
pub fn glyph_char(code: u8) -> char {
    char::from(code)
}
