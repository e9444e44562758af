/*
 *  glyphs.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

// 1-bit glyphs, rows MSB first, (w + 7) / 8 bytes per row

pub const GLYPH_WIFI_WIDTH: u32 = 16;
pub const GLYPH_WIFI_HEIGHT: u32 = 16;

pub const GLYPH_WIFI: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x0f, 0xf0, 0x3e, 0x7c, 0x70, 0x0e, 0xc7, 0xe3, 0x1f, 0xf8, 0x38, 0x1c,
    0x33, 0xcc, 0x0f, 0xf0, 0x0c, 0x30, 0x01, 0x80, 0x03, 0xc0, 0x01, 0x80, 0x00, 0x00, 0x00, 0x00,
];

/// Byte length of a packed glyph of the given size
pub const fn glyph_byte_size(w: u32, h: u32) -> usize {
    ((w as usize + 7) / 8) * h as usize
}
