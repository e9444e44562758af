/*
 *  display/layout.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  Pixel layout of the status screens
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

use embedded_graphics::mono_font::{ascii::FONT_6X9, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::glyphs::{GLYPH_WIFI_HEIGHT, GLYPH_WIFI_WIDTH};

/// Smallest panel the layout fits on
pub const MIN_WIDTH: u32 = 128;
pub const MIN_HEIGHT: u32 = 64;

/// Gap between the Wi-Fi icon and the top/right panel edges
pub const ICON_INSET: i32 = 5;

/// Row of the separator between status text and output config
pub const SEPARATOR_Y: i32 = 35;

pub const OUTPUT_A_ORIGIN: Point = Point::new(0, 42);
pub const OUTPUT_B_ORIGIN: Point = Point::new(0, 55);

/// Where screen specific text starts
pub const BODY_ORIGIN: Point = Point::new(0, 5);

/// Row pitch of the body text, the 8 px cell of the node's original panel font
pub const BODY_LINE_PITCH: i32 = 8;

/// Marks a body line cut short at the right edge
pub const ELLIPSIS: &str = "...";

/// Layout resolved against a concrete panel
///
/// Everything is anchored top-left except the icon, which hugs the right edge.
#[derive(Debug, Clone)]
pub struct StatusLayout {
    /// Panel width in pixels
    pub width: u32,

    /// Panel height in pixels
    pub height: u32,

    /// Top-left corner of the Wi-Fi icon
    pub icon_origin: Point,

    /// Separator endpoints, inclusive
    pub separator: (Point, Point),

    pub output_a: Point,
    pub output_b: Point,
    pub body_origin: Point,

    /// The single text style used for every string on the panel
    pub text_style: MonoTextStyle<'static, BinaryColor>,
}

impl StatusLayout {
    /// Resolve the layout for a panel size, None when the panel is too small
    pub fn for_size(size: Size) -> Option<Self> {
        if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
            return None;
        }
        let right = size.width as i32;
        Some(Self {
            width: size.width,
            height: size.height,
            icon_origin: Point::new(right - GLYPH_WIFI_WIDTH as i32 - ICON_INSET, ICON_INSET),
            separator: (Point::new(0, SEPARATOR_Y), Point::new(right - 1, SEPARATOR_Y)),
            output_a: OUTPUT_A_ORIGIN,
            output_b: OUTPUT_B_ORIGIN,
            body_origin: BODY_ORIGIN,
            text_style: MonoTextStyle::new(&FONT_6X9, BinaryColor::On),
        })
    }

    /// Height of one rendered text cell
    pub fn line_height(&self) -> i32 {
        self.text_style.font.character_size.height as i32
    }

    /// Top-left of the nth body line
    pub fn body_line(&self, n: usize) -> Point {
        self.body_origin + Point::new(0, BODY_LINE_PITCH * n as i32)
    }

    /// How many characters fit across the panel
    pub fn columns(&self) -> u32 {
        let font = self.text_style.font;
        self.width / (font.character_size.width + font.character_spacing)
    }

    /// Lowest row the icon occupies
    pub fn icon_bottom(&self) -> i32 {
        self.icon_origin.y + GLYPH_WIFI_HEIGHT as i32 - 1
    }
}
