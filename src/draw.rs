/*
 *  draw.rs
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

use embedded_graphics::{
    image::{Image, ImageRaw},
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyleBuilder},
    text::{Baseline, Text},
};

pub fn draw_line<D>(
    target: &mut D,
    start: Point,
    end: Point,
    color: BinaryColor,
    width: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Line::new(start, end)
        .into_styled(PrimitiveStyleBuilder::new().stroke_width(width).stroke_color(color).build())
        .draw(target)
}

/// Draws `text` with its top-left corner at `top_left`.
///
/// Returns the position following the last character, like a text cursor.
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    top_left: Point,
    style: MonoTextStyle<'_, BinaryColor>,
) -> Result<Point, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(text, top_left, style, Baseline::Top).draw(target)
}

/// Draws a packed 1-bit glyph; set bits are drawn On, clear bits Off.
pub fn draw_glyph<D>(
    target: &mut D,
    data: &[u8],
    width: u32,
    top_left: Point,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let raw = ImageRaw::<BinaryColor>::new(data, width);
    Image::new(&raw, top_left).draw(target)
}
