/*
 *  display/framebuffer.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime-sized monochrome framebuffer
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

use core::convert::Infallible;
use std::io::{self, Write};
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A runtime-sized 1-bit framebuffer for embedded-graphics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    buf: Vec<BinaryColor>,
    w: usize,
    h: usize,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![BinaryColor::Off; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access
    pub fn as_slice(&self) -> &[BinaryColor] { &self.buf }

    /// Blank every pixel
    pub fn clear_all(&mut self) {
        self.buf.fill(BinaryColor::Off);
    }

    /// Pixel at (x,y), None when outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    /// Count of lit pixels
    pub fn count_on(&self) -> usize {
        self.buf.iter().filter(|p| p.is_on()).count()
    }

    /// True when every lit pixel of `other` is also lit here
    pub fn covers(&self, other: &FrameBuffer) -> bool {
        self.w == other.w
            && self.h == other.h
            && self.buf
                .iter()
                .zip(other.buf.iter())
                .all(|(mine, theirs)| mine.is_on() || theirs.is_off())
    }

    /// Write as a plain (P1) portable bitmap
    pub fn write_pbm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P1")?;
        writeln!(out, "{} {}", self.w, self.h)?;
        for row in self.buf.chunks(self.w.max(1)) {
            let line: Vec<&str> = row
                .iter()
                .map(|p| if p.is_on() { "1" } else { "0" })
                .collect();
            writeln!(out, "{}", line.join(" "))?;
        }
        Ok(())
    }

    /// Render as text, '#' for lit pixels, '.' for dark
    pub fn to_ascii(&self) -> String {
        let mut s = String::with_capacity((self.w + 1) * self.h);
        for row in self.buf.chunks(self.w.max(1)) {
            s.extend(row.iter().map(|p| if p.is_on() { '#' } else { '.' }));
            s.push('\n');
        }
        s
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip once, then fill row runs
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else { return Ok(()) };
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        let (x1, y1) = (bottom_right.x as usize, bottom_right.y as usize);
        for y in y0..=y1 {
            let base = y * self.w;
            self.buf[base + x0..=base + x1].fill(color);
        }
        Ok(())
    }
}
