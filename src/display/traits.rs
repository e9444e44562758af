/*
 *  display/traits.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for display driver abstraction
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

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use crate::display::error::DisplayError;

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,
}

/// Minimal hardware abstraction for the status panel
///
/// Covers bring-up, buffer reset and transfer. Pixel drawing goes through
/// embedded-graphics, see [`DrawableDisplay`].
pub trait DisplayDriver {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Initialize the display hardware
    ///
    /// Brings up the bus at the configured address and applies any panel
    /// settings (brightness, inversion) held by the driver.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Transfer the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Blank the frame buffer without touching the panel
    fn clear_buffer(&mut self);

    /// Set display brightness (0-255)
    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError>;

    /// Set display inversion
    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError>;

    /// Set display rotation
    ///
    /// Only 0 and 180 keep the landscape geometry the status layout needs,
    /// anything else is [`DisplayError::InvalidRotation`].
    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError>;
}

/// A driver that can also be drawn on with embedded-graphics
///
/// `DrawTarget` is not dyn compatible, so the status renderer is generic over
/// this trait rather than boxing drivers.
pub trait DrawableDisplay: DisplayDriver + DrawTarget<Color = BinaryColor> {}

impl<T> DrawableDisplay for T where T: DisplayDriver + DrawTarget<Color = BinaryColor> {}
