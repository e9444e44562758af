/*
 *  display/drivers/ssd1306.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  SSD1306 OLED display driver implementation
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

use linux_embedded_hal::I2cdev;
use ssd1306::{
    mode::{BufferedGraphicsMode, DisplayConfig as _},
    prelude::*,
    size::DisplaySize128x64,
    I2CDisplayInterface,
    Ssd1306,
};

use embedded_graphics::prelude::*;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::geometry::Size;

use crate::config::DisplayConfig as PanelConfig;
use crate::display::error::DisplayError;
use crate::display::traits::{DisplayDriver, DisplayCapabilities};

use log::{debug, info};

type Panel = Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// SSD1306 128x64 panel on a Linux I2C bus
///
/// The ssd1306 crate keeps the frame buffer; drawing goes straight into it
/// and `flush` pushes it over the bus.
pub struct Ssd1306Driver {
    /// The underlying ssd1306 driver
    display: Panel,

    /// Display capabilities
    capabilities: DisplayCapabilities,

    /// 7-bit bus address, kept for diagnostics
    address: u8,

    /// Applied once the controller answers in init()
    brightness: Option<u8>,
    invert: Option<bool>,
}

impl Ssd1306Driver {
    /// Create a new SSD1306 driver using I2C
    ///
    /// # Arguments
    ///
    /// * `i2c_bus_path` - Path to I2C device (e.g., "/dev/i2c-1")
    /// * `address` - I2C address (0x3C on most modules, some use 0x3D)
    /// * `config` - Display configuration
    ///
    /// Nothing is sent to the panel until [`DisplayDriver::init`].
    pub fn new_i2c(
        i2c_bus_path: &str,
        address: u8,
        config: &PanelConfig,
    ) -> Result<Self, DisplayError> {
        info!("Opening SSD1306 on {} at address 0x{:02X}", i2c_bus_path, address);

        let width = config.width.unwrap_or(128);
        let height = config.height.unwrap_or(64);
        if (width, height) != (128, 64) {
            return Err(DisplayError::InvalidConfiguration(
                format!("Unsupported SSD1306 size: {}x{}", width, height)
            ));
        }

        let rotation = match config.rotate_deg.unwrap_or(0) {
            0 => DisplayRotation::Rotate0,
            180 => DisplayRotation::Rotate180,
            other => return Err(DisplayError::InvalidRotation(other)),
        };

        let i2c = I2cdev::new(i2c_bus_path)
            .map_err(|e| DisplayError::I2cError(format!("Failed to open {}: {}", i2c_bus_path, e)))?;

        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306::new(interface, DisplaySize128x64, rotation)
            .into_buffered_graphics_mode();

        let capabilities = DisplayCapabilities { width, height };

        Ok(Self {
            display,
            capabilities,
            address,
            brightness: config.brightness,
            invert: config.invert,
        })
    }
}

impl DisplayDriver for Ssd1306Driver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.display.init().map_err(|e| {
            DisplayError::InitializationFailed(format!(
                "SSD1306 not responding at 0x{:02X}: {:?}",
                self.address, e
            ))
        })?;

        if let Some(brightness) = self.brightness {
            self.set_brightness(brightness)?;
        }
        if let Some(invert) = self.invert {
            self.set_invert(invert)?;
        }

        info!("SSD1306 initialized successfully ({}x{})", self.capabilities.width, self.capabilities.height);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.display.flush()?;
        Ok(())
    }

    fn clear_buffer(&mut self) {
        self.display.clear_buffer();
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        let brightness = match value {
            0..=63 => Brightness::DIMMEST,
            64..=127 => Brightness::DIM,
            128..=191 => Brightness::NORMAL,
            _ => Brightness::BRIGHTEST,
        };
        debug!("SSD1306 brightness {}", value);
        self.display.set_brightness(brightness)?;
        Ok(())
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.display.set_invert(inverted)?;
        Ok(())
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        let rotation = match degrees {
            0 => DisplayRotation::Rotate0,
            180 => DisplayRotation::Rotate180,
            _ => return Err(DisplayError::InvalidRotation(degrees)),
        };
        self.display.set_rotation(rotation)?;
        Ok(())
    }
}

// Draw straight into the ssd1306 crate's own buffer
impl DrawTarget for Ssd1306Driver {
    type Color = BinaryColor;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels).map_err(DisplayError::from)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.display.fill_solid(area, color).map_err(DisplayError::from)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        DrawTarget::clear(&mut self.display, color).map_err(DisplayError::from)
    }
}

impl OriginDimensions for Ssd1306Driver {
    fn size(&self) -> Size {
        self.display.bounding_box().size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_i2c_rejects_other_panel_sizes() {
        let config = PanelConfig {
            width: Some(128),
            height: Some(32),
            ..Default::default()
        };
        let result = Ssd1306Driver::new_i2c("/dev/i2c-1", 0x3C, &config);
        assert!(matches!(result, Err(DisplayError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_new_i2c_rejects_portrait_rotation() {
        let config = PanelConfig {
            rotate_deg: Some(90),
            ..Default::default()
        };
        let result = Ssd1306Driver::new_i2c("/dev/i2c-1", 0x3C, &config);
        assert!(matches!(result, Err(DisplayError::InvalidRotation(90))));
    }

    #[test]
    fn test_new_i2c_missing_bus() {
        let config = PanelConfig::default();
        match Ssd1306Driver::new_i2c("/dev/i2c-nonexistent", 0x3D, &config) {
            Err(DisplayError::I2cError(msg)) => assert!(msg.contains("/dev/i2c-nonexistent")),
            Err(e) => panic!("expected an I2C error, got {}", e),
            Ok(_) => panic!("opened a bus that does not exist"),
        }
    }
}
