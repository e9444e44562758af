/*
 *  display/drivers/mock.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display driver for testing and previews without hardware
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

use embedded_graphics::prelude::*;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::geometry::Size;

use crate::config::DisplayConfig;
use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameBuffer;
use crate::display::traits::{DisplayDriver, DisplayCapabilities};

use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock display driver
///
/// Simulates a panel without hardware. It records every operation and keeps a
/// copy of the frame buffer as of the last flush, which is what a real panel
/// would be showing. Used by the unit and integration tests and by the
/// `--driver mock` preview mode of the binary.
#[derive(Debug, Clone)]
pub struct MockDriver {
    /// Framebuffer for drawing operations
    framebuffer: FrameBuffer,

    /// Display capabilities
    capabilities: DisplayCapabilities,

    /// Shared state for testing
    state: Arc<Mutex<MockDriverState>>,

    /// Applied in init(), like a real panel
    brightness: Option<u8>,
    invert: Option<bool>,
    rotation: Option<u16>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called, successful or not
    pub init_attempts: usize,

    /// Number of times init() succeeded
    pub init_count: usize,

    /// Number of successful flush() calls
    pub flush_count: usize,

    /// Number of times clear_buffer() was called
    pub clear_count: usize,

    /// Number of draw calls into the framebuffer
    pub draw_calls: usize,

    /// Last brightness value set
    pub last_brightness: Option<u8>,

    /// Last rotation set
    pub last_rotation: Option<u16>,

    /// Last invert state set
    pub last_invert: Option<bool>,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    /// Panel contents as of the last successful flush
    pub panel: Option<FrameBuffer>,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
    pub simulate_init_failure: bool,
}

impl MockDriver {
    /// Create a mock panel of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
            capabilities: DisplayCapabilities { width, height },
            state: Arc::new(Mutex::new(MockDriverState::default())),
            brightness: None,
            invert: None,
            rotation: None,
        }
    }

    /// Create a mock panel from configuration (128x64 when unset)
    ///
    /// Brightness, inversion and rotation are applied on init.
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            brightness: config.brightness,
            invert: config.invert,
            rotation: config.rotate_deg,
            ..Self::new(config.width.unwrap_or(128), config.height.unwrap_or(64))
        }
    }

    /// Snapshot of what the panel shows, None before the first flush
    pub fn panel(&self) -> Option<FrameBuffer> {
        self.lock_state().panel.clone()
    }

    /// Get pixel at position for testing
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        self.framebuffer.pixel(x, y)
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    /// Reset state counters (useful between tests)
    pub fn reset_state(&mut self) {
        *self.lock_state() = MockDriverState::default();
    }

    /// Count number of pixels set to On
    pub fn count_on_pixels(&self) -> usize {
        self.framebuffer.count_on()
    }

    // a panicking test thread must not hide the recorded state from others
    fn lock_state(&self) -> MutexGuard<'_, MockDriverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        {
            let mut state = self.lock_state();
            state.init_attempts += 1;
            if state.simulate_init_failure {
                return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
            }
        }

        if let Some(degrees) = self.rotation {
            self.set_rotation(degrees)?;
        }
        if let Some(brightness) = self.brightness {
            self.set_brightness(brightness)?;
        }
        if let Some(invert) = self.invert {
            self.set_invert(invert)?;
        }

        let mut state = self.lock_state();
        state.init_count += 1;
        state.is_initialized = true;
        debug!("Mock display initialized ({}x{})", self.capabilities.width, self.capabilities.height);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock_state();

        if state.simulate_flush_failure {
            return Err(DisplayError::Other("Simulated flush failure".to_string()));
        }

        state.flush_count += 1;
        state.panel = Some(self.framebuffer.clone());
        Ok(())
    }

    fn clear_buffer(&mut self) {
        self.lock_state().clear_count += 1;
        self.framebuffer.clear_all();
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.lock_state().last_brightness = Some(value);
        Ok(())
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.lock_state().last_invert = Some(inverted);
        Ok(())
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if degrees != 0 && degrees != 180 {
            return Err(DisplayError::InvalidRotation(degrees));
        }
        self.lock_state().last_rotation = Some(degrees);
        Ok(())
    }
}

impl DrawTarget for MockDriver {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.lock_state().draw_calls += 1;
        self.framebuffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.lock_state().draw_calls += 1;
        self.framebuffer.fill_solid(area, color)
    }
}

impl OriginDimensions for MockDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Line};

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new(128, 64);
        assert_eq!(driver.capabilities().width, 128);
        assert_eq!(driver.capabilities().height, 64);
        assert_eq!(driver.count_on_pixels(), 0);
        assert!(driver.panel().is_none());
    }

    #[test]
    fn test_mock_driver_from_config() {
        let config = DisplayConfig {
            width: Some(132),
            ..Default::default()
        };
        let driver = MockDriver::from_config(&config);
        assert_eq!(driver.dimensions(), (132, 64));
    }

    #[test]
    fn test_mock_driver_applies_config_on_init() {
        let config = DisplayConfig {
            brightness: Some(40),
            invert: Some(true),
            rotate_deg: Some(180),
            ..Default::default()
        };
        let mut driver = MockDriver::from_config(&config);
        let state = driver.state();
        assert_eq!(state.lock().unwrap().last_brightness, None);

        driver.init().unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.last_brightness, Some(40));
        assert_eq!(state.last_invert, Some(true));
        assert_eq!(state.last_rotation, Some(180));
    }

    #[test]
    fn test_mock_driver_init_rejects_bad_rotation() {
        let config = DisplayConfig {
            rotate_deg: Some(270),
            ..Default::default()
        };
        let mut driver = MockDriver::from_config(&config);
        assert!(matches!(driver.init(), Err(DisplayError::InvalidRotation(270))));
        assert!(!driver.state().lock().unwrap().is_initialized);
    }

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new(128, 64);

        let state = driver.state();
        assert_eq!(state.lock().unwrap().init_count, 0);
        assert!(!state.lock().unwrap().is_initialized);

        driver.init().unwrap();

        assert_eq!(state.lock().unwrap().init_count, 1);
        assert!(state.lock().unwrap().is_initialized);
    }

    #[test]
    fn test_mock_driver_init_failure_counts_attempt() {
        let mut driver = MockDriver::new(128, 64);
        driver.state().lock().unwrap().simulate_init_failure = true;

        assert!(driver.init().is_err());

        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.init_attempts, 1);
        assert_eq!(state.init_count, 0);
        assert!(!state.is_initialized);
    }

    #[test]
    fn test_mock_driver_drawing() {
        let mut driver = MockDriver::new(128, 64);

        let line = Line::new(Point::new(0, 0), Point::new(10, 10));
        line.into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut driver)
            .unwrap();

        assert!(driver.count_on_pixels() > 0);
        assert_eq!(driver.get_pixel(0, 0), Some(BinaryColor::On));
        assert!(driver.state().lock().unwrap().draw_calls > 0);
    }

    #[test]
    fn test_mock_driver_panel_follows_flush() {
        let mut driver = MockDriver::new(128, 64);

        Line::new(Point::new(0, 0), Point::new(10, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut driver)
            .unwrap();
        driver.flush().unwrap();
        assert_eq!(driver.panel().unwrap().count_on(), 11);

        // clearing the buffer does not reach the panel until the next flush
        driver.clear_buffer();
        assert_eq!(driver.count_on_pixels(), 0);
        assert_eq!(driver.panel().unwrap().count_on(), 11);

        driver.flush().unwrap();
        assert_eq!(driver.panel().unwrap().count_on(), 0);
        assert_eq!(driver.state().lock().unwrap().clear_count, 1);
    }

    #[test]
    fn test_mock_driver_settings() {
        let mut driver = MockDriver::new(128, 64);

        driver.set_brightness(200).unwrap();
        driver.set_invert(true).unwrap();
        driver.set_rotation(180).unwrap();
        assert!(driver.set_rotation(90).is_err());

        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.last_brightness, Some(200));
        assert_eq!(state.last_invert, Some(true));
        assert_eq!(state.last_rotation, Some(180));
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new(128, 64);

        driver.state().lock().unwrap().simulate_flush_failure = true;
        assert!(driver.flush().is_err());
        assert!(driver.panel().is_none());

        driver.state().lock().unwrap().simulate_flush_failure = false;
        assert!(driver.flush().is_ok());
    }

    #[test]
    fn test_mock_driver_reset_state() {
        let mut driver = MockDriver::new(128, 64);
        driver.init().unwrap();
        driver.flush().unwrap();
        driver.reset_state();

        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.init_count, 0);
        assert_eq!(state.flush_count, 0);
        assert!(state.panel.is_none());
    }
}
