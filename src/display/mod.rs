/*
 *  display/mod.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;

// Display drivers
pub mod drivers;

// Fixed layout and the status screens drawn with it
pub mod layout;
pub mod status;

// Re-exports for convenience
pub use traits::{DisplayDriver, DrawableDisplay, DisplayCapabilities};
pub use error::{DisplayError, DisplayInitError, RenderError};
pub use framebuffer::FrameBuffer;
pub use layout::StatusLayout;
pub use status::{Screen, StatusDisplay, StatusFrame};
pub use drivers::mock::MockDriver;

#[cfg(feature = "driver-ssd1306")]
pub use drivers::ssd1306::Ssd1306Driver;
