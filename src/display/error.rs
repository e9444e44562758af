/*
 *  display/error.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the display subsystem
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

use std::fmt;
use std::error::Error;

/// Driver level error, returned by every `DisplayDriver` operation
#[derive(Debug)]
pub enum DisplayError {
    /// Hardware initialization failed
    InitializationFailed(String),

    /// I2C communication error
    I2cError(String),

    /// Invalid configuration
    InvalidConfiguration(String),

    /// Invalid rotation angle
    InvalidRotation(u16),

    /// Display interface error
    InterfaceError(display_interface::DisplayError),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Display initialization failed: {}", msg),
            DisplayError::I2cError(msg) =>
                write!(f, "I2C communication error: {}", msg),
            DisplayError::InvalidConfiguration(msg) =>
                write!(f, "Invalid configuration: {}", msg),
            DisplayError::InvalidRotation(degrees) =>
                write!(f, "Invalid rotation angle: {} (must be 0 or 180)", degrees),
            DisplayError::InterfaceError(err) =>
                write!(f, "Display interface error: {:?}", err),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    // display_interface::DisplayError doesn't implement std::error::Error
    // so we can't provide it as a source
}

impl From<display_interface::DisplayError> for DisplayError {
    fn from(err: display_interface::DisplayError) -> Self {
        DisplayError::InterfaceError(err)
    }
}

/// Raised by `StatusDisplay::initialize` when the panel cannot be brought up.
///
/// The caller decides what happens next: retry, run headless, or halt.
#[derive(Debug, thiserror::Error)]
pub enum DisplayInitError {
    #[error("display driver failed to start: {0}")]
    Driver(#[source] DisplayError),

    #[error("panel is {width}x{height}, status layout needs at least {min_width}x{min_height}")]
    UnsupportedGeometry {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
}

/// Raised by the `show_*` family when a screen could not reach the panel.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("display has not been initialized")]
    NotInitialized,

    #[error("drawing into the frame buffer failed: {0}")]
    Draw(String),

    #[error("flushing the frame buffer to the panel failed: {0}")]
    Flush(#[from] DisplayError),
}
