/*
 *  display/status.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wi-Fi and DMX output status screens
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

use core::fmt::{self, Write};
use std::borrow::Cow;
use std::thread;
use std::time::Duration;

use arrayvec::ArrayString;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{debug, error, info, warn};

use crate::display::error::{DisplayInitError, RenderError};
use crate::display::layout::{StatusLayout, ELLIPSIS, MIN_HEIGHT, MIN_WIDTH};
use crate::display::traits::DrawableDisplay;
use crate::draw::{draw_glyph, draw_line, draw_text};
use crate::glyphs::{GLYPH_WIFI, GLYPH_WIFI_WIDTH};

pub const CONNECTING_TEXT: &str = "Connecting...";
pub const ERROR_TEXT: &str = "Could not connect";

/// "Output X - Univ " plus five digits, the widest u16
pub const LABEL_CAPACITY: usize = 24;

pub const BODY_LINES: usize = 3;

/// Which status screen to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    Connecting,
    Error,
    Connected { ip: &'a str },
}

/// Header label for one output port, e.g. "Output A - Univ 1"
pub fn universe_label(output: char, universe: u16) -> ArrayString<LABEL_CAPACITY> {
    let mut label = ArrayString::new();
    // cannot overflow: 16 fixed bytes, one ASCII port letter, at most 5 digits
    let _ = write!(&mut label, "Output {} - Univ {}", output, universe);
    label
}

/// `line` cut to `columns` characters, ending in an ellipsis when shortened
pub fn fit_line(line: &str, columns: usize) -> Cow<'_, str> {
    if line.chars().count() <= columns {
        return Cow::Borrowed(line);
    }
    let keep = columns.saturating_sub(ELLIPSIS.len());
    let mut fitted: String = line.chars().take(keep).collect();
    fitted.push_str(ELLIPSIS);
    Cow::Owned(fitted)
}

/// Text content of one status screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFrame<'a> {
    pub output_a: ArrayString<LABEL_CAPACITY>,
    pub output_b: ArrayString<LABEL_CAPACITY>,
    /// Lines below the panel top, empty strings are spacer lines
    pub body: [&'a str; BODY_LINES],
}

impl<'a> StatusFrame<'a> {
    pub fn compose(universe_a: u16, universe_b: u16, wifi_network: &'a str, screen: Screen<'a>) -> Self {
        let body = match screen {
            Screen::Connecting => [CONNECTING_TEXT, "", wifi_network],
            Screen::Error => [ERROR_TEXT, "", wifi_network],
            Screen::Connected { ip } => [wifi_network, "", ip],
        };
        Self {
            output_a: universe_label('A', universe_a),
            output_b: universe_label('B', universe_b),
            body,
        }
    }

    /// Every non-empty string on the screen, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .map(|line| &**line)
            .chain([self.output_a.as_str(), self.output_b.as_str()])
            .filter(|line| !line.is_empty())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines().any(|line| line == text)
    }

    /// Draw header and body into `target`; the caller clears and flushes.
    pub fn draw<D>(&self, target: &mut D, layout: &StatusLayout) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        draw_glyph(target, &GLYPH_WIFI, GLYPH_WIFI_WIDTH, layout.icon_origin)?;
        let (start, end) = layout.separator;
        draw_line(target, start, end, BinaryColor::On, 1)?;
        draw_text(target, &self.output_a, layout.output_a, layout.text_style)?;
        draw_text(target, &self.output_b, layout.output_b, layout.text_style)?;

        let columns = layout.columns() as usize;
        for (n, line) in self.body.iter().enumerate() {
            if !line.is_empty() {
                draw_text(target, &fit_line(line, columns), layout.body_line(n), layout.text_style)?;
            }
        }
        Ok(())
    }
}

/// Renders Wi-Fi state and the two DMX output universes onto the panel.
///
/// The driver is borrowed for the lifetime of the status display; the caller
/// builds it and keeps ownership. Nothing is drawn until [`initialize`]
/// succeeds.
///
/// [`initialize`]: StatusDisplay::initialize
pub struct StatusDisplay<'a, D> {
    display: &'a mut D,
    universe_a: u16,
    universe_b: u16,
    wifi_network: &'a str,
    layout: Option<StatusLayout>,
}

impl<'a, D> StatusDisplay<'a, D>
where
    D: DrawableDisplay,
    D::Error: fmt::Debug,
{
    pub fn new(display: &'a mut D, universe_a: u16, universe_b: u16, wifi_network: &'a str) -> Self {
        Self {
            display,
            universe_a,
            universe_b,
            wifi_network,
            layout: None,
        }
    }

    pub fn universe_a(&self) -> u16 { self.universe_a }
    pub fn universe_b(&self) -> u16 { self.universe_b }
    pub fn wifi_network(&self) -> &str { self.wifi_network }

    pub fn is_initialized(&self) -> bool {
        self.layout.is_some()
    }

    /// Bring up the panel and fix the text style.
    ///
    /// On failure the display stays uninitialized and every `show_*` call
    /// returns [`RenderError::NotInitialized`] without touching the driver.
    pub fn initialize(&mut self) -> Result<(), DisplayInitError> {
        info!(
            "Initializing status display: network '{}', universes {} and {}",
            self.wifi_network, self.universe_a, self.universe_b
        );

        if let Err(e) = self.display.init() {
            error!("Display allocation failed: {}", e);
            return Err(DisplayInitError::Driver(e));
        }

        let size = self.display.bounding_box().size;
        let layout = StatusLayout::for_size(size).ok_or_else(|| {
            error!("Panel {}x{} is too small for the status layout", size.width, size.height);
            DisplayInitError::UnsupportedGeometry {
                width: size.width,
                height: size.height,
                min_width: MIN_WIDTH,
                min_height: MIN_HEIGHT,
            }
        })?;

        debug!("Status layout ready: {}x{}, {} columns", layout.width, layout.height, layout.columns());
        self.layout = Some(layout);
        Ok(())
    }

    /// [`initialize`](Self::initialize), retried up to `attempts` times.
    ///
    /// Geometry errors are returned at once, a retry cannot fix them.
    pub fn initialize_with_retry(&mut self, attempts: u32, delay: Duration) -> Result<(), DisplayInitError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.initialize() {
                Ok(()) => return Ok(()),
                Err(e @ DisplayInitError::UnsupportedGeometry { .. }) => return Err(e),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!("Display init attempt {}/{} failed: {}", attempt, attempts, e);
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    /// Text content `show` would put on the panel for `screen`
    pub fn frame<'s>(&'s self, screen: Screen<'s>) -> StatusFrame<'s> {
        StatusFrame::compose(self.universe_a, self.universe_b, self.wifi_network, screen)
    }

    pub fn show_connecting(&mut self) -> Result<(), RenderError> {
        self.show(Screen::Connecting)
    }

    pub fn show_error(&mut self) -> Result<(), RenderError> {
        self.show(Screen::Error)
    }

    /// `ip_address` is drawn exactly as given, it is not parsed.
    pub fn show_connected(&mut self, ip_address: &str) -> Result<(), RenderError> {
        self.show(Screen::Connected { ip: ip_address })
    }

    /// Clear, draw `screen` and flush it to the panel
    pub fn show(&mut self, screen: Screen<'_>) -> Result<(), RenderError> {
        let Some(layout) = self.layout.as_ref() else {
            return Err(RenderError::NotInitialized);
        };
        debug!("Showing {:?}", screen);

        let frame = StatusFrame::compose(self.universe_a, self.universe_b, self.wifi_network, screen);
        self.display.clear_buffer();
        frame
            .draw(&mut *self.display, layout)
            .map_err(|e| RenderError::Draw(format!("{:?}", e)))?;
        self.display.flush()?;
        Ok(())
    }
}
