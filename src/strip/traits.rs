/*
 *  strip/traits.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for LED strip driver abstraction
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

use smart_leds::RGB8;
use crate::strip::error::StripError;

/// One buffered LED: color plus its own brightness (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pixel {
    pub color: RGB8,
    pub brightness: f32,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, brightness: f32) -> Self {
        Self {
            color: RGB8::new(r, g, b),
            // out of range brightness is a caller slip, not worth an error
            brightness: brightness.clamp(0.0, 1.0),
        }
    }

    /// True when the LED emits any light
    pub fn is_lit(&self) -> bool {
        self.brightness > 0.0 && self.color != RGB8::default()
    }
}

/// Minimal hardware abstraction - all strip drivers must implement this trait
///
/// Drivers buffer pixel writes and only touch the hardware on `show()`, so a
/// whole frame goes out in one transfer.
pub trait LedStrip: Send {
    /// Number of addressable LEDs
    fn num_pixels(&self) -> usize;

    /// Buffer a single pixel
    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8, brightness: f32) -> Result<(), StripError>;

    /// Buffer every pixel to the same value
    fn set_all(&mut self, r: u8, g: u8, b: u8, brightness: f32) -> Result<(), StripError> {
        for index in 0..self.num_pixels() {
            self.set_pixel(index, r, g, b, brightness)?;
        }
        Ok(())
    }

    /// Flush the buffered frame to the hardware
    fn show(&mut self) -> Result<(), StripError>;

    /// Blank the strip when the driver is dropped
    fn set_clear_on_exit(&mut self, clear: bool);

    /// Blank the strip now
    fn clear(&mut self) -> Result<(), StripError> {
        self.set_all(0, 0, 0, 0.0)?;
        self.show()
    }
}

impl<S: LedStrip + ?Sized> LedStrip for Box<S> {
    fn num_pixels(&self) -> usize {
        (**self).num_pixels()
    }

    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8, brightness: f32) -> Result<(), StripError> {
        (**self).set_pixel(index, r, g, b, brightness)
    }

    fn set_all(&mut self, r: u8, g: u8, b: u8, brightness: f32) -> Result<(), StripError> {
        (**self).set_all(r, g, b, brightness)
    }

    fn show(&mut self) -> Result<(), StripError> {
        (**self).show()
    }

    fn set_clear_on_exit(&mut self, clear: bool) {
        (**self).set_clear_on_exit(clear)
    }

    fn clear(&mut self) -> Result<(), StripError> {
        (**self).clear()
    }
}

/// Bounds check shared by the buffered drivers
pub(crate) fn check_index(index: usize, len: usize) -> Result<(), StripError> {
    if index >= len {
        return Err(StripError::InvalidPixel { index, len });
    }
    Ok(())
}
