/*
 *  strip/drivers/console.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Terminal emulator driver - paints the strip as truecolor blocks
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

use std::io::{self, Write};

use crate::strip::error::StripError;
use crate::strip::traits::{check_index, LedStrip, Pixel};

/// Console strip driver for development without hardware
///
/// Each `show()` redraws a single line in place, so a swipe plays back as an
/// animation in the terminal.
pub struct ConsoleStrip<W: Write + Send = io::Stdout> {
    out: W,
    pixels: Vec<Pixel>,
    clear_on_exit: bool,
}

impl ConsoleStrip<io::Stdout> {
    pub fn new(num_pixels: usize) -> Self {
        Self::with_writer(io::stdout(), num_pixels)
    }
}

impl<W: Write + Send> ConsoleStrip<W> {
    pub fn with_writer(out: W, num_pixels: usize) -> Self {
        Self {
            out,
            pixels: vec![Pixel::default(); num_pixels],
            clear_on_exit: true,
        }
    }

    fn render_line(&self) -> String {
        let mut line = String::with_capacity(self.pixels.len() * 24 + 8);
        line.push('\r');
        for pixel in &self.pixels {
            let scale = |c: u8| (c as f32 * pixel.brightness) as u8;
            line.push_str(&format!(
                "\x1b[38;2;{};{};{}m\u{2588}",
                scale(pixel.color.r),
                scale(pixel.color.g),
                scale(pixel.color.b)
            ));
        }
        line.push_str("\x1b[0m");
        line
    }
}

impl<W: Write + Send> LedStrip for ConsoleStrip<W> {
    fn num_pixels(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8, brightness: f32) -> Result<(), StripError> {
        check_index(index, self.pixels.len())?;
        self.pixels[index] = Pixel::new(r, g, b, brightness);
        Ok(())
    }

    fn show(&mut self) -> Result<(), StripError> {
        let line = self.render_line();
        self.out.write_all(line.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn set_clear_on_exit(&mut self, clear: bool) {
        self.clear_on_exit = clear;
    }
}

impl<W: Write + Send> Drop for ConsoleStrip<W> {
    fn drop(&mut self) {
        if self.clear_on_exit {
            self.pixels.fill(Pixel::default());
            let _ = self.show();
        }
        let _ = writeln!(self.out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_paints_one_block_per_pixel() {
        let mut strip = ConsoleStrip::with_writer(Vec::new(), 3);
        strip.set_clear_on_exit(false);
        strip.set_pixel(0, 200, 100, 0, 1.0).unwrap();
        strip.show().unwrap();

        let text = String::from_utf8(strip.out.clone()).unwrap();
        assert_eq!(text.matches('\u{2588}').count(), 3);
        assert!(text.contains("\x1b[38;2;200;100;0m"));
        assert!(text.contains("\x1b[38;2;0;0;0m"));
    }

    #[test]
    fn test_brightness_dims_the_block() {
        let mut strip = ConsoleStrip::with_writer(Vec::new(), 1);
        strip.set_clear_on_exit(false);
        strip.set_pixel(0, 200, 100, 50, 0.5).unwrap();
        strip.show().unwrap();

        let text = String::from_utf8(strip.out.clone()).unwrap();
        assert!(text.contains("\x1b[38;2;100;50;25m"));
    }
}
