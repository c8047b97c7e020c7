/*
 *  strip/drivers/apa102.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  APA102 / DotStar strip driver over SPI
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

use embedded_hal::spi::SpiDevice;
use linux_embedded_hal::SpidevDevice;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use log::{info, warn};

use crate::strip::error::StripError;
use crate::strip::traits::{check_index, LedStrip, Pixel};

/// Each LED frame opens with the three marker bits set
const LED_FRAME_MARKER: u8 = 0b1110_0000;
/// APA102 global brightness is 5 bits
const BRIGHTNESS_STEPS: f32 = 31.0;

/// APA102 strip driver
///
/// Generic over any `embedded_hal` SPI device so it can be driven by spidev on
/// the Pi or by a recording bus in tests.
pub struct Apa102Strip<SPI: SpiDevice> {
    spi: SPI,
    pixels: Vec<Pixel>,
    clear_on_exit: bool,
}

impl Apa102Strip<SpidevDevice> {
    /// Open an APA102 strip on a Linux spidev node
    ///
    /// # Arguments
    ///
    /// * `bus` - Path to SPI device (e.g., "/dev/spidev0.0")
    /// * `speed_hz` - SPI clock
    /// * `num_pixels` - LEDs on the strip
    pub fn open(bus: &str, speed_hz: u32, num_pixels: usize) -> Result<Self, StripError> {
        info!("Initializing APA102 strip on {} at {} Hz, {} pixels", bus, speed_hz, num_pixels);

        let mut spi = SpidevDevice::open(bus)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)?;

        Self::new(spi, num_pixels)
    }
}

impl<SPI: SpiDevice> Apa102Strip<SPI> {
    pub fn new(spi: SPI, num_pixels: usize) -> Result<Self, StripError> {
        if num_pixels == 0 {
            return Err(StripError::InvalidConfiguration("strip needs at least one pixel".to_string()));
        }
        Ok(Self {
            spi,
            pixels: vec![Pixel::default(); num_pixels],
            clear_on_exit: true,
        })
    }

    fn write_frame(&mut self) -> Result<(), StripError> {
        let frame = encode_frame(&self.pixels);
        self.spi
            .write(&frame)
            .map_err(|e| StripError::Spi(format!("{:?}", e)))
    }
}

/// Serialise a buffer into one APA102 transfer
///
/// start frame (32 zero bits), one 4 byte frame per LED in
/// brightness/blue/green/red order, then half a clock per LED of end frame.
pub(crate) fn encode_frame(pixels: &[Pixel]) -> Vec<u8> {
    let end_len = pixels.len().div_ceil(16);
    let mut frame = Vec::with_capacity(4 + pixels.len() * 4 + end_len);

    frame.extend_from_slice(&[0x00; 4]);
    for pixel in pixels {
        let level = (pixel.brightness * BRIGHTNESS_STEPS) as u8 & 0x1F;
        frame.push(LED_FRAME_MARKER | level);
        frame.push(pixel.color.b);
        frame.push(pixel.color.g);
        frame.push(pixel.color.r);
    }
    frame.extend(std::iter::repeat_n(0xFF, end_len));
    frame
}

impl<SPI: SpiDevice + Send> LedStrip for Apa102Strip<SPI> {
    fn num_pixels(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8, brightness: f32) -> Result<(), StripError> {
        check_index(index, self.pixels.len())?;
        self.pixels[index] = Pixel::new(r, g, b, brightness);
        Ok(())
    }

    fn show(&mut self) -> Result<(), StripError> {
        self.write_frame()
    }

    fn set_clear_on_exit(&mut self, clear: bool) {
        self.clear_on_exit = clear;
    }
}

impl<SPI: SpiDevice> Drop for Apa102Strip<SPI> {
    fn drop(&mut self) {
        if self.clear_on_exit {
            self.pixels.fill(Pixel::default());
            if let Err(e) = self.write_frame() {
                warn!("Failed to blank strip on exit: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::{ErrorType, Operation};
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    /// Records every byte written to the bus
    #[derive(Clone, Default)]
    struct RecordingSpi {
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl ErrorType for RecordingSpi {
        type Error = Infallible;
    }

    impl SpiDevice for RecordingSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            let mut bytes = Vec::new();
            for op in operations.iter() {
                if let Operation::Write(data) = op {
                    bytes.extend_from_slice(data);
                }
            }
            self.writes.lock().unwrap().push(bytes);
            Ok(())
        }
    }

    #[test]
    fn test_encode_frame_layout() {
        let pixels = vec![
            Pixel::new(0x11, 0x22, 0x33, 1.0),
            Pixel::new(0xAA, 0xBB, 0xCC, 0.0),
        ];
        let frame = encode_frame(&pixels);

        assert_eq!(&frame[0..4], &[0, 0, 0, 0]);
        // full brightness, then BGR
        assert_eq!(&frame[4..8], &[0xFF, 0x33, 0x22, 0x11]);
        assert_eq!(&frame[8..12], &[0xE0, 0xCC, 0xBB, 0xAA]);
        assert_eq!(&frame[12..], &[0xFF]);
    }

    #[test]
    fn test_brightness_is_truncated_to_five_bits() {
        let frame = encode_frame(&[Pixel::new(1, 1, 1, 0.8)]);
        // 0.8 * 31 = 24.8 -> 24
        assert_eq!(frame[4], 0xE0 | 24);
    }

    #[test]
    fn test_end_frame_grows_with_strip() {
        let frame = encode_frame(&vec![Pixel::default(); 28]);
        assert_eq!(frame.len(), 4 + 28 * 4 + 2);
        assert!(frame[116..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_show_writes_one_transfer() {
        let spi = RecordingSpi::default();
        let writes = spi.writes.clone();
        let mut strip = Apa102Strip::new(spi, 4).unwrap();
        strip.set_clear_on_exit(false);

        strip.set_pixel(0, 255, 0, 0, 1.0).unwrap();
        strip.set_pixel(3, 0, 0, 255, 0.5).unwrap();
        assert!(writes.lock().unwrap().is_empty());

        strip.show().unwrap();
        assert_eq!(writes.lock().unwrap().len(), 1);
        assert_eq!(writes.lock().unwrap()[0].len(), 4 + 16 + 1);
    }

    #[test]
    fn test_out_of_range_pixel() {
        let mut strip = Apa102Strip::new(RecordingSpi::default(), 4).unwrap();
        strip.set_clear_on_exit(false);
        assert!(matches!(
            strip.set_pixel(4, 0, 0, 0, 0.0),
            Err(StripError::InvalidPixel { index: 4, len: 4 })
        ));
    }

    #[test]
    fn test_drop_blanks_strip_when_asked() {
        let spi = RecordingSpi::default();
        let writes = spi.writes.clone();
        {
            let mut strip = Apa102Strip::new(spi, 2).unwrap();
            strip.set_all(255, 255, 255, 1.0).unwrap();
            strip.show().unwrap();
        }
        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(&writes[1][4..8], &[0xE0, 0, 0, 0]);
        assert_eq!(&writes[1][8..12], &[0xE0, 0, 0, 0]);
    }
}
