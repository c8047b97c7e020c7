/*
 *  strip/error.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for strip drivers
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

use thiserror::Error;

/// Unified error type for all strip operations
#[derive(Debug, Error)]
pub enum StripError {
    /// SPI transfer or setup failed
    #[error("SPI communication error: {0}")]
    Spi(String),

    /// GPIO pin error (button wiring)
    #[error("GPIO error: {0}")]
    Gpio(String),

    /// Device node could not be opened or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pixel index outside the strip
    #[error("Pixel {index} out of range for a {len} pixel strip")]
    InvalidPixel { index: usize, len: usize },

    /// Invalid driver configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// Conversion from Linux spidev errors
impl From<linux_embedded_hal::SPIError> for StripError {
    fn from(err: linux_embedded_hal::SPIError) -> Self {
        StripError::Spi(format!("{:?}", err))
    }
}

#[cfg(feature = "gpio-button")]
impl From<rppal::gpio::Error> for StripError {
    fn from(err: rppal::gpio::Error) -> Self {
        StripError::Gpio(err.to_string())
    }
}
