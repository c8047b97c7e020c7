/*
 *  strip/factory.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Strip driver factory - picks the driver named in the configuration
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

use log::info;

use crate::config::{DriverKind, StripConfig};
use crate::strip::drivers::apa102::Apa102Strip;
use crate::strip::drivers::console::ConsoleStrip;
use crate::strip::error::StripError;
use crate::strip::traits::LedStrip;

/// Type alias for boxed strip driver trait objects
pub type BoxedStrip = Box<dyn LedStrip>;

/// Factory for creating strip drivers from configuration
pub struct StripFactory;

impl StripFactory {
    /// Create a strip driver from configuration
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = StripConfig {
    ///     driver: Some(DriverKind::Apa102),
    ///     spi_bus: Some("/dev/spidev0.0".to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// let strip = StripFactory::create_from_config(&config)?;
    /// ```
    pub fn create_from_config(config: &StripConfig) -> Result<BoxedStrip, StripError> {
        let num_pixels = config.num_pixels();
        if num_pixels == 0 {
            return Err(StripError::InvalidConfiguration("num_pixels must be > 0".to_string()));
        }

        let mut strip: BoxedStrip = match config.driver() {
            DriverKind::Apa102 => Box::new(Apa102Strip::open(
                &config.spi_bus(),
                config.spi_speed_hz(),
                num_pixels,
            )?),
            DriverKind::Console => {
                info!("Console emulation - painting {} pixels to the terminal", num_pixels);
                Box::new(ConsoleStrip::new(num_pixels))
            }
        };
        strip.set_clear_on_exit(config.clear_on_exit());
        Ok(strip)
    }
}
