/*
 *  strip/drivers/mock.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock strip driver for testing without hardware
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

use std::sync::{Arc, Mutex};

use crate::strip::error::StripError;
use crate::strip::traits::{check_index, LedStrip, Pixel};

/// Mock strip driver for testing
///
/// This driver simulates a strip without requiring hardware. It's useful for:
/// - Unit tests
/// - Integration tests
/// - Development without a Pi
///
/// Every `show()` snapshots the buffer into the shared state so tests can
/// replay the exact frames an animation produced.
#[derive(Debug)]
pub struct MockStrip {
    /// Pending frame
    pixels: Vec<Pixel>,

    /// Shared state for testing
    state: Arc<Mutex<MockStripState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockStripState {
    /// Number of times show() was called
    pub show_count: usize,

    /// Every frame flushed, oldest first
    pub frames: Vec<Vec<Pixel>>,

    /// Last clear on exit flag set
    pub clear_on_exit: bool,

    /// Set when the driver blanked itself on drop
    pub cleared_on_exit: bool,

    /// Simulate failures (for error testing)
    pub simulate_show_failure: bool,
}

impl MockStripState {
    /// Lit pixel count of every flushed frame
    pub fn lit_counts(&self) -> Vec<usize> {
        self.frames
            .iter()
            .map(|frame| frame.iter().filter(|p| p.is_lit()).count())
            .collect()
    }

    /// The most recent frame, if any
    pub fn last_frame(&self) -> Option<&Vec<Pixel>> {
        self.frames.last()
    }
}

impl MockStrip {
    /// Create a new mock strip
    pub fn new(num_pixels: usize) -> Self {
        Self {
            pixels: vec![Pixel::default(); num_pixels],
            state: Arc::new(Mutex::new(MockStripState::default())),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockStripState>> {
        Arc::clone(&self.state)
    }

    /// Pixel currently buffered (not necessarily shown)
    pub fn get_pixel(&self, index: usize) -> Option<Pixel> {
        self.pixels.get(index).copied()
    }
}

impl LedStrip for MockStrip {
    fn num_pixels(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8, brightness: f32) -> Result<(), StripError> {
        check_index(index, self.pixels.len())?;
        self.pixels[index] = Pixel::new(r, g, b, brightness);
        Ok(())
    }

    fn show(&mut self) -> Result<(), StripError> {
        let mut state = self.state.lock().unwrap();

        if state.simulate_show_failure {
            return Err(StripError::Spi("Simulated show failure".to_string()));
        }

        state.show_count += 1;
        state.frames.push(self.pixels.clone());
        Ok(())
    }

    fn set_clear_on_exit(&mut self, clear: bool) {
        self.state.lock().unwrap().clear_on_exit = clear;
    }
}

impl Drop for MockStrip {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            if state.clear_on_exit {
                state.cleared_on_exit = true;
            }
        }
    }
}
