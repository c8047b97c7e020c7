/*
 *  graph/renderer.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bar graph renderer - scalar value to one full strip frame
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

use crate::config::StripConfig;
use crate::constants::{HUE_RANGE, HUE_START, MAX_BRIGHTNESS, MAX_VALUE};
use crate::graph::color_table::PixelColorTable;
use crate::strip::{LedStrip, StripError};

/// Look of the graph, fixed for the life of the process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStyle {
    pub hue_start: f32,
    pub hue_range: f32,
    pub max_brightness: f32,
    pub max_value: f32,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            hue_start: HUE_START,
            hue_range: HUE_RANGE,
            max_brightness: MAX_BRIGHTNESS,
            max_value: MAX_VALUE,
        }
    }
}

impl From<&StripConfig> for GraphStyle {
    fn from(config: &StripConfig) -> Self {
        Self {
            hue_start: config.hue_start(),
            hue_range: config.hue_range(),
            max_brightness: config.max_brightness(),
            max_value: config.max_value(),
        }
    }
}

/// What the strip currently shows
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphState {
    /// Last value fully rendered
    pub graph_value: f32,
    /// Showing content (true) or blanked by a toggle (false)
    pub leds_on: bool,
}

/// Renders values onto a strip, one flush per frame
pub struct GraphRenderer<S: LedStrip> {
    strip: S,
    colors: PixelColorTable,
    style: GraphStyle,
    state: GraphState,
}

impl<S: LedStrip> GraphRenderer<S> {
    pub fn new(strip: S, style: GraphStyle) -> Self {
        let colors = PixelColorTable::compute(strip.num_pixels(), style.hue_start, style.hue_range);
        Self {
            strip,
            colors,
            style,
            state: GraphState::default(),
        }
    }

    /// Pixels per unit of value
    pub fn scale_factor(&self) -> f32 {
        self.colors.len() as f32 / self.style.max_value
    }

    /// Number of pixels `value` lights; no clamping, callers keep values in range
    pub fn lit_pixels(&self, value: f32) -> usize {
        // multiply before dividing so whole values land on whole thresholds
        let threshold = value * self.colors.len() as f32 / self.style.max_value;
        if threshold <= 0.0 {
            0
        } else {
            threshold.floor() as usize
        }
    }

    /// Draw `value` and flush once
    pub fn render(&mut self, value: f32) -> Result<(), StripError> {
        let lit = self.lit_pixels(value);
        for index in 0..self.colors.len() {
            let color = self.colors.color(index);
            let brightness = if index < lit { self.style.max_brightness } else { 0.0 };
            self.strip.set_pixel(index, color.r, color.g, color.b, brightness)?;
        }
        self.state.graph_value = value;
        self.strip.show()
    }

    pub fn graph_value(&self) -> f32 {
        self.state.graph_value
    }

    pub fn leds_on(&self) -> bool {
        self.state.leds_on
    }

    pub fn set_leds_on(&mut self, on: bool) {
        self.state.leds_on = on;
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn style(&self) -> &GraphStyle {
        &self.style
    }

    pub fn colors(&self) -> &PixelColorTable {
        &self.colors
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut S {
        &mut self.strip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::drivers::mock::MockStrip;

    fn renderer(num_pixels: usize) -> GraphRenderer<MockStrip> {
        GraphRenderer::new(MockStrip::new(num_pixels), GraphStyle::default())
    }

    #[test]
    fn test_zero_lights_nothing() {
        let mut graph = renderer(28);
        let state = graph.strip().state();
        graph.render(0.0).unwrap();
        assert_eq!(state.lock().unwrap().lit_counts(), vec![0]);
    }

    #[test]
    fn test_max_lights_everything() {
        let mut graph = renderer(28);
        let state = graph.strip().state();
        graph.render(100.0).unwrap();
        assert_eq!(state.lock().unwrap().lit_counts(), vec![28]);
    }

    #[test]
    fn test_half_rounds_down() {
        let mut graph = renderer(29);
        let state = graph.strip().state();
        graph.render(50.0).unwrap();
        // 14.5 pixels -> 14
        assert_eq!(state.lock().unwrap().lit_counts(), vec![14]);
    }

    #[test]
    fn test_fractional_threshold_lights_whole_pixels_only() {
        let mut graph = renderer(28);
        let state = graph.strip().state();
        // 35 * 28 / 100 = 9.8, pixel 9 stays dark
        graph.render(35.0).unwrap();
        assert_eq!(graph.lit_pixels(35.0), 9);
        let state = state.lock().unwrap();
        assert_eq!(state.lit_counts(), vec![9]);
        assert_eq!(state.last_frame().unwrap()[9].brightness, 0.0);
    }

    #[test]
    fn test_every_value_matches_floor() {
        let mut graph = renderer(28);
        let state = graph.strip().state();
        for v in 0..=100 {
            graph.render(v as f32).unwrap();
        }
        let counts = state.lock().unwrap().lit_counts();
        for (v, count) in counts.iter().enumerate() {
            assert_eq!(*count, (v * 28) / 100, "value {}", v);
        }
    }

    #[test]
    fn test_lit_pixels_use_gradient_and_max_brightness() {
        let mut graph = renderer(28);
        let state = graph.strip().state();
        graph.render(50.0).unwrap();

        let state = state.lock().unwrap();
        let frame = state.last_frame().unwrap();
        assert_eq!(frame[0].color, graph.colors().color(0));
        assert_eq!(frame[0].brightness, 0.8);
        assert_eq!(frame[13].brightness, 0.8);
        assert_eq!(frame[14].brightness, 0.0);
        // unlit pixels keep their color, only brightness drops
        assert_eq!(frame[27].color, graph.colors().color(27));
    }

    #[test]
    fn test_render_updates_value_and_flushes_once() {
        let mut graph = renderer(28);
        let state = graph.strip().state();
        graph.render(42.5).unwrap();
        assert_eq!(graph.graph_value(), 42.5);
        assert_eq!(state.lock().unwrap().show_count, 1);
    }

    #[test]
    fn test_negative_value_lights_nothing() {
        let graph = renderer(28);
        assert_eq!(graph.lit_pixels(-5.0), 0);
        assert!((graph.scale_factor() - 0.28).abs() < f32::EPSILON);
    }

    #[test]
    fn test_show_failure_propagates() {
        let mut graph = renderer(28);
        graph.strip().state().lock().unwrap().simulate_show_failure = true;
        assert!(graph.render(10.0).is_err());
    }
}
