/*
 *  graph/color_table.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Precomputed hue gradient, one color per pixel
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

/// Fixed gradient across the strip, computed once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct PixelColorTable {
    colors: Vec<RGB8>,
}

impl PixelColorTable {
    /// Sweep `hue_range` degrees starting at `hue_start` across `pixel_count` pixels
    pub fn compute(pixel_count: usize, hue_start: f32, hue_range: f32) -> Self {
        let colors = (0..pixel_count)
            .map(|i| {
                let offset = (i as f64 / pixel_count as f64) * hue_range as f64;
                let hue = (hue_start as f64 + offset).rem_euclid(360.0) / 360.0;
                let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
                // truncate, never round
                RGB8::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color of one pixel; out of range is a bug and panics
    #[inline]
    pub fn color(&self, index: usize) -> RGB8 {
        self.colors[index]
    }

    pub fn as_slice(&self) -> &[RGB8] {
        &self.colors
    }
}

/// Six sector HSV to RGB, all components 0.0 - 1.0
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_is_deterministic() {
        let a = PixelColorTable::compute(28, 10.0, 80.0);
        let b = PixelColorTable::compute(28, 10.0, 80.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 28);
    }

    #[test]
    fn test_first_pixel_is_red_orange() {
        let table = PixelColorTable::compute(28, 10.0, 80.0);
        // hue 10 deg: g = trunc(255 * 1/6) = 42
        assert_eq!(table.color(0), RGB8::new(255, 42, 0));
    }

    #[test]
    fn test_sweep_stays_between_red_and_green() {
        let table = PixelColorTable::compute(28, 10.0, 80.0);
        for color in table.as_slice() {
            assert_eq!(color.b, 0);
            assert!(color.r == 255 || color.g == 255);
        }
        let last = table.color(27);
        assert_eq!(last.g, 255);
        assert!(last.r < 255);
    }

    #[test]
    fn test_hue_wraps_past_360() {
        let table = PixelColorTable::compute(2, 350.0, 20.0);
        // 350 deg and 0 deg
        assert_eq!(table.color(0), RGB8::new(255, 0, 42));
        assert_eq!(table.color(1), RGB8::new(255, 0, 0));
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0).1, 1.0);
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.25), (0.25, 0.25, 0.25));
    }

    #[test]
    fn test_empty_strip_has_no_colors() {
        let table = PixelColorTable::compute(0, 10.0, 80.0);
        assert!(table.is_empty());
        assert!(!PixelColorTable::compute(1, 10.0, 80.0).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let table = PixelColorTable::compute(4, 10.0, 80.0);
        let _ = table.color(4);
    }
}
