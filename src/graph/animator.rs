/*
 *  graph/animator.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Swipe animation between two graph values
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

use std::time::Duration;
use log::debug;

use crate::graph::renderer::GraphRenderer;
use crate::strip::{LedStrip, StripError};

/// Integer values a swipe from `current` to `target` passes through
///
/// Exclusive of `current`, inclusive of `target`. A fractional target gets one
/// extra frame so the graph lands on it exactly.
pub fn swipe_steps(current: f32, target: f32) -> Vec<f32> {
    if target == current {
        return Vec::new();
    }

    let mut steps: Vec<f32> = if target < current {
        let from = current.ceil() as i64 - 1;
        let to = target.ceil() as i64;
        (to..=from).rev().map(|v| v as f32).collect()
    } else {
        let from = current.floor() as i64 + 1;
        let to = target.floor() as i64;
        (from..=to).map(|v| v as f32).collect()
    };

    if target.fract() != 0.0 {
        steps.push(target);
    }
    steps
}

/// Drives the renderer one integer step per frame
///
/// No frame timer: pacing comes from the strip's write latency unless a
/// frame delay is configured (the console emulator flushes in microseconds).
pub struct SwipeAnimator<S: LedStrip> {
    renderer: GraphRenderer<S>,
    frame_delay: Duration,
}

impl<S: LedStrip> SwipeAnimator<S> {
    pub fn new(renderer: GraphRenderer<S>) -> Self {
        Self { renderer, frame_delay: Duration::ZERO }
    }

    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    /// Animate to `target`, or redraw the current value when `None`
    ///
    /// Returns the number of frames rendered.
    pub fn swipe(&mut self, target: Option<f32>) -> Result<usize, StripError> {
        let current = self.renderer.graph_value();
        let Some(target) = target else {
            self.renderer.render(current)?;
            return Ok(1);
        };

        // swipe_steps walks down or up depending on the sign of the move
        let frames = self.play(swipe_steps(current, target))?;
        debug!("swipe {} -> {} in {} frames", current, target, frames);
        Ok(frames)
    }

    fn play(&mut self, steps: Vec<f32>) -> Result<usize, StripError> {
        for &value in &steps {
            self.renderer.render(value)?;
            if !self.frame_delay.is_zero() {
                std::thread::sleep(self.frame_delay);
            }
        }
        Ok(steps.len())
    }

    pub fn graph_value(&self) -> f32 {
        self.renderer.graph_value()
    }

    pub fn renderer(&self) -> &GraphRenderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut GraphRenderer<S> {
        &mut self.renderer
    }
}
