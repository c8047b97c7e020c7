/*
 *  graph/controller.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  On/off toggle state machine and the single writer command worker
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

use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::graph::animator::SwipeAnimator;
use crate::strip::{LedStrip, StripError};

/// Owns the animator and decides what a toggle or new value does
///
/// `graph_target` is the restore point: the last value from the data source,
/// or whatever was on the strip when it was switched off. The zero shown while
/// off never reaches it.
pub struct ToggleController<S: LedStrip> {
    animator: SwipeAnimator<S>,
    graph_target: f32,
    intro_sweep: bool,
}

impl<S: LedStrip> ToggleController<S> {
    pub fn new(animator: SwipeAnimator<S>) -> Self {
        Self {
            animator,
            graph_target: 0.0,
            intro_sweep: true,
        }
    }

    /// Skip or run the power-up sweep in `init_leds`
    pub fn with_intro_sweep(mut self, intro_sweep: bool) -> Self {
        self.intro_sweep = intro_sweep;
        self
    }

    /// Bring the strip up in the ON state
    pub fn init_leds(&mut self, clear_on_exit: bool) -> Result<(), StripError> {
        let renderer = self.animator.renderer_mut();
        renderer.strip_mut().set_clear_on_exit(clear_on_exit);
        renderer.set_leds_on(true);

        if self.intro_sweep {
            let max_value = self.animator.renderer().style().max_value;
            let frames = self.animator.swipe(Some(max_value))?;
            debug!("intro sweep done in {} frames", frames);
        } else {
            self.animator.swipe(None)?;
        }
        Ok(())
    }

    /// Flip ON/OFF; returns the new state (true = on)
    pub fn toggle_lights(&mut self) -> Result<bool, StripError> {
        if self.is_on() {
            self.graph_target = self.animator.graph_value();
            self.animator.swipe(Some(0.0))?;
            self.animator.renderer_mut().set_leds_on(false);
            info!("Lights off, holding {}", self.graph_target);
        } else {
            self.animator.swipe(Some(self.graph_target))?;
            self.animator.renderer_mut().set_leds_on(true);
            info!("Lights on, restored {}", self.graph_target);
        }
        Ok(self.is_on())
    }

    /// New reading from the data source
    ///
    /// Always remembered; only animated while the strip is on.
    pub fn update(&mut self, value: f32) -> Result<usize, StripError> {
        self.graph_target = value;
        if !self.is_on() {
            debug!("Lights off, {} held for next toggle", value);
            return Ok(0);
        }
        self.animator.swipe(Some(value))
    }

    /// Force one frame at the displayed value (no-op while off)
    pub fn redraw(&mut self) -> Result<usize, StripError> {
        if !self.is_on() {
            return Ok(0);
        }
        self.animator.swipe(None)
    }

    pub fn is_on(&self) -> bool {
        self.animator.renderer().leds_on()
    }

    pub fn graph_target(&self) -> f32 {
        self.graph_target
    }

    pub fn graph_value(&self) -> f32 {
        self.animator.graph_value()
    }

    pub fn animator(&self) -> &SwipeAnimator<S> {
        &self.animator
    }
}

/// Work for the strip owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphCommand {
    /// Fresh index value
    Update(f32),
    /// Button press
    Toggle,
    /// Stop the worker and release the strip
    Shutdown,
}

/// Cloneable sender side of the strip worker
///
/// Safe to use from any thread, including the GPIO interrupt thread.
#[derive(Debug, Clone)]
pub struct GraphHandle {
    tx: UnboundedSender<GraphCommand>,
}

impl GraphHandle {
    /// Returns false once the worker is gone
    pub fn send(&self, command: GraphCommand) -> bool {
        if self.tx.send(command).is_err() {
            warn!("Graph worker stopped, dropped {:?}", command);
            return false;
        }
        true
    }

    pub fn update(&self, value: f32) -> bool {
        self.send(GraphCommand::Update(value))
    }

    pub fn toggle(&self) -> bool {
        self.send(GraphCommand::Toggle)
    }

    pub fn shutdown(&self) -> bool {
        self.send(GraphCommand::Shutdown)
    }
}

/// Command queue feeding a single strip owner
pub fn graph_channel() -> (GraphHandle, UnboundedReceiver<GraphCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (GraphHandle { tx }, rx)
}

/// Apply commands one at a time until shutdown or every handle is dropped
///
/// Blocking; run it on a dedicated thread (`spawn_blocking`). A toggle that
/// arrives mid swipe waits for the swipe to finish. Returns the controller so
/// the caller decides when the strip is dropped.
pub fn run_graph_worker<S: LedStrip>(
    mut controller: ToggleController<S>,
    mut rx: UnboundedReceiver<GraphCommand>,
) -> Result<ToggleController<S>, StripError> {
    while let Some(command) = rx.blocking_recv() {
        match command {
            GraphCommand::Update(value) => {
                let frames = controller.update(value)?;
                debug!("update {} rendered {} frames", value, frames);
            }
            GraphCommand::Toggle => {
                controller.toggle_lights()?;
            }
            GraphCommand::Shutdown => {
                info!("Graph worker shutting down");
                break;
            }
        }
    }
    Ok(controller)
}
