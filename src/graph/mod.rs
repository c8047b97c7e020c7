/*
 *  graph/mod.rs
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Graph animation engine - colors, frames, swipes and the on/off toggle
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

pub mod color_table;
pub mod renderer;
pub mod animator;
pub mod controller;

pub use color_table::PixelColorTable;
pub use renderer::{GraphRenderer, GraphState, GraphStyle};
pub use animator::{swipe_steps, SwipeAnimator};
pub use controller::{graph_channel, run_graph_worker, GraphCommand, GraphHandle, ToggleController};
