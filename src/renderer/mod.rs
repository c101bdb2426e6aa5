//! Rendering
//!
//! The game core draws through the [`Renderer`] trait. [`FrameBuilder`]
//! batches a frame into triangles; [`GpuRenderer`] uploads that batch to
//! WebGPU each frame.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::{FrameBuilder, StalkVisual};
pub use pipeline::{GpuRenderer, RenderState};

use crate::sim::{Effect, FieldSize, Particle, Segment, Stalk};

/// Drawing surface for one frame at a time: `clear`, draw calls, `present`
pub trait Renderer {
    fn clear(&mut self);
    fn draw_stalk(&mut self, stalk: &Stalk);
    fn draw_particle(&mut self, particle: &Particle);
    fn draw_effect(&mut self, effect: &Effect);
    /// Live preview of the swipe in progress
    fn draw_swipe(&mut self, swipe: &Segment);
    /// A stalk left the simulation; drop anything held for it.
    /// Unknown ids are ignored.
    fn release_stalk(&mut self, id: u32);
    fn present(&mut self);
    /// Field size in CSS pixels and the device pixel ratio backing it
    fn resize(&mut self, _field: FieldSize, _pixel_ratio: f32) {}
}
