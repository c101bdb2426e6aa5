//! Per-frame vertex batching
//!
//! Turns simulation entities into one triangle list in field pixels. Also
//! owns the per-stalk visual handles, created on first draw and dropped by
//! [`Renderer::release_stalk`].

use std::collections::HashMap;

use glam::Vec2;

use super::Renderer;
use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::sim::{Effect, EffectKind, FieldSize, Particle, Segment, Stalk};

/// Gap between the two halves of a severed stalk (px)
const SEVER_GAP: f32 = 3.0;
/// Thickness of a joint band (px)
const JOINT_THICKNESS: f32 = 3.0;
const SLASH_WIDTH: f32 = 3.0;
const PERFECT_RING_SEGMENTS: u32 = 24;

/// Visual details fixed for a stalk's lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct StalkVisual {
    /// Joint positions as fractions of the stalk height, top to bottom
    pub joints: Vec<f32>,
}

impl StalkVisual {
    pub fn for_stalk(stalk: &Stalk) -> Self {
        let sections = ((stalk.size.y / stalk.size.x.max(1.0)).round() as usize).clamp(2, 5);
        // Small per-stalk offset so neighbours don't line up
        let jitter = (stalk.id.wrapping_mul(37) % 10) as f32 / 100.0 - 0.05;
        let joints = (1..sections)
            .map(|i| (i as f32 / sections as f32 + jitter).clamp(0.05, 0.95))
            .collect();
        Self { joints }
    }
}

/// Map a field-pixel position to normalized device coordinates
#[inline]
pub fn field_to_ndc(field: FieldSize, p: Vec2) -> Vec2 {
    Vec2::new(
        p.x / field.width.max(1.0) * 2.0 - 1.0,
        1.0 - p.y / field.height.max(1.0) * 2.0,
    )
}

/// Linear blend between two colors
fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

/// Collects one frame of vertices
#[derive(Debug)]
pub struct FrameBuilder {
    field: FieldSize,
    vertices: Vec<Vertex>,
    stalks: HashMap<u32, StalkVisual>,
    frames: u64,
}

impl FrameBuilder {
    pub fn new(field: FieldSize) -> Self {
        Self {
            field,
            vertices: Vec::with_capacity(4096),
            stalks: HashMap::new(),
            frames: 0,
        }
    }

    /// Vertices of the frame being built, in field pixels
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertices of the frame being built, in NDC
    pub fn ndc_vertices(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .map(|v| {
                let p = field_to_ndc(self.field, Vec2::from(v.position));
                Vertex::new(p.x, p.y, v.color)
            })
            .collect()
    }

    /// Visual handle for a stalk, if it has been drawn
    pub fn stalk_visual(&self, id: u32) -> Option<&StalkVisual> {
        self.stalks.get(&id)
    }

    /// Number of stalks holding a visual handle
    pub fn tracked_stalks(&self) -> usize {
        self.stalks.len()
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn stalk_color(stalk: &Stalk) -> [f32; 4] {
        if stalk.severed {
            colors::STALK_SEVERED
        } else {
            let damage =
                1.0 - stalk.hit_points as f32 / stalk.max_hit_points.max(1) as f32;
            mix(colors::STALK, colors::STALK_DAMAGED, damage)
        }
    }
}

impl Renderer for FrameBuilder {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn draw_stalk(&mut self, stalk: &Stalk) {
        let visual = self
            .stalks
            .entry(stalk.id)
            .or_insert_with(|| StalkVisual::for_stalk(stalk));

        let angle = stalk.rotation.to_radians();
        let rot = Vec2::from_angle(angle);
        let center = stalk.center();
        let size = stalk.size;
        let color = Self::stalk_color(stalk);

        if stalk.severed {
            // Two halves drifting apart around the middle
            let half = Vec2::new(size.x, (size.y - SEVER_GAP) * 0.5);
            let offset = (half.y + SEVER_GAP) * 0.5;
            for sign in [-1.0, 1.0] {
                let c = center + rot.rotate(Vec2::new(0.0, sign * offset));
                self.vertices
                    .extend(shapes::rotated_rect(c, half, angle, color));
            }
        } else {
            self.vertices
                .extend(shapes::rotated_rect(center, size, angle, color));
        }

        let band = Vec2::new(size.x * 1.05, JOINT_THICKNESS);
        for &j in &visual.joints {
            let local = Vec2::new(0.0, (j - 0.5) * size.y);
            self.vertices.extend(shapes::rotated_rect(
                center + rot.rotate(local),
                band,
                angle,
                colors::STALK_JOINT,
            ));
        }
    }

    fn draw_particle(&mut self, particle: &Particle) {
        let base = colors::PARTICLES[particle.color as usize % colors::PARTICLES.len()];
        let color = with_alpha(base, particle.life.clamp(0.0, 1.0));
        self.vertices
            .extend(shapes::square(particle.pos, particle.size, color));
    }

    fn draw_effect(&mut self, effect: &Effect) {
        let fade = effect.fade();
        match effect.kind {
            EffectKind::Slash(segment) => {
                self.vertices.extend(shapes::line(
                    segment.start,
                    segment.end,
                    SLASH_WIDTH,
                    with_alpha(colors::SLASH, 0.8 * fade),
                ));
            }
            EffectKind::Perfect { center } => {
                let radius = 10.0 + (1.0 - fade) * 30.0;
                self.vertices.extend(shapes::circle(
                    center,
                    radius * 0.4,
                    with_alpha(colors::PERFECT, 0.5 * fade),
                    PERFECT_RING_SEGMENTS,
                ));
                self.vertices.extend(shapes::ring(
                    center,
                    radius,
                    radius + 4.0,
                    with_alpha(colors::PERFECT, fade),
                    PERFECT_RING_SEGMENTS,
                ));
            }
        }
    }

    fn draw_swipe(&mut self, swipe: &Segment) {
        // Soft glow under a bright core
        self.vertices.extend(shapes::line(
            swipe.start,
            swipe.end,
            SLASH_WIDTH * 3.0,
            with_alpha(colors::SLASH, 0.25),
        ));
        self.vertices.extend(shapes::line(
            swipe.start,
            swipe.end,
            SLASH_WIDTH,
            with_alpha(colors::SLASH, 0.8),
        ));
    }

    fn release_stalk(&mut self, id: u32) {
        self.stalks.remove(&id);
    }

    fn present(&mut self) {
        self.frames += 1;
    }

    fn resize(&mut self, field: FieldSize, _pixel_ratio: f32) {
        self.field = field;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::tests::test_stalk;

    fn builder() -> FrameBuilder {
        FrameBuilder::new(FieldSize::new(800.0, 600.0))
    }

    #[test]
    fn test_ndc_corners() {
        let field = FieldSize::new(800.0, 600.0);
        assert_eq!(field_to_ndc(field, Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(field_to_ndc(field, Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(field_to_ndc(field, Vec2::new(400.0, 300.0)), Vec2::ZERO);
    }

    #[test]
    fn test_stalk_visual_created_once_and_released() {
        let mut frame = builder();
        let stalk = test_stalk(4, Vec2::new(100.0, 100.0), 2);
        frame.draw_stalk(&stalk);
        let first = frame.stalk_visual(4).cloned().unwrap();
        frame.clear();
        frame.draw_stalk(&stalk);
        assert_eq!(frame.stalk_visual(4), Some(&first));
        assert_eq!(frame.tracked_stalks(), 1);

        frame.release_stalk(4);
        assert_eq!(frame.tracked_stalks(), 0);
        // Releasing an unknown id is a no-op
        frame.release_stalk(99);
    }

    #[test]
    fn test_joints_inside_stalk() {
        let stalk = test_stalk(11, Vec2::ZERO, 1);
        let visual = StalkVisual::for_stalk(&stalk);
        assert!(!visual.joints.is_empty());
        assert!(visual.joints.iter().all(|&j| (0.0..=1.0).contains(&j)));
    }

    #[test]
    fn test_severed_stalk_draws_two_halves() {
        let mut frame = builder();
        let mut stalk = test_stalk(1, Vec2::new(100.0, 100.0), 1);
        frame.draw_stalk(&stalk);
        let whole = frame.vertices().len();

        frame.clear();
        stalk.apply_hit();
        frame.draw_stalk(&stalk);
        assert_eq!(frame.vertices().len(), whole + 6);
    }

    #[test]
    fn test_particle_alpha_follows_life() {
        let mut frame = builder();
        frame.draw_particle(&Particle {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            life: 0.25,
            decay: 0.02,
            size: 4.0,
            color: 5,
        });
        assert_eq!(frame.vertices().len(), 6);
        assert!(frame.vertices().iter().all(|v| v.color[3] == 0.25));
    }

    #[test]
    fn test_clear_empties_batch() {
        let mut frame = builder();
        frame.draw_swipe(&Segment::new(Vec2::ZERO, Vec2::new(30.0, 40.0)));
        assert_eq!(frame.vertices().len(), 12);
        frame.clear();
        assert!(frame.vertices().is_empty());
        frame.present();
        assert_eq!(frame.frames(), 1);
    }
}
