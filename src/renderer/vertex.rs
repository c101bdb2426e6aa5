//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` to an opaque RGBA color
pub const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    use super::rgb;

    pub const BACKGROUND: [f32; 4] = rgb(0x0f1a14);
    pub const STALK: [f32; 4] = rgb(0x4a7c59);
    /// Stalk tint once it has taken damage
    pub const STALK_DAMAGED: [f32; 4] = rgb(0x8a9b4a);
    pub const STALK_SEVERED: [f32; 4] = rgb(0x6b9b78);
    pub const STALK_JOINT: [f32; 4] = rgb(0x2d4a3a);
    pub const SLASH: [f32; 4] = rgb(0xffd700);
    pub const PERFECT: [f32; 4] = rgb(0xffed4e);

    /// Particle palette, indexed by `Particle::color`
    pub const PARTICLES: [[f32; 4]; 6] = [
        rgb(0x4a7c59),
        rgb(0x6b9b78),
        rgb(0xffd700),
        rgb(0xffed4e),
        rgb(0x2d4a3a),
        rgb(0xffffff),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb() {
        assert_eq!(rgb(0xffffff), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        let c = rgb(0x4a7c59);
        assert!((c[0] - 74.0 / 255.0).abs() < 1e-6);
        assert!((c[1] - 124.0 / 255.0).abs() < 1e-6);
        assert!((c[2] - 89.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_palette_matches_particle_colors() {
        assert_eq!(
            colors::PARTICLES.len(),
            crate::sim::state::PARTICLE_COLORS as usize
        );
    }
}
