//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in field pixel coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Two triangles covering the quad `a b c d` (in winding order)
fn quad_vertices(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Axis-aligned square centered on `center`
pub fn square(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = size * 0.5;
    quad_vertices(
        center + Vec2::new(-h, -h),
        center + Vec2::new(h, -h),
        center + Vec2::new(h, h),
        center + Vec2::new(-h, h),
        color,
    )
    .to_vec()
}

/// Rectangle of `size` centered on `center`, rotated by `angle` radians
pub fn rotated_rect(center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let h = size * 0.5;
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y));
    quad_vertices(
        corner(-h.x, -h.y),
        corner(h.x, -h.y),
        corner(h.x, h.y),
        corner(-h.x, h.y),
        color,
    )
    .to_vec()
}

/// Thick line from `a` to `b`. Degenerate lines produce nothing.
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width * 0.5);
    quad_vertices(a + perp, b + perp, b - perp, a - perp, color).to_vec()
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let a1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let a2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);

        let inner1 = center + a1 * inner_radius;
        let outer1 = center + a1 * outer_radius;
        let inner2 = center + a2 * inner_radius;
        let outer2 = center + a2 * outer_radius;

        vertices.extend_from_slice(&quad_vertices(inner1, outer1, outer2, inner2, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(vs: &[Vertex]) -> Vec<Vec2> {
        vs.iter().map(|v| Vec2::from(v.position)).collect()
    }

    #[test]
    fn test_square_bounds() {
        let vs = square(Vec2::new(10.0, 10.0), 4.0, [1.0; 4]);
        assert_eq!(vs.len(), 6);
        for p in positions(&vs) {
            assert!(p.x == 8.0 || p.x == 12.0);
            assert!(p.y == 8.0 || p.y == 12.0);
        }
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let vs = rotated_rect(Vec2::ZERO, Vec2::new(4.0, 2.0), PI / 2.0, [1.0; 4]);
        for p in positions(&vs) {
            // Width now runs along y
            assert!((p.x.abs() - 1.0).abs() < 1e-5);
            assert!((p.y.abs() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_line_width() {
        let vs = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, [1.0; 4]);
        assert_eq!(vs.len(), 6);
        for p in positions(&vs) {
            assert!((p.y.abs() - 2.0).abs() < 1e-5);
        }
        assert!(line(Vec2::ONE, Vec2::ONE, 3.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_ring_radii() {
        let center = Vec2::new(5.0, 5.0);
        let vs = ring(center, 3.0, 6.0, [1.0; 4], 16);
        assert_eq!(vs.len(), 16 * 6);
        for p in positions(&vs) {
            let d = p.distance(center);
            assert!((d - 3.0).abs() < 1e-4 || (d - 6.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_circle_triangle_count() {
        assert_eq!(circle(Vec2::ZERO, 1.0, [1.0; 4], 12).len(), 36);
    }
}
