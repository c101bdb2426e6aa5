//! Line segment and rectangle geometry for swipe hit-testing
//!
//! Field coordinates: origin at the top-left of the play field, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Denominator magnitude below which two segments are treated as parallel
pub const PARALLEL_EPSILON: f32 = 1e-10;

/// A straight line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Midpoint of the segment
    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.origin + self.size;
        p.x >= self.origin.x && p.x <= max.x && p.y >= self.origin.y && p.y <= max.y
    }

    /// The four boundary edges: top, right, bottom, left
    pub fn edges(&self) -> [Segment; 4] {
        let Vec2 { x, y } = self.origin;
        let Vec2 { x: w, y: h } = self.size;
        let tl = Vec2::new(x, y);
        let tr = Vec2::new(x + w, y);
        let br = Vec2::new(x + w, y + h);
        let bl = Vec2::new(x, y + h);
        [
            Segment::new(tl, tr),
            Segment::new(tr, br),
            Segment::new(br, bl),
            Segment::new(bl, tl),
        ]
    }
}

/// Segment/segment intersection using the parametric cross-product form.
///
/// Parallel segments (denominator below [`PARALLEL_EPSILON`]) never intersect,
/// collinear overlap included.
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    let (p1, p2) = (a.start, a.end);
    let (p3, p4) = (b.start, b.end);

    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / denom;
    let u = -((p1.x - p2.x) * (p1.y - p3.y) - (p1.y - p2.y) * (p1.x - p3.x)) / denom;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// True if either endpoint lies inside `rect` or the segment crosses an edge
pub fn segment_intersects_rect(segment: &Segment, rect: &Rect) -> bool {
    if rect.contains(segment.start) || rect.contains(segment.end) {
        return true;
    }
    rect.edges()
        .iter()
        .any(|edge| segments_intersect(segment, edge))
}
