//! Swipe capture
//!
//! Pointer and touch events arrive as start/move/end in field-local
//! coordinates. A gesture becomes one [`Segment`] from the first point to the
//! latest point, handed out exactly once when the gesture ends.

use glam::Vec2;

use crate::sim::Segment;

/// Convert a client-space pointer position to field-local coordinates
#[inline]
pub fn to_field(client: Vec2, field_origin: Vec2) -> Vec2 {
    client - field_origin
}

/// In-progress swipe gesture
#[derive(Debug, Clone, Default)]
pub struct SwipeCapture {
    active: Option<Segment>,
}

impl SwipeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down. Restarts any gesture already in progress.
    pub fn begin(&mut self, pos: Vec2) {
        self.active = Some(Segment::new(pos, pos));
    }

    /// Pointer moved; ignored unless a gesture is active
    pub fn extend(&mut self, pos: Vec2) {
        if let Some(segment) = self.active.as_mut() {
            segment.end = pos;
        }
    }

    /// Pointer up. Yields the completed segment once and clears the gesture.
    pub fn finish(&mut self) -> Option<Segment> {
        self.active.take()
    }

    /// The segment drawn so far, for the live preview
    pub fn preview(&self) -> Option<&Segment> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Drop the gesture without producing a segment
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_gesture() {
        let mut swipe = SwipeCapture::new();
        swipe.begin(Vec2::new(10.0, 10.0));
        swipe.extend(Vec2::new(20.0, 15.0));
        swipe.extend(Vec2::new(50.0, 30.0));
        assert_eq!(
            swipe.preview().copied(),
            Some(Segment::new(Vec2::new(10.0, 10.0), Vec2::new(50.0, 30.0)))
        );
        let segment = swipe.finish().unwrap();
        assert_eq!(segment.start, Vec2::new(10.0, 10.0));
        assert_eq!(segment.end, Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_finish_consumes_once() {
        let mut swipe = SwipeCapture::new();
        swipe.begin(Vec2::ZERO);
        assert!(swipe.finish().is_some());
        assert!(swipe.finish().is_none());
        assert!(!swipe.is_active());
    }

    #[test]
    fn test_move_without_begin_is_ignored() {
        let mut swipe = SwipeCapture::new();
        swipe.extend(Vec2::new(5.0, 5.0));
        assert!(swipe.finish().is_none());
    }

    #[test]
    fn test_tap_yields_degenerate_segment() {
        let mut swipe = SwipeCapture::new();
        swipe.begin(Vec2::new(3.0, 4.0));
        let segment = swipe.finish().unwrap();
        assert_eq!(segment.start, segment.end);
    }

    #[test]
    fn test_to_field() {
        assert_eq!(
            to_field(Vec2::new(120.0, 80.0), Vec2::new(100.0, 50.0)),
            Vec2::new(20.0, 30.0)
        );
    }
}
