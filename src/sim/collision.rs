//! Axis-aligned bounding-box collision test
//!
//! Every simulated entity occupies a `Rect`; overlap is the only geometric
//! query the game needs.

use glam::Vec2;

/// An axis-aligned box, top-left anchored (canvas coordinates, y grows down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        debug_assert!(w > 0.0 && h > 0.0, "degenerate rect {w}x{h}");
        Self { x, y, w, h }
    }

    /// Center point of the box
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
}

/// Strict overlap test: touching edges do not count as a hit
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}
