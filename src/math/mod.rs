//! Mathematical utilities

pub mod rect;

pub use rect::Rect;

use glam::Vec2;

/// Unit vector for a heading in radians (counter-clockwise from +X).
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Heading in radians of the vector from `from` to `to`.
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
