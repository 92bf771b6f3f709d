//! Axis-aligned rectangle in normalized map space

use crate::core::types::Vec2;

/// Axis-aligned rectangle defined by min and max corners
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Rect {
    /// Inverted rectangle; expanding it by any point yields that point.
    pub const EMPTY: Self = Self {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    /// Create rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing every point, or `EMPTY`
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Self {
        let mut rect = Self::EMPTY;
        for p in points {
            rect.expand(p);
        }
        rect
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if point is inside rectangle (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }

    /// Expand rectangle to include point
    pub fn expand(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let rect = Rect::new(Vec2::ZERO, Vec2::ONE);
        assert_eq!(rect.size(), Vec2::ONE);
        assert!(!rect.is_empty());
    }

    #[test]
    fn test_contains_point() {
        let rect = Rect::new(Vec2::NEG_ONE, Vec2::ONE);
        assert!(rect.contains_point(Vec2::new(0.5, -0.5)));
        assert!(rect.contains_point(Vec2::new(1.0, 1.0)));
        assert!(!rect.contains_point(Vec2::new(1.01, 0.0)));
    }

    #[test]
    fn test_from_points() {
        assert!(Rect::from_points(std::iter::empty()).is_empty());

        let rect = Rect::from_points([Vec2::new(0.5, -0.2), Vec2::new(-0.1, 0.3)]);
        assert_eq!(rect.min, Vec2::new(-0.1, -0.2));
        assert_eq!(rect.max, Vec2::new(0.5, 0.3));
    }
}
