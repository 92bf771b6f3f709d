//! Keeps segment ends inside the terrain rectangle.
//!
//! Terrain queries are only defined inside the grid; this constraint stops a
//! branch at the map edge before anything downstream samples outside it.

use glam::Vec2;

use super::{CandidateSegment, Constraint};
use crate::math::Rect;
use crate::terrain::TerrainGrid;

pub struct BoundsConstraint {
    bounds: Rect,
}

impl BoundsConstraint {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn for_terrain(terrain: &TerrainGrid) -> Self {
        Self::new(terrain.bounds())
    }
}

impl Constraint for BoundsConstraint {
    fn name(&self) -> &str {
        "bounds"
    }

    fn check_constraint(&self, candidate: &CandidateSegment) -> bool {
        self.bounds.contains_point(candidate.end_pos)
    }

    /// Clip the segment where it leaves the rectangle.
    fn attempt_adjustment(&self, candidate: &CandidateSegment) -> Option<Vec2> {
        if !self.bounds.contains_point(candidate.start_pos) {
            return None;
        }
        let d = candidate.end_pos - candidate.start_pos;
        let mut t = 1.0_f32;
        for axis in 0..2 {
            if d[axis] > 0.0 {
                t = t.min((self.bounds.max[axis] - candidate.start_pos[axis]) / d[axis]);
            } else if d[axis] < 0.0 {
                t = t.min((self.bounds.min[axis] - candidate.start_pos[axis]) / d[axis]);
            }
        }
        (t > 0.0).then(|| candidate.point_at(t).clamp(self.bounds.min, self.bounds.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{IntersectionId, RoadType};

    fn candidate(start: Vec2, end: Vec2) -> CandidateSegment {
        CandidateSegment {
            start_id: IntersectionId(0),
            start_pos: start,
            end_pos: end,
            rotation: 0.0,
            road_type: RoadType::Highway,
        }
    }

    #[test]
    fn test_inside_and_outside() {
        let c = BoundsConstraint::new(Rect::new(Vec2::NEG_ONE, Vec2::ONE));
        assert!(c.check_constraint(&candidate(Vec2::ZERO, Vec2::new(0.99, -0.5))));
        assert!(c.check_constraint(&candidate(Vec2::ZERO, Vec2::ONE)));
        assert!(!c.check_constraint(&candidate(Vec2::ZERO, Vec2::new(1.01, 0.0))));
    }

    #[test]
    fn test_clip_adjustment() {
        let c = BoundsConstraint::new(Rect::new(Vec2::NEG_ONE, Vec2::ONE));
        let adjusted = c
            .attempt_adjustment(&candidate(Vec2::new(0.5, 0.0), Vec2::new(1.5, 0.5)))
            .unwrap();
        assert!((adjusted - Vec2::new(1.0, 0.25)).length() < 1e-6);

        // Start already outside: nothing to salvage
        assert!(c.attempt_adjustment(&candidate(Vec2::new(2.0, 0.0), Vec2::new(3.0, 0.0))).is_none());
    }
}
