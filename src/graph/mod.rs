//! Intersection graph: segment/intersection arenas with spatial-merge insertion.
//!
//! Both arenas are append-only and indexed by id. New segment ends snap onto
//! the closest existing intersection within `snap_distance`, so convergent
//! branches join instead of stacking near-duplicate nodes.

pub mod road_grid;
pub mod types;

pub use road_grid::RoadGrid;
pub use types::{Intersection, IntersectionId, RoadType, Segment, SegmentId};

use std::sync::Arc;

use glam::Vec2;

use crate::constraint::{CandidateSegment, ConstraintSet};
use crate::math::bearing;
use crate::terrain::TerrainGrid;

/// Merge radius in normalized map units
pub const DEFAULT_SNAP_DISTANCE: f32 = 0.02;

pub struct IntersectionGraph {
    intersections: Vec<Intersection>,
    segments: Vec<Segment>,
    constraints: ConstraintSet,
    road_grid: Option<RoadGrid>,
    snap_distance: f32,
}

impl IntersectionGraph {
    pub fn new(constraints: ConstraintSet) -> Self {
        Self {
            intersections: Vec::new(),
            segments: Vec::new(),
            constraints,
            road_grid: None,
            snap_distance: DEFAULT_SNAP_DISTANCE,
        }
    }

    /// Bucket intersections by terrain cell as they are added.
    ///
    /// Must be attached before the first intersection is added.
    pub fn with_road_grid(mut self, terrain: Arc<TerrainGrid>) -> Self {
        assert!(self.intersections.is_empty(), "road grid attached to a non-empty graph");
        self.road_grid = Some(RoadGrid::new(terrain));
        self
    }

    pub fn with_snap_distance(mut self, snap_distance: f32) -> Self {
        self.snap_distance = snap_distance;
        self
    }

    pub fn snap_distance(&self) -> f32 {
        self.snap_distance
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn road_grid(&self) -> Option<&RoadGrid> {
        self.road_grid.as_ref()
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn intersection(&self, id: IntersectionId) -> &Intersection {
        &self.intersections[id.index()]
    }

    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    /// Start and end positions of a segment.
    pub fn segment_endpoints(&self, id: SegmentId) -> (Vec2, Vec2) {
        let segment = self.segment(id);
        (
            self.intersection(segment.start_intersection_id).position,
            self.intersection(segment.end_intersection_id).position,
        )
    }

    pub fn segment_length(&self, id: SegmentId) -> f32 {
        let (a, b) = self.segment_endpoints(id);
        a.distance(b)
    }

    /// Intersections bucketed in terrain cell `(ix, iy)`; empty without a road grid.
    pub fn intersections_in_cell(&self, ix: u32, iy: u32) -> &[IntersectionId] {
        match &self.road_grid {
            Some(grid) => grid.intersections_in_cell(ix, iy),
            None => &[],
        }
    }

    /// Append a new intersection.
    pub fn add_intersection(&mut self, position: Vec2) -> IntersectionId {
        let id = IntersectionId(self.intersections.len() as u32);
        self.intersections.push(Intersection::new(id, position));
        if let Some(grid) = &mut self.road_grid {
            grid.insert(id, position);
        }
        id
    }

    /// Closest intersection within `radius` of `pos`, ties going to the lowest id.
    pub fn nearest_within(&self, pos: Vec2, radius: f32) -> Option<IntersectionId> {
        match &self.road_grid {
            Some(grid) if grid.covers_radius(radius) => {
                let mut best: Option<(f32, IntersectionId)> = None;
                for id in grid.neighbourhood(pos) {
                    let d = self.intersection(id).position.distance(pos);
                    if d > radius {
                        continue;
                    }
                    let closer = match best {
                        None => true,
                        Some((best_d, best_id)) => d < best_d || (d == best_d && id < best_id),
                    };
                    if closer {
                        best = Some((d, id));
                    }
                }
                best.map(|(_, id)| id)
            }
            _ => self.nearest_within_linear(pos, radius),
        }
    }

    /// Reference scan over every intersection in creation order.
    pub fn nearest_within_linear(&self, pos: Vec2, radius: f32) -> Option<IntersectionId> {
        let mut best: Option<(f32, IntersectionId)> = None;
        for node in &self.intersections {
            let d = node.position.distance(pos);
            if d <= radius && best.is_none_or(|(best_d, _)| d < best_d) {
                best = Some((d, node.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Try to grow a segment from `start` toward `candidate_end`.
    ///
    /// Returns `None` (creating nothing) when a constraint rejects the
    /// candidate. Otherwise the end snaps onto the closest intersection within
    /// `snap_distance`, whose bearing replaces `rotation`, or a new
    /// intersection is created at `candidate_end`.
    pub fn add_segment(
        &mut self,
        start: IntersectionId,
        candidate_end: Vec2,
        rotation: f32,
        road_type: RoadType,
    ) -> Option<SegmentId> {
        assert!(
            start.index() < self.intersections.len(),
            "segment start {:?} is not an existing intersection",
            start
        );
        let start_pos = self.intersection(start).position;

        let candidate = CandidateSegment {
            start_id: start,
            start_pos,
            end_pos: candidate_end,
            rotation,
            road_type,
        };
        let end_pos = self.constraints.resolve(&candidate)?;

        let (end, rotation) = match self.nearest_within(end_pos, self.snap_distance) {
            Some(matched) => {
                let matched_pos = self.intersection(matched).position;
                // Snapping onto the start itself has no defined bearing
                let rotation = if matched_pos == start_pos {
                    rotation
                } else {
                    bearing(start_pos, matched_pos)
                };
                (matched, rotation)
            }
            None => (self.add_intersection(end_pos), rotation),
        };

        let id = SegmentId(self.segments.len() as u32);
        self.segments.push(Segment {
            id,
            start_intersection_id: start,
            end_intersection_id: end,
            road_type,
            rotation,
        });
        self.intersections[start.index()].out_segment_ids.insert(id);
        self.intersections[end.index()].in_segment_ids.insert(id);

        Some(id)
    }
}
