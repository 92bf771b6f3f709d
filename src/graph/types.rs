//! Arena records for the road graph

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Index into the intersection arena. Ids are assigned in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntersectionId(pub u32);

impl IntersectionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into the segment arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u32);

impl SegmentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Road classes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadType {
    #[default]
    Highway,
    Road,
    Street,
}

impl RoadType {
    pub const ALL: [RoadType; 3] = [RoadType::Highway, RoadType::Road, RoadType::Street];

    /// Drawn width in normalized map units.
    pub fn nominal_width(&self) -> f32 {
        match self {
            RoadType::Highway => 0.01,
            RoadType::Road => 0.005,
            RoadType::Street => 0.0025,
        }
    }
}

/// Graph node. Adjacency is kept as ordered id sets.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    pub id: IntersectionId,
    pub position: Vec2,
    pub in_segment_ids: BTreeSet<SegmentId>,
    pub out_segment_ids: BTreeSet<SegmentId>,
}

impl Intersection {
    pub fn new(id: IntersectionId, position: Vec2) -> Self {
        Self {
            id,
            position,
            in_segment_ids: BTreeSet::new(),
            out_segment_ids: BTreeSet::new(),
        }
    }

    /// Number of distinct incident segments.
    pub fn degree(&self) -> usize {
        self.in_segment_ids.union(&self.out_segment_ids).count()
    }
}

/// Graph edge. Geometry is resolved through the intersection arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub start_intersection_id: IntersectionId,
    pub end_intersection_id: IntersectionId,
    pub road_type: RoadType,
    /// Heading in radians, counter-clockwise from +X.
    pub rotation: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_index() {
        assert_eq!(IntersectionId(7).index(), 7);
        assert_eq!(SegmentId(3).index(), 3);
        assert!(IntersectionId(1) < IntersectionId(2));
    }

    #[test]
    fn test_road_widths_ordered() {
        assert!(RoadType::Highway.nominal_width() > RoadType::Road.nominal_width());
        assert!(RoadType::Road.nominal_width() > RoadType::Street.nominal_width());
    }

    #[test]
    fn test_degree_counts_self_loop_once() {
        let mut node = Intersection::new(IntersectionId(0), Vec2::ZERO);
        node.in_segment_ids.insert(SegmentId(0));
        node.out_segment_ids.insert(SegmentId(0));
        node.out_segment_ids.insert(SegmentId(1));
        assert_eq!(node.degree(), 2);
    }
}
