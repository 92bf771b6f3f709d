//! Summary statistics over a generated network

use std::collections::HashSet;

use crate::graph::{IntersectionGraph, RoadType};
use crate::math::Rect;

/// Counts and extents of a generated network
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkStats {
    pub intersections: usize,
    pub segments: usize,
    pub highways: usize,
    pub roads: usize,
    pub streets: usize,
    /// Sum of segment lengths in normalized units
    pub total_length: f32,
    /// Sum of length times `RoadType::nominal_width`
    pub paved_area: f32,
    /// Segments joining an intersection pair an earlier segment already joins,
    /// in either direction. The graph keeps them; renderers may skip them.
    pub duplicate_segments: usize,
    /// Intersections touched by exactly one segment
    pub dead_ends: usize,
    /// Bounding rectangle of all intersections; `Rect::EMPTY` when there are none
    pub bounds: Rect,
}

impl NetworkStats {
    pub fn collect(graph: &IntersectionGraph) -> Self {
        let mut stats = Self {
            intersections: graph.intersections().len(),
            segments: graph.segments().len(),
            highways: 0,
            roads: 0,
            streets: 0,
            total_length: 0.0,
            paved_area: 0.0,
            duplicate_segments: 0,
            dead_ends: 0,
            bounds: Rect::from_points(graph.intersections().iter().map(|i| i.position)),
        };

        let mut joined = HashSet::new();
        for segment in graph.segments() {
            match segment.road_type {
                RoadType::Highway => stats.highways += 1,
                RoadType::Road => stats.roads += 1,
                RoadType::Street => stats.streets += 1,
            }
            let length = graph.segment_length(segment.id);
            stats.total_length += length;
            stats.paved_area += length * segment.road_type.nominal_width();

            let (a, b) = (segment.start_intersection_id, segment.end_intersection_id);
            if !joined.insert((a.min(b), a.max(b))) {
                stats.duplicate_segments += 1;
            }
        }
        stats.dead_ends = graph.intersections().iter().filter(|i| i.degree() == 1).count();

        stats
    }

    pub fn count(&self, road_type: RoadType) -> usize {
        match road_type {
            RoadType::Highway => self.highways,
            RoadType::Road => self.roads,
            RoadType::Street => self.streets,
        }
    }
}
