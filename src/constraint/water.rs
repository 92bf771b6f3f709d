//! Forbids roads ending in water.

use std::sync::Arc;

use glam::Vec2;

use super::{CandidateSegment, Constraint};
use crate::terrain::TerrainGrid;

pub struct WaterConstraint {
    terrain: Arc<TerrainGrid>,
    /// Samples taken along the segment when looking for a shorter end on land.
    adjust_steps: u32,
    /// Shortest fraction of the original length an adjustment may keep.
    min_fraction: f32,
}

impl WaterConstraint {
    pub fn new(terrain: Arc<TerrainGrid>) -> Self {
        Self {
            terrain,
            adjust_steps: 8,
            min_fraction: 0.5,
        }
    }

    pub fn with_adjustment(mut self, adjust_steps: u32, min_fraction: f32) -> Self {
        self.adjust_steps = adjust_steps.max(1);
        self.min_fraction = min_fraction;
        self
    }
}

impl Constraint for WaterConstraint {
    fn name(&self) -> &str {
        "water"
    }

    fn check_constraint(&self, candidate: &CandidateSegment) -> bool {
        self.terrain.position_on_land(candidate.end_pos)
    }

    /// Pull the end back toward the start until it lands on solid ground.
    fn attempt_adjustment(&self, candidate: &CandidateSegment) -> Option<Vec2> {
        (1..self.adjust_steps)
            .rev()
            .map(|k| k as f32 / self.adjust_steps as f32)
            .take_while(|&t| t >= self.min_fraction)
            .map(|t| candidate.point_at(t))
            .find(|&p| self.terrain.position_on_land(p))
    }
}
