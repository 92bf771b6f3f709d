//! Placement constraints consulted before every segment insertion

pub mod bounds;
pub mod water;

pub use bounds::BoundsConstraint;
pub use water::WaterConstraint;

use glam::Vec2;

use crate::graph::{IntersectionId, RoadType};

/// A proposed segment, before snapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateSegment {
    pub start_id: IntersectionId,
    pub start_pos: Vec2,
    pub end_pos: Vec2,
    pub rotation: f32,
    pub road_type: RoadType,
}

impl CandidateSegment {
    pub fn length(&self) -> f32 {
        self.start_pos.distance(self.end_pos)
    }

    /// Same candidate ending at `end_pos`.
    pub fn with_end(&self, end_pos: Vec2) -> Self {
        Self { end_pos, ..*self }
    }

    /// Point at fraction `t` from start to end.
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start_pos.lerp(self.end_pos, t)
    }
}

/// Validator for candidate segments.
pub trait Constraint: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// True if the candidate may be placed as is.
    fn check_constraint(&self, candidate: &CandidateSegment) -> bool;

    /// Proposed replacement end position for a failing candidate.
    fn attempt_adjustment(&self, _candidate: &CandidateSegment) -> Option<Vec2> {
        None
    }
}

/// Ordered collection of constraints shared by every generation phase.
#[derive(Default)]
pub struct ConstraintSet {
    constraints: Vec<Box<dyn Constraint>>,
    allow_adjustment: bool,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, constraint: impl Constraint + 'static) -> Self {
        self.push(constraint);
        self
    }

    pub fn push(&mut self, constraint: impl Constraint + 'static) {
        self.constraints.push(Box::new(constraint));
    }

    /// When set, a failing candidate may be rescued by the first failing
    /// constraint's adjustment, provided the adjusted candidate passes all.
    pub fn set_allow_adjustment(&mut self, allow: bool) {
        self.allow_adjustment = allow;
    }

    pub fn allow_adjustment(&self) -> bool {
        self.allow_adjustment
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.constraints.iter().map(|c| c.name()).collect()
    }

    /// True iff every constraint accepts the candidate.
    pub fn check(&self, candidate: &CandidateSegment) -> bool {
        self.constraints.iter().all(|c| c.check_constraint(candidate))
    }

    /// End position to build with, or `None` if the candidate is rejected.
    pub fn resolve(&self, candidate: &CandidateSegment) -> Option<Vec2> {
        let Some(failing) = self.constraints.iter().find(|c| !c.check_constraint(candidate)) else {
            return Some(candidate.end_pos);
        };

        if !self.allow_adjustment {
            log::trace!("Candidate from {:?} rejected by {}", candidate.start_id, failing.name());
            return None;
        }

        let adjusted = candidate.with_end(failing.attempt_adjustment(candidate)?);
        if self.check(&adjusted) {
            log::trace!("Candidate from {:?} adjusted by {}", candidate.start_id, failing.name());
            Some(adjusted.end_pos)
        } else {
            None
        }
    }
}
