//! Turtle interpretation of generation scripts
//!
//! A turtle is a cursor with a heading and drawing parameters. The
//! [`Interpreter`] walks a script symbol by symbol and hands the active turtle
//! to the draw rule bound to each symbol.

pub mod interpreter;
pub mod rules;

pub use interpreter::{Interpreter, RunSummary};
pub use rules::{DrawContext, DrawRule, RuleKind};

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::graph::{IntersectionId, RoadType};

/// Cursor state. Cloning yields an independent copy, which is what a branch saves.
#[derive(Clone, Debug, PartialEq)]
pub struct Turtle {
    pub position: Vec2,
    /// Heading in radians, counter-clockwise from +X
    pub direction: f32,
    pub road_type: RoadType,
    pub segment_length: f32,
    pub length_scale: f32,
    /// Default turn in radians
    pub angle: f32,
    pub angle_scale: f32,
    /// Intersection the next segment starts from
    pub last_intersection_id: IntersectionId,
    /// Set once a segment is rejected; geometry rules become no-ops
    pub branch_ended: bool,
}

impl Default for Turtle {
    fn default() -> Self {
        TurtleParams::default().spawn(Vec2::ZERO, IntersectionId(0))
    }
}

impl Turtle {
    /// Unit vector along the current heading.
    pub fn heading(&self) -> Vec2 {
        crate::math::heading_vector(self.direction)
    }

    /// Point `distance` ahead along the current heading.
    pub fn ahead(&self, distance: f32) -> Vec2 {
        self.position + self.heading() * distance
    }
}

/// Starting parameters for freshly spawned turtles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleParams {
    pub direction: f32,
    pub road_type: RoadType,
    pub segment_length: f32,
    pub length_scale: f32,
    pub angle: f32,
    pub angle_scale: f32,
}

impl Default for TurtleParams {
    fn default() -> Self {
        Self {
            direction: FRAC_PI_2,
            road_type: RoadType::Highway,
            segment_length: 0.05,
            length_scale: 0.9,
            angle: FRAC_PI_8,
            angle_scale: 0.9,
        }
    }
}

impl TurtleParams {
    /// New live turtle standing on `intersection` at `position`.
    pub fn spawn(&self, position: Vec2, intersection: IntersectionId) -> Turtle {
        Turtle {
            position,
            direction: self.direction,
            road_type: self.road_type,
            segment_length: self.segment_length,
            length_scale: self.length_scale,
            angle: self.angle,
            angle_scale: self.angle_scale,
            last_intersection_id: intersection,
            branch_ended: false,
        }
    }
}
