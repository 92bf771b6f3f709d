//! Population-aware steering and spanning

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::draw::draw_segment;
use super::{DrawContext, DrawRule};
use crate::math::heading_vector;
use crate::terrain::TerrainGrid;
use crate::turtle::Turtle;

/// Density one segment length ahead along `direction`.
fn density_ahead(terrain: &TerrainGrid, turtle: &Turtle, direction: f32, distance: f32) -> f32 {
    terrain.sample_population_density(turtle.position + heading_vector(direction) * distance)
}

/// Heading within `arc` of the current one whose sample wins under `better`.
///
/// The current heading is sampled first and only replaced by a strictly
/// better candidate, so flat density leaves the heading unchanged.
fn steer(
    terrain: &TerrainGrid,
    turtle: &Turtle,
    arc: f32,
    samples: u32,
    better: impl Fn(f32, f32) -> bool,
) -> f32 {
    let mut best_dir = turtle.direction;
    let mut best = density_ahead(terrain, turtle, best_dir, turtle.segment_length);
    if samples < 2 {
        return best_dir;
    }

    let first = turtle.direction - arc * 0.5;
    let step = arc / (samples - 1) as f32;
    for k in 0..samples {
        let dir = first + step * k as f32;
        let d = density_ahead(terrain, turtle, dir, turtle.segment_length);
        if better(d, best) {
            best = d;
            best_dir = dir;
        }
    }
    best_dir
}

/// Turn toward the densest heading within an arc. Argument: arc in degrees.
#[derive(Clone)]
pub struct TurnTowardPopulation {
    terrain: Arc<TerrainGrid>,
    arc: f32,
    samples: u32,
}

impl TurnTowardPopulation {
    pub fn new(terrain: Arc<TerrainGrid>, arc: f32, samples: u32) -> Self {
        Self { terrain, arc, samples }
    }
}

impl DrawRule for TurnTowardPopulation {
    fn draw(&self, turtle: &mut Turtle, _ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        let arc = arg.map(f32::to_radians).unwrap_or(self.arc);
        turtle.direction = steer(&self.terrain, turtle, arc, self.samples, |d, best| d > best);
    }
}

/// Turn toward the sparsest heading within an arc. Argument: arc in degrees.
#[derive(Clone)]
pub struct TurnAwayPopulation {
    terrain: Arc<TerrainGrid>,
    arc: f32,
    samples: u32,
}

impl TurnAwayPopulation {
    pub fn new(terrain: Arc<TerrainGrid>, arc: f32, samples: u32) -> Self {
        Self { terrain, arc, samples }
    }
}

impl DrawRule for TurnAwayPopulation {
    fn draw(&self, turtle: &mut Turtle, _ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        let arc = arg.map(f32::to_radians).unwrap_or(self.arc);
        turtle.direction = steer(&self.terrain, turtle, arc, self.samples, |d, best| d < best);
    }
}

/// Which side of the threshold keeps a span growing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanMode {
    /// Extend while density ahead is above the threshold
    #[default]
    Dense,
    /// Extend while density ahead is below the threshold
    Sparse,
}

/// Draw a segment stretched in `segment_length` steps across a population
/// band. Argument: threshold.
#[derive(Clone)]
pub struct SpanPopulation {
    terrain: Arc<TerrainGrid>,
    threshold: f32,
    mode: SpanMode,
    max_steps: u32,
}

impl SpanPopulation {
    pub fn new(terrain: Arc<TerrainGrid>, threshold: f32, mode: SpanMode, max_steps: u32) -> Self {
        Self { terrain, threshold, mode, max_steps: max_steps.max(1) }
    }

    /// Length the span would reach from the turtle's current state.
    pub fn span_length(&self, turtle: &Turtle, threshold: f32) -> f32 {
        let step = turtle.segment_length;
        let mut length = step;
        for _ in 1..self.max_steps {
            let d = density_ahead(&self.terrain, turtle, turtle.direction, length + step);
            let keep = match self.mode {
                SpanMode::Dense => d > threshold,
                SpanMode::Sparse => d < threshold,
            };
            if !keep {
                break;
            }
            length += step;
        }
        length
    }
}

impl DrawRule for SpanPopulation {
    fn draw(&self, turtle: &mut Turtle, ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        let length = self.span_length(turtle, arg.unwrap_or(self.threshold));
        draw_segment(turtle, ctx, length);
    }
}

/// Defaults shared by the population rules.
pub const DEFAULT_STEER_ARC: f32 = FRAC_PI_2;
pub const DEFAULT_STEER_SAMPLES: u32 = 7;
