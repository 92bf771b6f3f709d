//! Heading changes. Positive angles turn counter-clockwise.

use super::{DrawContext, DrawRule};
use crate::turtle::Turtle;

/// `dir + angle`; an argument in degrees replaces the angle for this step.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnLeft;

/// `dir - angle`; an argument in degrees replaces the angle for this step.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnRight;

fn turn_angle(turtle: &Turtle, arg: Option<f32>) -> f32 {
    arg.map(f32::to_radians).unwrap_or(turtle.angle)
}

impl DrawRule for TurnLeft {
    fn draw(&self, turtle: &mut Turtle, _ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        turtle.direction += turn_angle(turtle, arg);
    }
}

impl DrawRule for TurnRight {
    fn draw(&self, turtle: &mut Turtle, _ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        turtle.direction -= turn_angle(turtle, arg);
    }
}
