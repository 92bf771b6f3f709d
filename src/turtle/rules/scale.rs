//! Tapering of segment length and turn angle

use super::{DrawContext, DrawRule};
use crate::turtle::Turtle;

/// `segment_length *= length_scale` (argument replaces the factor).
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaleLength;

/// `angle *= angle_scale` (argument replaces the factor).
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaleAngle;

impl DrawRule for ScaleLength {
    fn draw(&self, turtle: &mut Turtle, _ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        turtle.segment_length *= arg.unwrap_or(turtle.length_scale);
    }
}

impl DrawRule for ScaleAngle {
    fn draw(&self, turtle: &mut Turtle, _ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        turtle.angle *= arg.unwrap_or(turtle.angle_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintSet;
    use crate::graph::IntersectionGraph;

    #[test]
    fn test_scaling() {
        let mut graph = IntersectionGraph::new(ConstraintSet::new());
        let mut stack = Vec::new();
        let mut ctx = DrawContext { graph: &mut graph, stack: &mut stack, site: 0 };
        let mut turtle = Turtle {
            segment_length: 0.1,
            length_scale: 0.5,
            angle: 1.0,
            angle_scale: 0.25,
            ..Default::default()
        };

        ScaleLength.draw(&mut turtle, &mut ctx, None);
        ScaleAngle.draw(&mut turtle, &mut ctx, None);
        assert!((turtle.segment_length - 0.05).abs() < 1e-6);
        assert!((turtle.angle - 0.25).abs() < 1e-6);

        ScaleLength.draw(&mut turtle, &mut ctx, Some(2.0));
        assert!((turtle.segment_length - 0.1).abs() < 1e-6);
    }
}
