//! Forward segment drawing

use super::{DrawContext, DrawRule};
use crate::turtle::Turtle;

/// Grow one segment along the heading. The argument overrides the length.
#[derive(Clone, Copy, Debug, Default)]
pub struct Draw;

impl DrawRule for Draw {
    fn draw(&self, turtle: &mut Turtle, ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        let length = arg.unwrap_or(turtle.segment_length);
        draw_segment(turtle, ctx, length);
    }
}

/// Add a segment of `length` ahead of the turtle.
///
/// On success the turtle moves to the resolved end (which may be a snapped
/// intersection) and takes the segment's rotation. On rejection the branch
/// ends and the turtle stays put. Returns whether a segment was added.
pub(crate) fn draw_segment(turtle: &mut Turtle, ctx: &mut DrawContext<'_>, length: f32) -> bool {
    let candidate_end = turtle.ahead(length);
    match ctx.graph.add_segment(
        turtle.last_intersection_id,
        candidate_end,
        turtle.direction,
        turtle.road_type,
    ) {
        Some(id) => {
            let segment = *ctx.graph.segment(id);
            turtle.position = ctx.graph.intersection(segment.end_intersection_id).position;
            turtle.direction = segment.rotation;
            turtle.last_intersection_id = segment.end_intersection_id;
            true
        }
        None => {
            turtle.branch_ended = true;
            false
        }
    }
}
