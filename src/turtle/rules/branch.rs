//! Branch push/pop

use std::sync::Arc;

use super::{DrawContext, DrawRule, RuleKind};
use crate::terrain::TerrainGrid;
use crate::turtle::Turtle;

/// Save a copy of the turtle. With terrain attached, a branch started in
/// water is abandoned until its matching pop.
#[derive(Clone, Default)]
pub struct StartBranch {
    terrain: Option<Arc<TerrainGrid>>,
}

impl StartBranch {
    pub fn new() -> Self {
        Self { terrain: None }
    }

    pub fn with_land_check(terrain: Arc<TerrainGrid>) -> Self {
        Self { terrain: Some(terrain) }
    }
}

impl DrawRule for StartBranch {
    fn draw(&self, turtle: &mut Turtle, ctx: &mut DrawContext<'_>, _arg: Option<f32>) {
        ctx.stack.push(turtle.clone());
        if let Some(terrain) = &self.terrain {
            if !terrain.position_on_land(turtle.position) {
                turtle.branch_ended = true;
            }
        }
    }

    fn kind(&self) -> RuleKind {
        RuleKind::BranchStart
    }
}

/// Restore the most recently saved turtle, discarding the branch's changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndBranch;

impl DrawRule for EndBranch {
    fn draw(&self, turtle: &mut Turtle, ctx: &mut DrawContext<'_>, _arg: Option<f32>) {
        match ctx.stack.pop() {
            Some(saved) => *turtle = saved,
            None => log::warn!("Unmatched branch close at site {:#x}; ignored", ctx.site),
        }
    }

    fn kind(&self) -> RuleKind {
        RuleKind::BranchEnd
    }
}
