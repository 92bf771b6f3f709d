//! Draw rules bound to script symbols

pub mod branch;
pub mod draw;
pub mod population;
pub mod random;
pub mod scale;
pub mod turn;

pub use branch::{EndBranch, StartBranch};
pub use draw::Draw;
pub use population::{SpanMode, SpanPopulation, TurnAwayPopulation, TurnTowardPopulation};
pub use random::RandomAngle;
pub use scale::{ScaleAngle, ScaleLength};
pub use turn::{TurnLeft, TurnRight};

use super::Turtle;
use crate::graph::IntersectionGraph;

/// How the interpreter treats a rule on an abandoned branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    /// Skipped once the turtle's branch has ended
    Geometry,
    /// Always runs, so the stack stays in step with `[`/`]`
    BranchStart,
    BranchEnd,
}

/// Shared state a rule may touch besides the active turtle.
pub struct DrawContext<'a> {
    pub graph: &'a mut IntersectionGraph,
    pub stack: &'a mut Vec<Turtle>,
    /// Unique per symbol occurrence per run; seeds per-site randomness
    pub site: u64,
}

/// Behaviour bound to a script symbol.
pub trait DrawRule: Send + Sync {
    /// Apply to the active turtle. `arg` is the parsed `(literal)` following
    /// the symbol, if any.
    fn draw(&self, turtle: &mut Turtle, ctx: &mut DrawContext<'_>, arg: Option<f32>);

    fn kind(&self) -> RuleKind {
        RuleKind::Geometry
    }
}
