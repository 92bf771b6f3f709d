//! Script interpreter: symbol dispatch, argument parsing, branch stack

use std::collections::BTreeMap;
use std::sync::Arc;

use super::rules::{
    Draw, DrawContext, DrawRule, EndBranch, RandomAngle, RuleKind, ScaleAngle, ScaleLength,
    StartBranch, TurnLeft, TurnRight,
};
use super::Turtle;
use crate::graph::IntersectionGraph;
use crate::terrain::TerrainGrid;

/// Counters from one pass over a script
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Active turtle after the last symbol
    pub turtle: Turtle,
    pub rules_applied: usize,
    /// Symbols suppressed because their branch had ended
    pub rules_skipped: usize,
    pub branches_started: usize,
    pub branches_closed: usize,
    /// Closes with nothing on the stack
    pub unmatched_closes: usize,
    pub max_depth: usize,
    /// Saved turtles left over at the end (unclosed branches)
    pub open_branches: usize,
    pub segments_added: usize,
    /// Branches abandoned by a rejected segment or a land check
    pub dead_ends: usize,
}

/// Symbol table of draw rules
pub struct Interpreter {
    rules: BTreeMap<char, Box<dyn DrawRule>>,
    runs: u32,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter with no rules bound.
    pub fn new() -> Self {
        Self { rules: BTreeMap::new(), runs: 0 }
    }

    /// `F + - [ ] ~ " ;` bound to the standard rules. With terrain, branches
    /// started in water are abandoned.
    pub fn standard(seed: u64, terrain: Option<Arc<TerrainGrid>>) -> Self {
        let start_branch = match terrain {
            Some(terrain) => StartBranch::with_land_check(terrain),
            None => StartBranch::new(),
        };

        Self::new()
            .with_rule('F', Draw)
            .with_rule('+', TurnRight)
            .with_rule('-', TurnLeft)
            .with_rule('[', start_branch)
            .with_rule(']', EndBranch)
            .with_rule('~', RandomAngle::new(seed))
            .with_rule('"', ScaleLength)
            .with_rule(';', ScaleAngle)
    }

    pub fn with_rule(mut self, symbol: char, rule: impl DrawRule + 'static) -> Self {
        self.add_rule(symbol, rule);
        self
    }

    /// Bind or rebind `symbol`.
    pub fn add_rule(&mut self, symbol: char, rule: impl DrawRule + 'static) {
        self.rules.insert(symbol, Box::new(rule));
    }

    pub fn has_rule(&self, symbol: char) -> bool {
        self.rules.contains_key(&symbol)
    }

    /// Number of completed runs; part of every invocation site id.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Replay `script` with `turtle` as the active cursor, growing `graph`.
    pub fn run(&mut self, script: &str, turtle: Turtle, graph: &mut IntersectionGraph) -> RunSummary {
        let symbols: Vec<char> = script.chars().collect();
        let run_index = self.runs;
        self.runs += 1;

        let segments_before = graph.segments().len();
        let mut stack: Vec<Turtle> = Vec::new();
        let mut summary = RunSummary {
            turtle,
            rules_applied: 0,
            rules_skipped: 0,
            branches_started: 0,
            branches_closed: 0,
            unmatched_closes: 0,
            max_depth: 0,
            open_branches: 0,
            segments_added: 0,
            dead_ends: 0,
        };

        let mut i = 0;
        while i < symbols.len() {
            let symbol = symbols[i];
            let site = ((run_index as u64) << 32) | i as u64;
            let (arg, next) = parse_argument(&symbols, i + 1);
            i = next;

            let Some(rule) = self.rules.get(&symbol) else {
                continue;
            };

            let turtle = &mut summary.turtle;
            let kind = rule.kind();
            if turtle.branch_ended && kind == RuleKind::Geometry {
                summary.rules_skipped += 1;
                continue;
            }

            let was_ended = turtle.branch_ended;
            let depth_before = stack.len();
            let mut ctx = DrawContext { graph: &mut *graph, stack: &mut stack, site };
            rule.draw(turtle, &mut ctx, arg);
            summary.rules_applied += 1;

            match kind {
                RuleKind::BranchStart => {
                    summary.branches_started += 1;
                    summary.max_depth = summary.max_depth.max(stack.len());
                }
                RuleKind::BranchEnd => {
                    if stack.len() == depth_before {
                        summary.unmatched_closes += 1;
                    } else {
                        summary.branches_closed += 1;
                    }
                }
                RuleKind::Geometry => {}
            }
            if !was_ended && summary.turtle.branch_ended {
                summary.dead_ends += 1;
            }
        }

        summary.open_branches = stack.len();
        summary.segments_added = graph.segments().len() - segments_before;

        log::debug!(
            "Run {}: {} symbols, {} rules ({} skipped), {} segments, {} dead ends, depth {}",
            run_index,
            symbols.len(),
            summary.rules_applied,
            summary.rules_skipped,
            summary.segments_added,
            summary.dead_ends,
            summary.max_depth
        );
        if summary.open_branches > 0 || summary.unmatched_closes > 0 {
            log::warn!(
                "Run {}: unbalanced branches ({} left open, {} unmatched closes)",
                run_index, summary.open_branches, summary.unmatched_closes
            );
        }

        summary
    }
}

/// Parse an optional `(literal)` starting at `start`.
///
/// Returns the parsed number, if any, and the index of the next symbol. An
/// unterminated literal runs to the end of the script. Malformed literals
/// yield `None` so the rule falls back to its default.
fn parse_argument(symbols: &[char], start: usize) -> (Option<f32>, usize) {
    if symbols.get(start) != Some(&'(') {
        return (None, start);
    }

    let body_start = start + 1;
    let close = symbols[body_start..]
        .iter()
        .position(|&c| c == ')')
        .map(|offset| body_start + offset);
    let body_end = close.unwrap_or(symbols.len());
    let literal: String = symbols[body_start..body_end].iter().collect();
    let next = close.map_or(symbols.len(), |c| c + 1);

    match literal.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => (Some(value), next),
        _ => {
            log::debug!("Ignoring malformed rule argument '({})'", literal);
            (None, next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    use crate::constraint::{BoundsConstraint, ConstraintSet};
    use crate::graph::{IntersectionId, RoadType};
    use crate::math::Rect;
    use crate::turtle::TurtleParams;

    fn setup(direction: f32, segment_length: f32) -> (IntersectionGraph, Turtle) {
        let mut graph = IntersectionGraph::new(ConstraintSet::new());
        let root = graph.add_intersection(Vec2::ZERO);
        let turtle = TurtleParams { direction, segment_length, ..Default::default() }
            .spawn(Vec2::ZERO, root);
        (graph, turtle)
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_parse_argument() {
        assert_eq!(parse_argument(&chars("F+(45)F"), 2), (Some(45.0), 6));
        assert_eq!(parse_argument(&chars("F+F"), 2), (None, 2));
        assert_eq!(parse_argument(&chars("+( -2.5 )"), 1), (Some(-2.5), 9));
        assert_eq!(parse_argument(&chars("+(abc)F"), 1), (None, 6));
        assert_eq!(parse_argument(&chars("+()F"), 1), (None, 3));
        assert_eq!(parse_argument(&chars("+(12"), 1), (Some(12.0), 4));
        assert_eq!(parse_argument(&chars("+"), 1), (None, 1));
    }

    #[test]
    fn test_single_draw_end_to_end() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::new().with_rule('F', Draw);

        let summary = interpreter.run("F", turtle, &mut graph);
        assert_eq!(summary.segments_added, 1);
        assert_eq!(graph.segments().len(), 1);
        assert_eq!(graph.intersections().len(), 2);

        let segment = graph.segments()[0];
        assert_eq!(segment.start_intersection_id, IntersectionId(0));
        assert_eq!(segment.end_intersection_id, IntersectionId(1));
        assert_eq!(segment.rotation, 0.0);
        assert_eq!(graph.intersection(IntersectionId(1)).position, Vec2::new(0.05, 0.0));
    }

    #[test]
    fn test_expanded_axiom_draws_one_segment() {
        let script = crate::grammar::Grammar::new("F", 1).expand();
        assert_eq!(script, "F");

        let (mut graph, turtle) = setup(0.0, 0.05);
        Interpreter::new().with_rule('F', Draw).run(&script, turtle, &mut graph);
        assert_eq!(graph.segments().len(), 1);
        assert_eq!(graph.segments()[0].end_intersection_id, IntersectionId(1));
    }

    #[test]
    fn test_two_draws_chain() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::new().with_rule('F', Draw);

        let summary = interpreter.run("FF", turtle, &mut graph);
        assert_eq!(graph.segments().len(), 2);
        assert_eq!(graph.intersections().len(), 3);
        assert_eq!(summary.turtle.last_intersection_id, IntersectionId(2));
        assert!((summary.turtle.position - Vec2::new(0.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_second_draw_snaps_back_onto_existing_intersection() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::standard(1, None);

        // Turn around: the second end lands on the root
        interpreter.run("F+(180)F", turtle, &mut graph);
        assert_eq!(graph.segments().len(), 2);
        assert_eq!(graph.intersections().len(), 2);
        assert_eq!(graph.segments()[1].end_intersection_id, IntersectionId(0));
        assert_eq!(graph.intersection(IntersectionId(0)).degree(), 2);
    }

    #[test]
    fn test_short_step_reuses_nearby_intersection() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::standard(1, None);

        // Second step of 0.015 ends within snap distance of intersection 1
        interpreter.run("FF(0.015)", turtle, &mut graph);
        assert_eq!(graph.intersections().len(), 2);
        assert_eq!(graph.segments()[1].end_intersection_id, IntersectionId(1));
    }

    #[test]
    fn test_branch_restores_turtle() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::standard(1, None);

        let summary = interpreter.run("F[-(90)FF]F", turtle, &mut graph);
        assert_eq!(summary.branches_started, 1);
        assert_eq!(summary.branches_closed, 1);
        assert_eq!(summary.open_branches, 0);
        assert_eq!(graph.segments().len(), 4);

        // Trunk continues from intersection 1 heading east
        let last = graph.segments()[3];
        assert_eq!(last.start_intersection_id, IntersectionId(1));
        assert!((summary.turtle.position - Vec2::new(0.1, 0.0)).length() < 1e-6);
        assert_eq!(summary.turtle.direction, 0.0);

        // Branch went north
        let branch = graph.segments()[1];
        assert!((branch.rotation - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_balanced_script_leaves_empty_stack() {
        let (mut graph, turtle) = setup(FRAC_PI_2, 0.03);
        let mut interpreter = Interpreter::standard(3, None);
        let script = "F[+F[-F]F][-F[+F[+F]]]F[[F]]";

        let summary = interpreter.run(script, turtle, &mut graph);
        let opens = script.chars().filter(|&c| c == '[').count();
        assert_eq!(summary.branches_started, opens);
        assert_eq!(summary.branches_closed, opens);
        assert_eq!(summary.open_branches, 0);
        assert_eq!(summary.unmatched_closes, 0);
        assert_eq!(summary.max_depth, 3);
    }

    #[test]
    fn test_dead_branch_suppresses_geometry_until_pop() {
        let constraints = ConstraintSet::new()
            .with(BoundsConstraint::new(Rect::new(Vec2::NEG_ONE, Vec2::ONE)));
        let mut graph = IntersectionGraph::new(constraints);
        let root = graph.add_intersection(Vec2::new(0.87, 0.0));
        let turtle = TurtleParams { direction: 0.0, segment_length: 0.05, ..Default::default() }
            .spawn(Vec2::new(0.87, 0.0), root);
        let mut interpreter = Interpreter::standard(1, None);

        // Third step east leaves the map; the nested brackets still balance
        let summary = interpreter.run("[FFFF[+F]F]+(180)F", turtle, &mut graph);
        assert_eq!(summary.dead_ends, 1);
        assert!(summary.rules_skipped >= 3);
        assert_eq!(summary.branches_started, 2);
        assert_eq!(summary.branches_closed, 2);
        assert_eq!(summary.open_branches, 0);
        assert!(!summary.turtle.branch_ended);

        // Two segments east before the edge, then one west from the root
        assert_eq!(graph.segments().len(), 3);
        assert_eq!(graph.segments()[2].start_intersection_id, root);
    }

    #[test]
    fn test_unbalanced_scripts_are_reported() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::standard(1, None);
        let summary = interpreter.run("F]][F", turtle, &mut graph);
        assert_eq!(summary.unmatched_closes, 2);
        assert_eq!(summary.open_branches, 1);
        assert_eq!(graph.segments().len(), 2);
    }

    #[test]
    fn test_malformed_argument_falls_back() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::standard(1, None);
        let summary = interpreter.run("-(left)F", turtle, &mut graph);
        assert_eq!(summary.turtle.direction, TurtleParams::default().angle);
        assert_eq!(graph.segments().len(), 1);
    }

    #[test]
    fn test_empty_argument_falls_back() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::standard(1, None);
        let summary = interpreter.run("-()F", turtle, &mut graph);
        assert_eq!(summary.rules_applied, 2);
        assert_eq!(summary.turtle.direction, TurtleParams::default().angle);
        assert_eq!(graph.segments().len(), 1);
    }

    #[test]
    fn test_unknown_symbols_are_ignored() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::standard(1, None);
        let summary = interpreter.run("XLFBX(3)", turtle, &mut graph);
        assert_eq!(summary.rules_applied, 1);
        assert_eq!(graph.segments().len(), 1);
    }

    #[test]
    fn test_random_angle_reproducible_across_interpreters() {
        let script = "F~F~F~F";
        let (mut g1, t1) = setup(0.0, 0.05);
        let (mut g2, t2) = setup(0.0, 0.05);
        let a = Interpreter::standard(9, None).run(script, t1, &mut g1);
        let b = Interpreter::standard(9, None).run(script, t2, &mut g2);
        assert_eq!(a.turtle.direction, b.turtle.direction);
        assert_eq!(g1.intersections(), g2.intersections());
    }

    #[test]
    fn test_road_type_carried_into_segments() {
        let mut graph = IntersectionGraph::new(ConstraintSet::new());
        let root = graph.add_intersection(Vec2::ZERO);
        let turtle = TurtleParams { road_type: RoadType::Street, ..Default::default() }
            .spawn(Vec2::ZERO, root);
        Interpreter::standard(1, None).run("FF", turtle, &mut graph);
        assert!(graph.segments().iter().all(|s| s.road_type == RoadType::Street));
    }

    #[test]
    fn test_run_counter() {
        let (mut graph, turtle) = setup(0.0, 0.05);
        let mut interpreter = Interpreter::new();
        assert_eq!(interpreter.runs(), 0);
        interpreter.run("", turtle.clone(), &mut graph);
        interpreter.run("F", turtle, &mut graph);
        assert_eq!(interpreter.runs(), 2);
        assert!(!interpreter.has_rule('F'));
    }
}
