//! Two-phase road network generation.
//!
//! Phase 1 grows arterial highways from a single root intersection. Phase 2
//! seeds street grids at evenly spaced arterial intersections. Both phases
//! share one intersection graph, so streets merge into the highways they
//! grow from, and one constraint set (map bounds, then water).

pub mod config;
pub mod stats;

pub use config::{GrammarConfig, PopulationRuleParams, RoadNetworkConfig};
pub use stats::NetworkStats;

use std::sync::Arc;
use std::time::Instant;

use crate::constraint::{BoundsConstraint, ConstraintSet, WaterConstraint};
use crate::core::Result;
use crate::grammar::Grammar;
use crate::graph::{Intersection, IntersectionGraph, IntersectionId, Segment};
use crate::terrain::TerrainGrid;
use crate::turtle::rules::{RandomAngle, SpanPopulation, TurnAwayPopulation, TurnTowardPopulation};
use crate::turtle::{Interpreter, RunSummary};

/// A generated network together with the terrain it was grown on
pub struct RoadNetwork {
    config: RoadNetworkConfig,
    terrain: Arc<TerrainGrid>,
    graph: IntersectionGraph,
    highway_segment_count: usize,
    neighborhood_origins: Vec<IntersectionId>,
}

impl RoadNetwork {
    /// Run both phases from scratch.
    ///
    /// Fails only on an invalid config or a script exceeding
    /// `max_script_len`; rejected segments just end their branch.
    pub fn generate(config: &RoadNetworkConfig, terrain: Arc<TerrainGrid>) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let mut constraints = ConstraintSet::new()
            .with(BoundsConstraint::for_terrain(&terrain))
            .with(
                WaterConstraint::new(Arc::clone(&terrain))
                    .with_adjustment(config.water_adjust_steps, config.water_min_fraction),
            );
        constraints.set_allow_adjustment(config.allow_adjustment);

        let graph = IntersectionGraph::new(constraints)
            .with_road_grid(Arc::clone(&terrain))
            .with_snap_distance(config.snap_distance);

        let mut network = Self {
            config: config.clone(),
            terrain,
            graph,
            highway_segment_count: 0,
            neighborhood_origins: Vec::new(),
        };
        let mut interpreter = network.interpreter();

        network.grow_highways(&mut interpreter)?;
        network.grow_neighborhoods(&mut interpreter)?;

        log::info!(
            "Generated {} segments and {} intersections in {:.1}ms",
            network.graph.segments().len(),
            network.graph.intersections().len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(network)
    }

    /// Standard symbols with the configured `~` range, plus the
    /// population-aware `P`, `p` and `S`.
    fn interpreter(&self) -> Interpreter {
        let population = &self.config.population_rules;
        let terrain = &self.terrain;

        Interpreter::standard(self.config.road_seed, Some(Arc::clone(terrain)))
            .with_rule(
                '~',
                RandomAngle::new(self.config.road_seed).with_max_offset(self.config.random_angle_max),
            )
            .with_rule(
                'P',
                TurnTowardPopulation::new(Arc::clone(terrain), population.steer_arc, population.steer_samples),
            )
            .with_rule(
                'p',
                TurnAwayPopulation::new(Arc::clone(terrain), population.steer_arc, population.steer_samples),
            )
            .with_rule(
                'S',
                SpanPopulation::new(
                    Arc::clone(terrain),
                    population.span_threshold,
                    population.span_mode,
                    population.span_max_steps,
                ),
            )
    }

    fn expand(grammar: &GrammarConfig, max_len: usize) -> Result<String> {
        Grammar::from_replacements(grammar.axiom.clone(), &grammar.rules, grammar.iterations)
            .expand_bounded(max_len)
    }

    fn grow_highways(&mut self, interpreter: &mut Interpreter) -> Result<()> {
        let script = Self::expand(&self.config.highway, self.config.max_script_len)?;

        let root = self.graph.add_intersection(self.config.start_position);
        let turtle = self.config.highway_turtle.spawn(self.config.start_position, root);
        let summary = interpreter.run(&script, turtle, &mut self.graph);
        self.highway_segment_count = self.graph.segments().len();

        log_phase("Highways", script.len(), &summary);
        Ok(())
    }

    fn grow_neighborhoods(&mut self, interpreter: &mut Interpreter) -> Result<()> {
        if self.config.neighborhood_count == 0 {
            return Ok(());
        }
        let script = Self::expand(&self.config.streets, self.config.max_script_len)?;

        self.neighborhood_origins = evenly_spaced(
            self.graph.intersections().len(),
            self.config.neighborhood_count as usize,
        )
        .into_iter()
        .map(|i| IntersectionId(i as u32))
        .collect();

        for &origin in &self.neighborhood_origins {
            let node = self.graph.intersection(origin);
            let inbound = node
                .in_segment_ids
                .first()
                .map_or(0.0, |&id| self.graph.segment(id).rotation);

            let mut turtle = self.config.street_turtle.spawn(node.position, origin);
            turtle.direction = inbound + self.config.street_heading_offset;

            let summary = interpreter.run(&script, turtle, &mut self.graph);
            log::debug!(
                "Neighbourhood at {:?}: {} segments, {} dead ends",
                origin, summary.segments_added, summary.dead_ends
            );
        }

        log::info!(
            "Streets: {} neighbourhoods added {} segments",
            self.neighborhood_origins.len(),
            self.graph.segments().len() - self.highway_segment_count
        );
        Ok(())
    }

    pub fn config(&self) -> &RoadNetworkConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Arc<TerrainGrid> {
        &self.terrain
    }

    pub fn graph(&self) -> &IntersectionGraph {
        &self.graph
    }

    pub fn segments(&self) -> &[Segment] {
        self.graph.segments()
    }

    pub fn intersections(&self) -> &[Intersection] {
        self.graph.intersections()
    }

    /// Segments grown in phase 1; every later segment is a street.
    pub fn highway_segments(&self) -> &[Segment] {
        &self.graph.segments()[..self.highway_segment_count]
    }

    pub fn street_segments(&self) -> &[Segment] {
        &self.graph.segments()[self.highway_segment_count..]
    }

    /// Intersections each street grid was grown from, in growth order.
    pub fn neighborhood_origins(&self) -> &[IntersectionId] {
        &self.neighborhood_origins
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats::collect(&self.graph)
    }
}

fn log_phase(phase: &str, script_len: usize, summary: &RunSummary) {
    log::info!(
        "{}: {} symbols drew {} segments ({} dead ends, max depth {})",
        phase, script_len, summary.segments_added, summary.dead_ends, summary.max_depth
    );
}

/// `count` distinct indices spread evenly over `0..len`, starting at 0.
fn evenly_spaced(len: usize, count: usize) -> Vec<usize> {
    let count = count.min(len);
    (0..count).map(|k| k * len / count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{UVec2, Vec2};

    use crate::core::Error;
    use crate::graph::RoadType;
    use crate::terrain::{PopulationField, TerrainParams};

    fn terrain_from(elevation: impl Fn(Vec2) -> f32 + Sync) -> Arc<TerrainGrid> {
        let params = TerrainParams {
            divisions: UVec2::splat(20),
            water_line: 0.5,
            ..Default::default()
        };
        let population =
            PopulationField::from_points(vec![Vec2::new(2.5, 2.0)], params.population_cells, 1.5);
        Arc::new(TerrainGrid::build_with(params, &elevation, population))
    }

    fn land() -> Arc<TerrainGrid> {
        terrain_from(|_| 0.8)
    }

    fn small_config() -> RoadNetworkConfig {
        let mut config = RoadNetworkConfig { neighborhood_count: 3, ..Default::default() };
        config.highway.iterations = 1;
        config
    }

    #[test]
    fn test_evenly_spaced() {
        assert_eq!(evenly_spaced(10, 3), vec![0, 3, 6]);
        assert_eq!(evenly_spaced(2, 5), vec![0, 1]);
        assert!(evenly_spaced(0, 4).is_empty());
        assert_eq!(evenly_spaced(7, 1), vec![0]);
    }

    #[test]
    fn test_generate_on_open_land() {
        let network = RoadNetwork::generate(&small_config(), land()).unwrap();

        assert!(!network.highway_segments().is_empty());
        assert!(!network.street_segments().is_empty());
        assert_eq!(network.intersections()[0].position, Vec2::ZERO);
        assert_eq!(network.neighborhood_origins().len(), 3);
        assert_eq!(network.neighborhood_origins()[0], IntersectionId(0));

        // Every segment references existing intersections
        let n = network.intersections().len();
        for segment in network.segments() {
            assert!(segment.start_intersection_id.index() < n);
            assert!(segment.end_intersection_id.index() < n);
        }
    }

    #[test]
    fn test_phases_keep_their_road_types() {
        let network = RoadNetwork::generate(&small_config(), land()).unwrap();
        assert!(network.highway_segments().iter().all(|s| s.road_type == RoadType::Highway));
        assert!(network.street_segments().iter().all(|s| s.road_type == RoadType::Street));

        let stats = network.stats();
        assert_eq!(stats.highways, network.highway_segments().len());
        assert_eq!(stats.streets, network.street_segments().len());
        assert_eq!(stats.roads, 0);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = small_config();
        let a = RoadNetwork::generate(&config, land()).unwrap();
        let b = RoadNetwork::generate(&config, land()).unwrap();
        assert_eq!(a.segments(), b.segments());
        assert_eq!(a.intersections(), b.intersections());
    }

    #[test]
    fn test_network_stays_inside_map() {
        let network = RoadNetwork::generate(&small_config(), land()).unwrap();
        let bounds = network.terrain().bounds();
        assert!(network.intersections().iter().all(|i| bounds.contains_point(i.position)));
    }

    #[test]
    fn test_roads_avoid_water() {
        // Land west of screen x = 0.1, sea to the east
        let coast = terrain_from(|p: Vec2| if p.x < 1.7 { 0.8 } else { 0.1 });
        let network = RoadNetwork::generate(&small_config(), Arc::clone(&coast)).unwrap();

        assert!(network.segments().len() > 0);
        for node in network.intersections() {
            assert!(coast.position_on_land(node.position), "{:?} is in water", node.position);
        }
    }

    #[test]
    fn test_root_in_water_grows_nothing() {
        let network = RoadNetwork::generate(&small_config(), terrain_from(|_| 0.1)).unwrap();
        assert_eq!(network.intersections().len(), 1);
        assert!(network.segments().is_empty());
        assert_eq!(network.neighborhood_origins(), &[IntersectionId(0)]);
    }

    #[test]
    fn test_no_neighborhoods() {
        let config = RoadNetworkConfig { neighborhood_count: 0, ..small_config() };
        let network = RoadNetwork::generate(&config, land()).unwrap();
        assert!(network.street_segments().is_empty());
        assert!(network.neighborhood_origins().is_empty());
    }

    /// One highway step of `length` heading east from the origin.
    fn single_step(length: f32) -> RoadNetworkConfig {
        let mut config = RoadNetworkConfig { neighborhood_count: 0, ..Default::default() };
        config.highway = GrammarConfig { axiom: "F".into(), rules: Default::default(), iterations: 0 };
        config.highway_turtle.direction = 0.0;
        config.highway_turtle.segment_length = length;
        config
    }

    #[test]
    fn test_water_adjustment_settings_reach_constraint() {
        let coast = terrain_from(|p: Vec2| if p.x < 1.7 { 0.8 } else { 0.1 });

        // Without adjustment the step into the sea is dropped
        let network = RoadNetwork::generate(&single_step(0.3), Arc::clone(&coast)).unwrap();
        assert!(network.segments().is_empty());

        // Default minimum fraction 0.5 cannot reach land at x < 0.1
        let config = RoadNetworkConfig { allow_adjustment: true, ..single_step(0.3) };
        let network = RoadNetwork::generate(&config, Arc::clone(&coast)).unwrap();
        assert!(network.segments().is_empty());

        // Allowing a quarter of the length keeps the end at x = 0.075
        let config = RoadNetworkConfig {
            allow_adjustment: true,
            water_adjust_steps: 8,
            water_min_fraction: 0.25,
            ..single_step(0.3)
        };
        let network = RoadNetwork::generate(&config, Arc::clone(&coast)).unwrap();
        assert_eq!(network.segments().len(), 1);
        let end = network.intersections()[1].position;
        assert!((end.x - 0.075).abs() < 1e-5);
        assert!(coast.position_on_land(end));
    }

    #[test]
    fn test_random_angle_range_from_config() {
        let mut config = single_step(0.05);
        config.highway.axiom = "F~F~F~F".into();

        // Zero range keeps the highway on the x axis
        config.random_angle_max = 0.0;
        let network = RoadNetwork::generate(&config, land()).unwrap();
        assert_eq!(network.segments().len(), 4);
        assert!(network.intersections().iter().all(|i| i.position.y == 0.0));

        config.random_angle_max = 0.5;
        let network = RoadNetwork::generate(&config, land()).unwrap();
        assert!(network.intersections().iter().any(|i| i.position.y != 0.0));
    }

    #[test]
    fn test_script_limit_is_an_error() {
        let config = RoadNetworkConfig { max_script_len: 16, ..small_config() };
        let err = RoadNetwork::generate(&config, land()).err();
        assert!(matches!(err, Some(Error::Grammar(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RoadNetworkConfig { snap_distance: f32::NAN, ..small_config() };
        assert!(matches!(RoadNetwork::generate(&config, land()), Err(Error::Config(_))));
    }
}
