//! Road network configuration

use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::graph::{RoadType, DEFAULT_SNAP_DISTANCE};
use crate::turtle::rules::population::{DEFAULT_STEER_ARC, DEFAULT_STEER_SAMPLES};
use crate::turtle::rules::SpanMode;
use crate::turtle::TurtleParams;

/// Axiom, verbatim replacement rules and round count for one phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub axiom: String,
    pub rules: BTreeMap<char, String>,
    pub iterations: u32,
}

impl GrammarConfig {
    /// Arterial grammar: a trunk `L` that keeps sprouting side branches.
    pub fn highway() -> Self {
        let rules = BTreeMap::from([
            ('B', "[-LB][+LB]".to_string()),
            ('L', "FPFPFPFPF[--L]PFPFPFPFPFPFPFFPFPFPFPF[++L]PFPFPFPFPFL".to_string()),
            ('X', "[-F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]]".to_string()),
        ]);
        Self { axiom: "FL".to_string(), rules, iterations: 3 }
    }

    /// Neighbourhood grammar: a comb of short side streets.
    pub fn streets() -> Self {
        let rules = BTreeMap::from([(
            'X',
            "[-F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]F[+F]]".to_string(),
        )]);
        Self { axiom: "FXFFXFXFFX".to_string(), rules, iterations: 1 }
    }

    fn validate(&self, phase: &str) -> Result<()> {
        if self.axiom.is_empty() {
            return Err(Error::Config(format!("{} axiom must not be empty", phase)));
        }
        Ok(())
    }
}

/// Settings for the population-aware rules `P`, `p` and `S`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationRuleParams {
    pub steer_arc: f32,        // Radians swept by P/p around the heading
    pub steer_samples: u32,    // Headings sampled across the arc
    pub span_threshold: f32,   // Density boundary for S
    pub span_mode: SpanMode,
    pub span_max_steps: u32,   // Longest span in segment lengths
}

impl Default for PopulationRuleParams {
    fn default() -> Self {
        Self {
            steer_arc: DEFAULT_STEER_ARC,
            steer_samples: DEFAULT_STEER_SAMPLES,
            span_threshold: 0.1,
            span_mode: SpanMode::Dense,
            span_max_steps: 4,
        }
    }
}

/// Everything the two generation phases need besides the terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadNetworkConfig {
    /// Seeds `~` jitter
    pub road_seed: u64,
    pub highway: GrammarConfig,
    pub streets: GrammarConfig,
    /// Street grids grown off arterial intersections in phase 2
    pub neighborhood_count: u32,
    pub highway_turtle: TurtleParams,
    pub street_turtle: TurtleParams,
    /// Root intersection of phase 1
    pub start_position: Vec2,
    /// Added to the inbound heading of each neighbourhood origin (radians)
    pub street_heading_offset: f32,
    pub snap_distance: f32,
    /// Expansion bound per script, in bytes
    pub max_script_len: usize,
    /// Let constraints shorten a rejected segment instead of dropping it
    pub allow_adjustment: bool,
    /// Samples taken when pulling a wet segment end back onto land
    pub water_adjust_steps: u32,
    /// Shortest fraction of a segment a water adjustment may keep
    pub water_min_fraction: f32,
    /// Largest `~` jitter in radians
    pub random_angle_max: f32,
    pub population_rules: PopulationRuleParams,
}

impl Default for RoadNetworkConfig {
    fn default() -> Self {
        Self {
            road_seed: 1,
            highway: GrammarConfig::highway(),
            streets: GrammarConfig::streets(),
            neighborhood_count: 1,
            highway_turtle: TurtleParams::default(),
            street_turtle: TurtleParams {
                road_type: RoadType::Street,
                segment_length: 0.03,
                angle: FRAC_PI_2,
                ..Default::default()
            },
            start_position: Vec2::ZERO,
            street_heading_offset: FRAC_PI_4,
            snap_distance: DEFAULT_SNAP_DISTANCE,
            max_script_len: 1 << 20,
            allow_adjustment: false,
            water_adjust_steps: 8,
            water_min_fraction: 0.5,
            random_angle_max: FRAC_PI_8,
            population_rules: PopulationRuleParams::default(),
        }
    }
}

impl RoadNetworkConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded road network config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that would make generation meaningless or unbounded.
    pub fn validate(&self) -> Result<()> {
        self.highway.validate("highway")?;
        self.streets.validate("street")?;

        for (phase, turtle) in [("highway", &self.highway_turtle), ("street", &self.street_turtle)] {
            if !(turtle.segment_length > 0.0 && turtle.segment_length.is_finite()) {
                return Err(Error::Config(format!(
                    "{} segment_length must be positive, got {}",
                    phase, turtle.segment_length
                )));
            }
            if !turtle.angle.is_finite() || !turtle.direction.is_finite() {
                return Err(Error::Config(format!("{} turtle angles must be finite", phase)));
            }
        }

        if !(self.snap_distance >= 0.0 && self.snap_distance.is_finite()) {
            return Err(Error::Config(format!(
                "snap_distance must be non-negative, got {}",
                self.snap_distance
            )));
        }
        if self.max_script_len == 0 {
            return Err(Error::Config("max_script_len must be non-zero".into()));
        }
        if !self.start_position.is_finite() || !self.street_heading_offset.is_finite() {
            return Err(Error::Config("start_position and street_heading_offset must be finite".into()));
        }

        if self.water_adjust_steps == 0 {
            return Err(Error::Config("water_adjust_steps must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.water_min_fraction) {
            return Err(Error::Config(format!(
                "water_min_fraction must lie in [0, 1], got {}",
                self.water_min_fraction
            )));
        }
        if !self.random_angle_max.is_finite() {
            return Err(Error::Config("random_angle_max must be finite".into()));
        }

        let population = &self.population_rules;
        if population.steer_samples == 0 || population.span_max_steps == 0 {
            return Err(Error::Config(
                "steer_samples and span_max_steps must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&population.span_threshold) {
            return Err(Error::Config(format!(
                "span_threshold must lie in [0, 1], got {}",
                population.span_threshold
            )));
        }
        Ok(())
    }
}
