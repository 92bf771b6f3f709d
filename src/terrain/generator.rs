//! Noise-based elevation and population fields

use std::f32::consts::SQRT_2;

use glam::{UVec2, Vec2};
use noise::{Fbm, MultiFractal, NoiseFn, Value};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub divisions: UVec2,      // Grid cells along X and Y
    pub aspect_ratio: f32,     // Viewport width / height, stretches the lattice on X
    pub water_line: f32,       // Cells whose lowest corner is at or below this are water
    pub elevation_seed: u32,
    pub population_seed: u64,
    pub elevation_scale: f32,  // Lattice span covered by the grid (larger = busier)
    pub octaves: u32,          // FBM octaves (detail levels)
    pub persistence: f32,      // FBM persistence (0.5 typical)
    pub lacunarity: f32,       // FBM lacunarity (2.0 typical)
    pub population_cells: UVec2, // Population centers: one per cell of this lattice
    pub population_range: f32, // Falloff distance in population-lattice units
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            divisions: UVec2::new(100, 100),
            aspect_ratio: 1.0,
            water_line: 0.45,
            elevation_seed: 10,
            population_seed: 2345,
            elevation_scale: 3.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            population_cells: UVec2::new(5, 4),
            population_range: SQRT_2,
        }
    }
}

impl TerrainParams {
    /// Noise lattice coordinate of grid vertex (i, j).
    ///
    /// X is pre-scaled by the aspect ratio so features stay round on
    /// non-square viewports.
    pub fn lattice_coord(&self, i: u32, j: u32) -> Vec2 {
        Vec2::new(
            self.aspect_ratio * self.elevation_scale * i as f32 / self.divisions.x as f32,
            self.elevation_scale * j as f32 / self.divisions.y as f32,
        )
    }
}

/// Source of raw elevation samples in [0, 1] at lattice coordinates.
pub trait ElevationSource: Sync {
    fn sample_elevation(&self, lattice: Vec2) -> f32;
}

impl<F> ElevationSource for F
where
    F: Fn(Vec2) -> f32 + Sync,
{
    fn sample_elevation(&self, lattice: Vec2) -> f32 {
        self(lattice)
    }
}

/// Fractal Brownian motion over value noise
pub struct ElevationField {
    noise: Fbm<Value>,
}

impl ElevationField {
    pub fn new(params: &TerrainParams) -> Self {
        let noise = Fbm::<Value>::new(params.elevation_seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { noise }
    }
}

impl ElevationSource for ElevationField {
    fn sample_elevation(&self, lattice: Vec2) -> f32 {
        let v = self.noise.get([lattice.x as f64, lattice.y as f64]);

        // Map [-1, 1] to [0, 1]
        (((v + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }
}

/// Worley-style population centers with a cubic distance falloff.
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationField {
    points: Vec<Vec2>,
    cells: UVec2,
    range: f32,
}

impl PopulationField {
    /// One jittered center per population-lattice cell, reproducible from the seed.
    pub fn seeded(params: &TerrainParams) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(params.population_seed);
        let cells = params.population_cells;
        let mut points = Vec::with_capacity((cells.x * cells.y) as usize);
        for i in 0..cells.x {
            for j in 0..cells.y {
                let jitter = Vec2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
                points.push(Vec2::new(i as f32, j as f32) + jitter);
            }
        }

        Self { points, cells, range: params.population_range }
    }

    /// Explicit centers, given in population-lattice coordinates.
    pub fn from_points(points: Vec<Vec2>, cells: UVec2, range: f32) -> Self {
        Self { points, cells, range }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Map a normalized screen position into population-lattice space.
    pub fn screen_to_lattice(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            (1.0 + pos.x) * 0.5 * self.cells.x as f32,
            (1.0 + pos.y) * 0.5 * self.cells.y as f32,
        )
    }

    /// Density in [0, 1]: 0 beyond `range` of every center, rising to 1 at a center.
    pub fn sample(&self, pos: Vec2) -> f32 {
        let p = self.screen_to_lattice(pos);
        let nearest = self
            .points
            .iter()
            .map(|c| c.distance(p))
            .fold(f32::INFINITY, f32::min);

        if nearest >= self.range {
            return 0.0;
        }
        (1.0 - nearest / self.range).powi(3)
    }
}
