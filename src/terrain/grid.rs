//! Terrain grid: per-vertex elevation/population samples and per-cell aggregates.
//!
//! The grid covers normalized screen space `[-1, 1] x [-1, 1]`. Vertex `(i, j)`
//! sits at `(-1 + 2i/dx, -1 + 2j/dy)`; cell `(i, j)` is the quad whose
//! lower-left corner is vertex `(i, j)`.

use glam::{UVec2, Vec2};
use rayon::prelude::*;

use super::generator::{ElevationField, ElevationSource, PopulationField, TerrainParams};
use crate::math::Rect;

/// Samples stored at one grid vertex.
///
/// `min_elevation` and `avg_density` aggregate the four corners of the cell
/// whose lower-left vertex is this one. Vertices on the last row or column
/// own no cell and carry their own corner values instead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TerrainCell {
    pub corner_elevation: f32,
    pub corner_density: f32,
    pub min_elevation: f32,
    /// Mean of the four corner *elevations*. Downstream consumers rely on this
    /// exact aggregate, so it is kept even though the name suggests density.
    pub avg_density: f32,
}

/// Immutable sampled terrain, built once per seed.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    params: TerrainParams,
    vertices: Vec<TerrainCell>,
    population: PopulationField,
}

impl TerrainGrid {
    /// Build with fbm elevation and seeded population centers.
    pub fn build(params: TerrainParams) -> Self {
        let elevation = ElevationField::new(&params);
        let population = PopulationField::seeded(&params);
        Self::build_with(params, &elevation, population)
    }

    /// Build from any elevation source and population field.
    pub fn build_with(
        params: TerrainParams,
        elevation: &dyn ElevationSource,
        population: PopulationField,
    ) -> Self {
        assert!(
            params.divisions.x > 0 && params.divisions.y > 0,
            "terrain divisions must be non-zero, got {}",
            params.divisions
        );

        let dx = params.divisions.x;
        let dy = params.divisions.y;

        // Rows are independent; collect keeps them in order.
        let rows: Vec<Vec<TerrainCell>> = (0..=dy)
            .into_par_iter()
            .map(|j| {
                (0..=dx)
                    .map(|i| {
                        let pos = vertex_position(params.divisions, i, j);
                        let corner_elevation = elevation.sample_elevation(params.lattice_coord(i, j));
                        let corner_density = population.sample(pos);
                        TerrainCell {
                            corner_elevation,
                            corner_density,
                            min_elevation: corner_elevation,
                            avg_density: corner_elevation,
                        }
                    })
                    .collect()
            })
            .collect();

        let mut vertices: Vec<TerrainCell> = rows.into_iter().flatten().collect();

        let stride = (dx + 1) as usize;
        for j in 0..dy as usize {
            for i in 0..dx as usize {
                let corners = [
                    vertices[j * stride + i].corner_elevation,
                    vertices[j * stride + i + 1].corner_elevation,
                    vertices[(j + 1) * stride + i].corner_elevation,
                    vertices[(j + 1) * stride + i + 1].corner_elevation,
                ];
                let cell = &mut vertices[j * stride + i];
                cell.min_elevation = corners.iter().copied().fold(f32::INFINITY, f32::min);
                cell.avg_density = corners.iter().sum::<f32>() / 4.0;
            }
        }

        log::debug!(
            "Built terrain grid {}x{} (water line {})",
            dx, dy, params.water_line
        );

        Self { params, vertices, population }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn divisions(&self) -> UVec2 {
        self.params.divisions
    }

    pub fn water_line(&self) -> f32 {
        self.params.water_line
    }

    pub fn population(&self) -> &PopulationField {
        &self.population
    }

    /// Normalized rectangle covered by the grid.
    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::NEG_ONE, Vec2::ONE)
    }

    /// Width and height of one cell in normalized space.
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(2.0 / self.params.divisions.x as f32, 2.0 / self.params.divisions.y as f32)
    }

    /// Vertex samples at `(i, j)`, with `i <= dx` and `j <= dy`.
    pub fn vertex(&self, i: u32, j: u32) -> &TerrainCell {
        let d = self.params.divisions;
        assert!(i <= d.x && j <= d.y, "vertex ({}, {}) outside grid {}", i, j, d);
        &self.vertices[(j * (d.x + 1) + i) as usize]
    }

    /// Cell aggregates at `(ix, iy)`, with both indices inside `[0, divisions)`.
    pub fn cell(&self, ix: u32, iy: u32) -> &TerrainCell {
        let d = self.params.divisions;
        assert!(ix < d.x && iy < d.y, "cell ({}, {}) outside grid {}", ix, iy, d);
        self.vertex(ix, iy)
    }

    /// Continuous grid coordinate of a normalized position.
    fn grid_coord(&self, pos: Vec2) -> Vec2 {
        let d = self.params.divisions.as_vec2();
        (pos + Vec2::ONE) * 0.5 * d
    }

    /// Containing cell of a normalized position, clamped into the grid.
    pub fn screen_pos_to_grid_index(&self, pos: Vec2) -> UVec2 {
        let g = self.grid_coord(pos);
        let max = self.params.divisions - UVec2::ONE;
        UVec2::new(
            (g.x.floor().max(0.0) as u32).min(max.x),
            (g.y.floor().max(0.0) as u32).min(max.y),
        )
    }

    /// Population density from the seeded centers.
    pub fn sample_population_density(&self, pos: Vec2) -> f32 {
        self.population.sample(pos)
    }

    /// Bilinear interpolation of the containing cell's corner elevations.
    pub fn get_elevation(&self, pos: Vec2) -> f32 {
        let index = self.screen_pos_to_grid_index(pos);
        let f = (self.grid_coord(pos) - index.as_vec2()).clamp(Vec2::ZERO, Vec2::ONE);

        let h00 = self.vertex(index.x, index.y).corner_elevation;
        let h10 = self.vertex(index.x + 1, index.y).corner_elevation;
        let h01 = self.vertex(index.x, index.y + 1).corner_elevation;
        let h11 = self.vertex(index.x + 1, index.y + 1).corner_elevation;

        let a = h00 + (h10 - h00) * f.x;
        let b = h01 + (h11 - h01) * f.x;
        a + (b - a) * f.y
    }

    /// Land iff the containing cell's lowest corner is strictly above the water line.
    pub fn position_on_land(&self, pos: Vec2) -> bool {
        let index = self.screen_pos_to_grid_index(pos);
        self.cell(index.x, index.y).min_elevation > self.params.water_line
    }

    /// Fraction of cells classified as land.
    pub fn land_fraction(&self) -> f32 {
        let d = self.params.divisions;
        let land = (0..d.y)
            .flat_map(|j| (0..d.x).map(move |i| (i, j)))
            .filter(|&(i, j)| self.cell(i, j).min_elevation > self.params.water_line)
            .count();
        land as f32 / (d.x * d.y) as f32
    }
}

/// Normalized position of grid vertex `(i, j)`.
pub fn vertex_position(divisions: UVec2, i: u32, j: u32) -> Vec2 {
    Vec2::new(
        -1.0 + 2.0 * i as f32 / divisions.x as f32,
        -1.0 + 2.0 * j as f32 / divisions.y as f32,
    )
}
