//! Road grid: intersections bucketed by the terrain cell they fall in.

use std::sync::Arc;

use glam::{UVec2, Vec2};

use super::types::IntersectionId;
use crate::terrain::TerrainGrid;

pub struct RoadGrid {
    terrain: Arc<TerrainGrid>,
    buckets: Vec<Vec<IntersectionId>>,
}

impl RoadGrid {
    pub fn new(terrain: Arc<TerrainGrid>) -> Self {
        let d = terrain.divisions();
        Self {
            terrain,
            buckets: vec![Vec::new(); (d.x * d.y) as usize],
        }
    }

    pub fn terrain(&self) -> &Arc<TerrainGrid> {
        &self.terrain
    }

    fn bucket_index(&self, cell: UVec2) -> usize {
        let d = self.terrain.divisions();
        assert!(cell.x < d.x && cell.y < d.y, "road grid cell {} outside grid {}", cell, d);
        (cell.y * d.x + cell.x) as usize
    }

    pub fn cell_of(&self, pos: Vec2) -> UVec2 {
        self.terrain.screen_pos_to_grid_index(pos)
    }

    pub fn insert(&mut self, id: IntersectionId, pos: Vec2) {
        let index = self.bucket_index(self.cell_of(pos));
        self.buckets[index].push(id);
    }

    pub fn intersections_in_cell(&self, ix: u32, iy: u32) -> &[IntersectionId] {
        &self.buckets[self.bucket_index(UVec2::new(ix, iy))]
    }

    /// Ids bucketed in the 3x3 block of cells around `pos`.
    pub fn neighbourhood(&self, pos: Vec2) -> impl Iterator<Item = IntersectionId> + '_ {
        let center = self.cell_of(pos);
        let max = self.terrain.divisions() - UVec2::ONE;
        let x0 = center.x.saturating_sub(1);
        let y0 = center.y.saturating_sub(1);
        let x1 = (center.x + 1).min(max.x);
        let y1 = (center.y + 1).min(max.y);

        (y0..=y1)
            .flat_map(move |y| (x0..=x1).map(move |x| UVec2::new(x, y)))
            .flat_map(move |cell| self.buckets[self.bucket_index(cell)].iter().copied())
    }

    /// True when a 3x3 neighbourhood is guaranteed to hold every point within `radius`.
    pub fn covers_radius(&self, radius: f32) -> bool {
        let cell = self.terrain.cell_size();
        cell.x >= radius && cell.y >= radius
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }
}
