//! Procedural terrain: elevation and population fields sampled onto a grid

pub mod generator;
pub use generator::{ElevationField, ElevationSource, PopulationField, TerrainParams};

pub mod grid;
pub use grid::{TerrainCell, TerrainGrid};
