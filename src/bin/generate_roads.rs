//! Road network generator binary: builds terrain, grows roads, prints a summary.
//!
//! Usage: cargo run --release --bin generate_roads -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>          JSON road network config (flags below override it)
//!   --seed <SEED>            Road seed for random angles (default: 1)
//!   --elevation-seed <SEED>  Terrain noise seed (default: 10)
//!   --population-seed <SEED> Population center seed (default: 2345)
//!   --iterations <N>         Highway grammar rounds (default: 3)
//!   --divisions <N>          Terrain grid cells per side (default: 100)
//!   --aspect <RATIO>         Viewport width / height (default: 1.0)
//!   --water-line <H>         Elevation at or below which cells are water (default: 0.45)
//!   --neighborhoods <N>      Street grids grown off the highways (default: 1)
//!   --print-config           Print the effective config as JSON and exit

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use glam::UVec2;

use roadgen::graph::RoadType;
use roadgen::network::{RoadNetwork, RoadNetworkConfig};
use roadgen::terrain::{TerrainGrid, TerrainParams};

fn main() -> ExitCode {
    roadgen::core::logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> roadgen::core::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => RoadNetworkConfig::load(path)?,
        None => RoadNetworkConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.road_seed = seed;
    }
    if let Some(iterations) = parse_u32_arg(&args, "--iterations") {
        config.highway.iterations = iterations;
    }
    if let Some(count) = parse_u32_arg(&args, "--neighborhoods") {
        config.neighborhood_count = count;
    }
    config.validate()?;

    let defaults = TerrainParams::default();
    let divisions = parse_u32_arg(&args, "--divisions").unwrap_or(defaults.divisions.x).max(1);
    let terrain_params = TerrainParams {
        divisions: UVec2::splat(divisions),
        aspect_ratio: parse_f32_arg(&args, "--aspect").unwrap_or(defaults.aspect_ratio),
        water_line: parse_f32_arg(&args, "--water-line").unwrap_or(defaults.water_line),
        elevation_seed: parse_u32_arg(&args, "--elevation-seed").unwrap_or(defaults.elevation_seed),
        population_seed: parse_u64_arg(&args, "--population-seed").unwrap_or(defaults.population_seed),
        ..defaults
    };

    if args.iter().any(|a| a == "--print-config") {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    println!("=== Roadgen Network Generator ===");
    println!("Terrain:  {} x {} cells, aspect {}", divisions, divisions, terrain_params.aspect_ratio);
    println!("Seeds:    elevation {}, population {}, road {}",
        terrain_params.elevation_seed, terrain_params.population_seed, config.road_seed);
    println!("Grammar:  {} highway rounds, {} neighbourhoods",
        config.highway.iterations, config.neighborhood_count);
    println!();

    let start = Instant::now();
    let terrain = Arc::new(TerrainGrid::build(terrain_params));
    let terrain_time = start.elapsed();
    println!("Terrain built in {:.1}ms ({:.0}% land)",
        terrain_time.as_secs_f64() * 1000.0, terrain.land_fraction() * 100.0);

    let start = Instant::now();
    let network = RoadNetwork::generate(&config, terrain)?;
    let road_time = start.elapsed();
    let stats = network.stats();

    println!("Roads grown in {:.1}ms", road_time.as_secs_f64() * 1000.0);
    println!();
    println!("Intersections: {}", stats.intersections);
    println!("Segments:      {}", stats.segments);
    for road_type in RoadType::ALL {
        println!("  {:<10} {}", format!("{:?}", road_type), stats.count(road_type));
    }
    println!("Total length:  {:.3}", stats.total_length);
    println!("Paved area:    {:.5}", stats.paved_area);
    println!("Dead ends:     {}", stats.dead_ends);
    println!("Retraced:      {}", stats.duplicate_segments);
    if !stats.bounds.is_empty() {
        let size = stats.bounds.size();
        println!("Extent:        ({:.3}, {:.3}) .. ({:.3}, {:.3}), {:.3} x {:.3}",
            stats.bounds.min.x, stats.bounds.min.y, stats.bounds.max.x, stats.bounds.max.y,
            size.x, size.y);
    }

    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
