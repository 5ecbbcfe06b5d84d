//! Heightfall demo entry point
//!
//! Headless driver: builds a procedural heightfield, drops bodies onto it
//! until enough of them settle, and prints where they came to rest as JSON.
//! Rendering, windowing, and heightmap image decoding live outside this
//! crate; an optional argument supplies a JSON config file.

use std::{env, fs, process};

use glam::Vec3;
use heightfall::config::SimConfig;
use heightfall::sim::{SimState, TerrainGrid, TickInput, tick};

const TERRAIN_WIDTH: usize = 16;
const TERRAIN_LENGTH: usize = 16;
const MAX_TICKS: u64 = 100_000;
const DROP_COUNT: usize = 25;

fn load_config() -> SimConfig {
    let Some(path) = env::args().nth(1) else {
        return SimConfig::default();
    };
    let text = fs::read_to_string(&path).unwrap_or_else(|e| {
        log::error!("cannot read config {path}: {e}");
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::error!("bad config {path}: {e}");
        process::exit(1);
    })
}

/// Shallow sine bowl, all heights non-negative. Stands in for the external
/// heightmap decoder.
fn demo_heights(width: usize, length: usize) -> Vec<f32> {
    let mut heights = Vec::with_capacity(width * length);
    for row in 0..length {
        for col in 0..width {
            let u = col as f32 / (width - 1) as f32;
            let v = row as f32 / (length - 1) as f32;
            let bowl = (u * std::f32::consts::PI).sin() * (v * std::f32::consts::PI).sin();
            heights.push(8.0 * (1.0 - bowl));
        }
    }
    heights
}

fn main() {
    env_logger::init();

    let config = load_config();
    let heights = demo_heights(TERRAIN_WIDTH, TERRAIN_LENGTH);
    let terrain = TerrainGrid::from_heights(
        &heights,
        TERRAIN_WIDTH,
        TERRAIN_LENGTH,
        config.grid_size,
        config.height_scale,
    )
    .unwrap_or_else(|e| {
        log::error!("terrain construction failed: {e}");
        process::exit(1);
    });
    let mut state = SimState::new(terrain, config);

    let mut rest_positions: Vec<Vec3> = Vec::with_capacity(DROP_COUNT);
    let mut drop_next = true;
    for _ in 0..MAX_TICKS {
        let input = TickInput {
            drop_random: drop_next,
            ..Default::default()
        };
        drop_next = false;
        tick(&mut state, &input);

        if state.body.is_settled() {
            rest_positions.push(state.body.pos);
            log::info!(
                "settled at {:?}, terrain version {}",
                state.body.pos,
                state.terrain.version()
            );
            if rest_positions.len() >= DROP_COUNT {
                break;
            }
            drop_next = true;
        }
    }

    match serde_json::to_string_pretty(&rest_positions) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("trace serialization failed: {e}"),
    }
}
