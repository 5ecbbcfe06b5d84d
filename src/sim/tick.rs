//! Per-tick command handling and simulation stepping
//!
//! The excluded input layer edge-detects key presses and delivers them here
//! as one-shot commands: each flag fires at most once per logical press.
//! Everything below is deterministic given the config seed.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::MovingBody;
use super::terrain::TerrainGrid;
use crate::config::SimConfig;

/// Fraction of the terrain extent kept clear of random drops on each side,
/// so bodies land on the surface rather than off the rim.
const DROP_MARGIN: f32 = 0.25;

/// One-shot commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drop the body above a random interior point of the terrain
    pub drop_random: bool,
    /// Drop the body again from its current (x, z)
    pub drop_again: bool,
    /// Drop above the next triangle of the probe sweep
    pub drop_probe: bool,
}

/// The whole simulation: one terrain, one body, one thread.
pub struct SimState {
    pub terrain: TerrainGrid,
    pub body: MovingBody,
    pub config: SimConfig,
    pub time_ticks: u64,
    rng: Pcg32,
    /// Probe sweep cursor: flat cell index and triangle (0 = A, 1 = B)
    probe_cell: usize,
    probe_seg: usize,
}

impl SimState {
    pub fn new(terrain: TerrainGrid, config: SimConfig) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        // The body starts at rest above a corner of the terrain until the
        // first drop command arrives.
        let (min, _) = terrain.xz_extent();
        let start = Vec3::new(
            min.x + config.grid_size,
            config.spawn_height,
            min.z + config.grid_size,
        );
        let body = MovingBody::spawn(start, Vec3::ZERO, Vec3::ZERO);
        Self {
            terrain,
            body,
            config,
            time_ticks: 0,
            rng,
            probe_cell: 0,
            probe_seg: 0,
        }
    }

    /// Respawn the body falling from `(x, spawn_height, z)`.
    pub fn drop_at(&mut self, x: f32, z: f32) {
        let pos = Vec3::new(x, self.config.spawn_height, z);
        self.body
            .respawn(pos, self.config.spawn_velocity(), self.config.gravity());
        log::info!("body dropped at ({x:.2}, {z:.2})");
    }

    fn random_drop_point(&mut self) -> (f32, f32) {
        let (min, max) = self.terrain.xz_extent();
        let margin_x = (max.x - min.x) * DROP_MARGIN;
        let margin_z = (max.z - min.z) * DROP_MARGIN;
        (
            self.rng.random_range(min.x + margin_x..max.x - margin_x),
            self.rng.random_range(min.z + margin_z..max.z - margin_z),
        )
    }

    /// Next drop point of the probe sweep: every cell's two triangles in
    /// turn, row-major, triangle A before B, wrapping at the end. Dropping
    /// over each centroid verifies that the scan reports the triangle the
    /// body actually lands on.
    fn next_probe_point(&mut self) -> Option<(f32, f32)> {
        let (width, length) = self.terrain.sample_count();
        let cells = (width - 1) * (length - 1);
        self.probe_cell %= cells;

        let row = self.probe_cell / (width - 1);
        let col = self.probe_cell % (width - 1);
        let (tri_a, tri_b) = self.terrain.cell_triangles(row, col).ok()?;
        let centroid = if self.probe_seg == 0 {
            tri_a.centroid()
        } else {
            tri_b.centroid()
        };

        if self.probe_seg == 1 {
            self.probe_cell = (self.probe_cell + 1) % cells;
        }
        self.probe_seg = 1 - self.probe_seg;

        Some((centroid.x, centroid.z))
    }
}

/// Advance the simulation by one tick: apply at most one drop command, then
/// step the body (which issues this tick's collision query).
pub fn tick(state: &mut SimState, input: &TickInput) {
    if input.drop_random {
        let (x, z) = state.random_drop_point();
        state.drop_at(x, z);
    } else if input.drop_again {
        let (x, z) = (state.body.pos.x, state.body.pos.z);
        state.drop_at(x, z);
    } else if input.drop_probe {
        if let Some((x, z)) = state.next_probe_point() {
            state.drop_at(x, z);
        }
    }

    state.time_ticks += 1;
    state.body.step(&mut state.terrain);
}
