//! Data-driven simulation parameters
//!
//! Loaded from JSON by the demo driver. Defaults mirror the reference scene:
//! a 2-unit grid, bodies dropped from y = 20 with a small upward impulse and
//! constant gravity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World-unit spacing between adjacent terrain samples
    pub grid_size: f32,
    /// Vertical scale applied to raw height samples
    pub height_scale: f32,
    /// Y coordinate bodies respawn at
    pub spawn_height: f32,
    /// Upward impulse given to a freshly dropped body (units per tick)
    pub spawn_impulse: f32,
    /// Per-tick change in vertical velocity (negative = down)
    pub gravity_per_tick: f32,
    /// Seed for the random drop-position RNG
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            height_scale: DEFAULT_HEIGHT_SCALE,
            spawn_height: SPAWN_HEIGHT,
            spawn_impulse: SPAWN_IMPULSE,
            gravity_per_tick: GRAVITY_PER_TICK,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Velocity applied to a body on spawn (straight up)
    #[inline]
    pub fn spawn_velocity(&self) -> Vec3 {
        Vec3::new(0.0, self.spawn_impulse, 0.0)
    }

    /// Constant acceleration applied to a falling body
    #[inline]
    pub fn gravity(&self) -> Vec3 {
        Vec3::new(0.0, self.gravity_per_tick, 0.0)
    }
}
