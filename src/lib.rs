//! Heightfall - heightfield terrain collision
//!
//! Core modules:
//! - `sim`: deterministic simulation (terrain grid, geometric predicates,
//!   collision query, falling-body stepping)
//! - `config`: data-driven simulation parameters
//!
//! Rendering, windowing, input polling, and heightmap image decoding live
//! outside this crate. The simulation exposes sample positions, per-sample
//! touch flags, and a terrain version counter for an external renderer to
//! poll, plus the body position each tick.

pub mod config;
pub mod sim;

pub use config::SimConfig;
pub use sim::{
    BodyState, CollisionResult, MovingBody, SimState, TerrainError, TerrainGrid, TickInput,
    query_body_motion, tick,
};

/// Simulation constants
pub mod consts {
    /// Height above the origin plane at which bodies respawn
    pub const SPAWN_HEIGHT: f32 = 20.0;
    /// Upward impulse given to a freshly dropped body (world units per tick)
    pub const SPAWN_IMPULSE: f32 = 0.2;
    /// Constant downward acceleration (world units per tick, per tick)
    pub const GRAVITY_PER_TICK: f32 = -0.05;

    /// Default spacing between adjacent terrain samples (world units)
    pub const DEFAULT_GRID_SIZE: f32 = 2.0;
    /// Default vertical scale applied to raw height samples
    pub const DEFAULT_HEIGHT_SCALE: f32 = 0.75;
}
