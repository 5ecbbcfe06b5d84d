//! Deterministic simulation module
//!
//! All collision and stepping logic lives here. This module must be pure
//! and deterministic:
//! - Fixed per-tick integration only (velocity is world units per tick)
//! - Seeded RNG only
//! - One body, one terrain, one thread
//! - No rendering or platform dependencies

pub mod body;
pub mod geometry;
pub mod query;
pub mod terrain;
pub mod tick;

pub use body::{BodyState, MovingBody};
pub use geometry::{EPSILON, Triangle, point_in_front_of_plane, ray_plane_distance, ray_triangle};
pub use query::{CollisionResult, query_body_motion};
pub use terrain::{HeightSample, TerrainError, TerrainGrid};
pub use tick::{SimState, TickInput, tick};
