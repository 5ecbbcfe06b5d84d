//! Falling point-mass and its per-tick stepping rule
//!
//! Velocity is measured in world units per tick, not per second: the
//! displacement applied each tick IS the velocity, so the collision bound
//! passed to the query exactly matches the distance actually traveled.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::query::query_body_motion;
use super::terrain::TerrainGrid;

/// Body lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyState {
    /// Integrating under gravity, issuing a collision query every tick
    Falling,
    /// Came to rest on the terrain; inert until externally respawned
    Settled,
}

/// A point-mass moving over the terrain
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovingBody {
    pub pos: Vec3,
    /// World units per tick
    pub vel: Vec3,
    /// Constant acceleration, applied after position each tick
    pub acc: Vec3,
    pub state: BodyState,
}

impl MovingBody {
    pub fn spawn(pos: Vec3, impulse: Vec3, gravity: Vec3) -> Self {
        Self {
            pos,
            vel: impulse,
            acc: gravity,
            state: BodyState::Falling,
        }
    }

    /// Reset in place; the only way out of `Settled`.
    pub fn respawn(&mut self, pos: Vec3, impulse: Vec3, gravity: Vec3) {
        *self = Self::spawn(pos, impulse, gravity);
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.state == BodyState::Settled
    }

    /// Advance one tick.
    ///
    /// Symplectic Euler: position integrates with last tick's velocity
    /// before velocity picks up gravity, so this tick's query bound
    /// `|vel|` is exactly the distance the body would travel. On a hit the
    /// body snaps to the collision point, zeroes its velocity, and settles;
    /// otherwise the integrated position and velocity are committed.
    pub fn step(&mut self, terrain: &mut TerrainGrid) {
        if self.is_settled() {
            return;
        }

        let next_pos = self.pos + self.vel;
        let next_vel = self.vel + self.acc;

        let result = query_body_motion(terrain, self.pos, self.vel, self.vel.length());
        if result.hit {
            self.pos = result.position;
            self.vel = Vec3::ZERO;
            self.state = BodyState::Settled;
            log::debug!("body settled at {:?} (hit distance {})", self.pos, result.distance);
        } else {
            self.pos = next_pos;
            self.vel = next_vel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gravity() -> Vec3 {
        Vec3::new(0.0, -0.05, 0.0)
    }

    fn impulse() -> Vec3 {
        Vec3::new(0.0, 0.2, 0.0)
    }

    #[test]
    fn test_position_uses_pre_update_velocity() {
        let mut terrain = TerrainGrid::flat(8, 8, 2.0).unwrap();
        let mut body = MovingBody::spawn(Vec3::new(0.0, 20.0, 0.0), impulse(), gravity());

        body.step(&mut terrain);

        // First tick moves by the spawn impulse; gravity shows up in the
        // velocity only, visible in position from the next tick on.
        assert_eq!(body.pos.y, 20.0 + 0.2);
        assert_eq!(body.vel.y, 0.2 - 0.05);
    }

    #[test]
    fn test_body_settles_on_flat_terrain() {
        let mut terrain = TerrainGrid::flat(8, 8, 2.0).unwrap();
        let mut body = MovingBody::spawn(Vec3::new(0.0, 20.0, 0.0), impulse(), gravity());

        for _ in 0..2000 {
            body.step(&mut terrain);
            if body.is_settled() {
                break;
            }
        }

        assert!(body.is_settled());
        assert_eq!(body.vel, Vec3::ZERO);
        assert_eq!(body.pos.x, 0.0);
        assert_eq!(body.pos.z, 0.0);
        // Snapped to the surface, up to direction-normalization rounding.
        assert!(body.pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_settled_body_is_inert() {
        let mut terrain = TerrainGrid::flat(8, 8, 2.0).unwrap();
        let mut body = MovingBody::spawn(Vec3::new(1.0, 20.0, -1.0), impulse(), gravity());
        while !body.is_settled() {
            body.step(&mut terrain);
        }

        let rest_pos = body.pos;
        let version = terrain.version();
        for _ in 0..10 {
            body.step(&mut terrain);
        }
        assert_eq!(body.pos, rest_pos);
        // No queries issued, so no touch-flag writes either.
        assert_eq!(terrain.version(), version);
    }

    #[test]
    fn test_respawn_leaves_settled() {
        let mut terrain = TerrainGrid::flat(8, 8, 2.0).unwrap();
        let mut body = MovingBody::spawn(Vec3::new(0.0, 20.0, 0.0), impulse(), gravity());
        while !body.is_settled() {
            body.step(&mut terrain);
        }

        body.respawn(Vec3::new(2.0, 20.0, 2.0), impulse(), gravity());
        assert_eq!(body.state, BodyState::Falling);
        assert_eq!(body.vel, impulse());

        body.step(&mut terrain);
        assert!(!body.is_settled());
    }
}
