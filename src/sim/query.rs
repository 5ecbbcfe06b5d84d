//! Brute-force collision query over the terrain
//!
//! Scans every cell in row-major order, first triangle then second, and
//! accepts the first hit within the travel bound. First-match, not
//! nearest-match: the scan-order tie-break is part of the observable
//! contract, so no spatial index is used. O(width * length) per query,
//! which runs once per simulated tick.

use glam::Vec3;

use super::geometry::{EPSILON, ray_triangle};
use super::terrain::TerrainGrid;

/// Result of a collision query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the motion crosses the terrain within the bound
    pub hit: bool,
    /// Collision point (valid iff hit)
    pub position: Vec3,
    /// Unit surface normal from the winning triangle's winding (valid iff hit)
    pub normal: Vec3,
    /// Distance from the origin to the collision point (valid iff hit, >= 0)
    pub distance: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            distance: 0.0,
        }
    }
}

/// Would moving from `origin` by `displacement` cross the terrain surface
/// within `max_distance`?
///
/// `displacement` need not be normalized; the ray direction is
/// `displacement.normalize()` and callers pass the intended travel distance
/// separately. Touch flags are cleared on entry and set for the winning
/// triangle, so a missing frame never shows stale collision coloring. A miss
/// is the expected common case ("still falling"), not an error.
pub fn query_body_motion(
    terrain: &mut TerrainGrid,
    origin: Vec3,
    displacement: Vec3,
    max_distance: f32,
) -> CollisionResult {
    terrain.clear_touch_flags();

    // A resting body queries with zero displacement; nothing to intersect.
    if displacement.length_squared() < EPSILON * EPSILON {
        return CollisionResult::miss();
    }
    let dir = displacement.normalize();

    let (width, length) = terrain.sample_count();
    for row in 0..length - 1 {
        for col in 0..width - 1 {
            let [i0, i1, i2, i3] = terrain.corner_indices(row, col);
            let s = terrain.samples();
            let v0 = s[i0].position;
            let v1 = s[i1].position;
            let v2 = s[i2].position;
            let v3 = s[i3].position;

            if let Some((position, normal, distance)) = ray_triangle(v0, v1, v2, origin, dir) {
                if distance <= max_distance {
                    terrain.mark_touched(i0, i1, i2);
                    log::trace!("hit cell ({row}, {col}) triangle A at distance {distance}");
                    return CollisionResult {
                        hit: true,
                        position,
                        normal,
                        distance,
                    };
                }
            }

            if let Some((position, normal, distance)) = ray_triangle(v2, v1, v3, origin, dir) {
                if distance <= max_distance {
                    terrain.mark_touched(i2, i1, i3);
                    log::trace!("hit cell ({row}, {col}) triangle B at distance {distance}");
                    return CollisionResult {
                        hit: true,
                        position,
                        normal,
                        distance,
                    };
                }
            }
        }
    }

    CollisionResult::miss()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single_cell_flat() -> TerrainGrid {
        // One 2x2-unit cell with corners at y = 0, centered on the origin.
        TerrainGrid::flat(2, 2, 2.0).unwrap()
    }

    #[test]
    fn test_straight_drop_hits_origin() {
        let mut terrain = single_cell_flat();
        let result = query_body_motion(
            &mut terrain,
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -11.0, 0.0),
            11.0,
        );
        assert!(result.hit);
        assert_eq!(result.distance, 10.0);
        assert_eq!(result.position, Vec3::ZERO);
        assert_eq!(result.normal, Vec3::Y);
    }

    #[test]
    fn test_out_of_reach_is_miss() {
        let mut terrain = single_cell_flat();
        let result = query_body_motion(
            &mut terrain,
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
            5.0,
        );
        assert!(!result.hit);
        assert!(terrain.samples().iter().all(|s| !s.touched));
    }

    #[test]
    fn test_zero_displacement_is_miss() {
        let mut terrain = single_cell_flat();
        let result =
            query_body_motion(&mut terrain, Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, 0.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_idempotent_against_unmodified_terrain() {
        let mut terrain = single_cell_flat();
        let origin = Vec3::new(0.3, 10.0, -0.4);
        let displacement = Vec3::new(0.0, -12.0, 0.0);
        let first = query_body_motion(&mut terrain, origin, displacement, 12.0);
        let second = query_body_motion(&mut terrain, origin, displacement, 12.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_max_distance_boundary() {
        let mut terrain = single_cell_flat();
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let displacement = Vec3::new(0.0, -1.0, 0.0);
        // Exactly at the bound counts as a hit; just under it does not.
        assert!(query_body_motion(&mut terrain, origin, displacement, 10.0).hit);
        assert!(!query_body_motion(&mut terrain, origin, displacement, 9.99).hit);
    }

    #[test]
    fn test_diagonal_edge_accepted_by_first_triangle() {
        // (0, 0) lies exactly on the shared i1-i2 diagonal; triangle A is
        // scanned first and edge-on ties favor containment, so A wins.
        let mut terrain = single_cell_flat();
        let result = query_body_motion(
            &mut terrain,
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -11.0, 0.0),
            11.0,
        );
        assert!(result.hit);
        let touched: Vec<usize> = terrain
            .samples()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.touched)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(touched, vec![0, 1, 2]);
    }

    #[test]
    fn test_first_match_in_scan_order() {
        // Two cells side by side; the drop point sits on their shared
        // column edge at x = 0. Cell (0, 0) is scanned first, and within it
        // the edge belongs to triangle B, so samples {1, 3, 4} light up.
        let mut terrain = TerrainGrid::flat(3, 2, 2.0).unwrap();
        let result = query_body_motion(
            &mut terrain,
            Vec3::new(0.0, 10.0, -0.5),
            Vec3::new(0.0, -11.0, 0.0),
            11.0,
        );
        assert!(result.hit);
        let touched: Vec<usize> = terrain
            .samples()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.touched)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(touched, vec![1, 3, 4]);
    }

    #[test]
    fn test_version_bumps_on_hit_only() {
        let mut terrain = single_cell_flat();
        let origin = Vec3::new(0.0, 10.0, 0.0);
        query_body_motion(&mut terrain, origin, Vec3::new(0.0, -5.0, 0.0), 5.0);
        assert_eq!(terrain.version(), 0);
        query_body_motion(&mut terrain, origin, Vec3::new(0.0, -11.0, 0.0), 11.0);
        assert_eq!(terrain.version(), 1);
    }

    #[test]
    fn test_hit_clears_previous_flags() {
        let mut terrain = TerrainGrid::flat(3, 2, 2.0).unwrap();
        let displacement = Vec3::new(0.0, -11.0, 0.0);
        query_body_motion(&mut terrain, Vec3::new(-1.5, 10.0, -0.5), displacement, 11.0);
        query_body_motion(&mut terrain, Vec3::new(1.5, 10.0, 0.5), displacement, 11.0);
        // Only the second query's triangle remains flagged.
        let touched = terrain.samples().iter().filter(|s| s.touched).count();
        assert_eq!(touched, 3);
    }

    proptest! {
        /// Growing the bound never turns the flat-terrain hit into a miss;
        /// shrinking it below the true distance always does.
        #[test]
        fn prop_monotonic_in_max_distance(speed in 0.1f32..30.0) {
            // True hit distance is 10; skip the sub-ulp window around it.
            prop_assume!((speed - 10.0).abs() > 1e-3);
            let mut terrain = single_cell_flat();
            let origin = Vec3::new(0.0, 10.0, 0.0);
            let result = query_body_motion(
                &mut terrain,
                origin,
                Vec3::new(0.0, -speed, 0.0),
                speed,
            );
            prop_assert_eq!(result.hit, speed > 10.0);
        }
    }
}
