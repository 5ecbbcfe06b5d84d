//! Geometric predicates for ray/terrain intersection
//!
//! The tricky part of Heightfall: deciding whether a motion ray crosses a
//! terrain triangle, with explicit tie-break and degenerate-case policy.
//! All three predicates are pure; callers decide what to do with the
//! distances they return.

use glam::Vec3;

/// Rejection threshold for near-grazing rays, applied to `normal . dir`
/// before the plane-distance division can blow up.
pub const EPSILON: f32 = 1e-6;

/// A world-space triangle. The normal is derived from vertex winding on
/// every call, never cached across terrain edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    #[inline]
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unit normal from the two edges sharing `b`. Direction follows the
    /// winding order; no flipping toward any ray.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        (self.a - self.b).cross(self.b - self.c).normalize()
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Ray intersection against this triangle; see [`ray_triangle`].
    #[inline]
    pub fn ray_intersect(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<(Vec3, Vec3, f32)> {
        ray_triangle(self.a, self.b, self.c, ray_origin, ray_dir)
    }
}

/// Signed distance along `ray_dir` from `ray_origin` to the plane with the
/// given normal through `point_on_plane`.
///
/// Plane form `n . X + d = 0` with `d = -n . p`, solved for
/// `t = -(d + n . o) / (n . dir)`. Returns `None` when the ray is parallel
/// to the plane (`|n . dir| < EPSILON`). The sign of `t` is not clamped;
/// the caller decides validity.
pub fn ray_plane_distance(
    normal: Vec3,
    point_on_plane: Vec3,
    ray_origin: Vec3,
    ray_dir: Vec3,
) -> Option<f32> {
    let denom = normal.dot(ray_dir);
    if denom.abs() < EPSILON {
        return None;
    }
    let d = -normal.dot(point_on_plane);
    Some(-(d + normal.dot(ray_origin)) / denom)
}

/// Is `point` in front of the plane spanned by `(v0, v1, v2)`?
///
/// "In front" is relative to the winding: the normal is the cross product of
/// the two edges sharing `v1`. Points exactly on the plane count as in
/// front, so containment ties at triangle edges favor inclusion.
pub fn point_in_front_of_plane(v0: Vec3, v1: Vec3, v2: Vec3, point: Vec3) -> bool {
    let normal = (v0 - v1).cross(v1 - v2);
    let d = -normal.dot(v0);
    normal.dot(point) + d >= 0.0
}

/// Tests a ray for intersection with the triangle `(v0, v1, v2)`.
///
/// Returns `(hit_point, unit_normal, distance)` when the ray crosses the
/// triangle at a non-negative distance. A plane intersection behind the ray
/// origin means the body has already passed the plane, so it is reported as
/// no hit rather than an error. Containment is the AND of three half-space
/// tests against the planes formed by the ray origin and each edge in turn;
/// edge-on points are accepted.
pub fn ray_triangle(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    ray_origin: Vec3,
    ray_dir: Vec3,
) -> Option<(Vec3, Vec3, f32)> {
    let normal = (v0 - v1).cross(v1 - v2).normalize();

    let distance = ray_plane_distance(normal, v0, ray_origin, ray_dir)?;
    if distance < 0.0 {
        return None;
    }

    let hit = ray_origin + distance * ray_dir;

    if !point_in_front_of_plane(ray_origin, v0, v1, hit) {
        return None;
    }
    if !point_in_front_of_plane(ray_origin, v1, v2, hit) {
        return None;
    }
    if !point_in_front_of_plane(ray_origin, v2, v0, hit) {
        return None;
    }

    Some((hit, normal, distance))
}
