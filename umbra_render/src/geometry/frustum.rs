/// Frustum: six clipping planes for visibility culling.
///
/// Plane normals point inward: a point is inside when its signed distance
/// to every plane is `>= 0`. Built fresh per view per frame from a
/// view-projection matrix whose clip space uses a `[0, 1]` depth range
/// (either depth direction works, the near/far pair just swaps roles).

use glam::{Mat4, Vec3};
use super::{AABB, BoundingSphere, Plane};

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the planes from a view-projection matrix (row combinations).
    ///
    /// Left/right from row3 ± row0, bottom/top from row3 ± row1, near from
    /// row2 alone, far from row3 - row2. Each plane is then normalized.
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);

        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2]
            .map(|v| Plane::from_vec4(v).normalized());

        Self { planes }
    }

    /// True iff the sphere center is no farther than `radius` behind any plane.
    ///
    /// Spheres near a frustum edge can pass every plane while lying outside
    /// the volume; that over-acceptance is expected.
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(sphere.center) >= -sphere.radius)
    }

    /// Conservative box test: for each plane, the farthest-in-front corner
    /// must not be behind it.
    ///
    /// Can report a box just outside a frustum corner as visible; never
    /// rejects a box that overlaps the frustum.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        let corners = aabb.calculate_vertices();
        self.planes.iter().all(|plane| {
            corners
                .iter()
                .map(|c| plane.distance_to_point(*c))
                .fold(f32::NEG_INFINITY, f32::max)
                >= 0.0
        })
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
