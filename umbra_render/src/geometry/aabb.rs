/// Axis-aligned bounding box
///
/// Stored as two corners. Boxes built with [`AABB::from_vertices`] satisfy
/// `min[i] <= max[i]` on every axis.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Component-wise min/max reduction over a point set.
    ///
    /// Returns `None` for an empty slice: there is no meaningful box.
    pub fn from_vertices(vertices: &[Vec3]) -> Option<Self> {
        let (first, rest) = vertices.split_first()?;
        Some(Self::enclose(*first, rest))
    }

    fn enclose(first: Vec3, rest: &[Vec3]) -> Self {
        rest.iter().fold(Self { min: first, max: first }, |acc, v| Self {
            min: acc.min.min(*v),
            max: acc.max.max(*v),
        })
    }

    /// The 8 corners: min first, x varying fastest, then y, then z; max last.
    pub fn calculate_vertices(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Transform the 8 corners (with perspective divide) and re-derive a box.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let corners = self.calculate_vertices().map(|v| matrix.project_point3(v));
        Self::enclose(corners[0], &corners[1..])
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
