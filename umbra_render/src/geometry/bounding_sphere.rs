/// Bounding sphere: center plus non-negative radius

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    /// Centroid of the points, radius = farthest point from the centroid.
    ///
    /// Used for cascade bounds, where a sphere keeps the shadow frustum
    /// size independent of camera rotation.
    pub fn from_points_centroid(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        let radius = points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0f32, f32::max);
        Some(Self { center, radius })
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}
