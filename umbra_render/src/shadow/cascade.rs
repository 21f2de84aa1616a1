/// Cascaded shadow map math for the directional shadow caster
///
/// The camera frustum up to the shadow distance is split into slices. Each
/// slice is enclosed in a sphere so its shadow projection keeps the same
/// size while the camera rotates, and the sphere center is snapped to the
/// shadow texel grid so the projection does not shimmer while it moves.

use glam::{Mat4, Vec3};
use crate::geometry::BoundingSphere;
use crate::graphics_device::DepthConvention;

pub const MAX_CASCADE_COUNT: usize = 4;

/// Each cascade's far plane reaches slightly into the next one
pub const CASCADE_OVERLAP: f32 = 1.005;

/// Shortest shadowed depth; keeps the cascades ordered when the shadow
/// distance ends in front of the camera near plane
pub const MIN_SHADOWED_DEPTH: f32 = 0.01;

/// View-depth range of one cascade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCascadeBoundary {
    pub near_clip: f32,
    pub far_clip: f32,
}

impl ShadowCascadeBoundary {
    /// Placeholder for cascades beyond the active count
    pub const UNUSED: Self = Self { near_clip: f32::INFINITY, far_clip: f32::INFINITY };

    pub fn is_used(&self) -> bool {
        self.near_clip.is_finite()
    }
}

pub type ShadowCascadeBoundaries = [ShadowCascadeBoundary; MAX_CASCADE_COUNT];

/// Split `[camera_near, min(camera_far, shadow_distance)]` into cascades.
///
/// The shadowed range is never shorter than [`MIN_SHADOWED_DEPTH`].
///
/// `normalized_splits[i]` is the start of cascade `i + 1` as a fraction of
/// the shadowed depth. `cascade_count` is clamped to `1..=MAX_CASCADE_COUNT`;
/// slots past it are [`ShadowCascadeBoundary::UNUSED`].
pub fn calculate_cascade_boundaries(
    camera_near: f32,
    camera_far: f32,
    shadow_distance: f32,
    cascade_count: usize,
    normalized_splits: &[f32],
) -> ShadowCascadeBoundaries {
    let cascade_count = cascade_count.clamp(1, MAX_CASCADE_COUNT);
    let shadowed_far = camera_far.min(shadow_distance).max(camera_near + MIN_SHADOWED_DEPTH);
    let shadowed_depth = shadowed_far - camera_near;

    let mut boundaries = [ShadowCascadeBoundary::UNUSED; MAX_CASCADE_COUNT];
    boundaries[0].near_clip = camera_near;

    for i in 0..cascade_count - 1 {
        let split = normalized_splits.get(i).copied().unwrap_or(1.0);
        boundaries[i + 1].near_clip = camera_near + split * shadowed_depth;
        boundaries[i].far_clip = boundaries[i + 1].near_clip * CASCADE_OVERLAP;
    }

    boundaries[cascade_count - 1].far_clip = shadowed_far;
    boundaries
}

/// Corners of the camera sub-frustum `[boundary.near_clip, boundary.far_clip]`.
///
/// `frustum_corners` is the full camera frustum, near quad first, as
/// returned by `Camera::frustum_corners_world`.
pub fn cascade_corners(
    frustum_corners: &[Vec3; 8],
    camera_near: f32,
    camera_far: f32,
    boundary: &ShadowCascadeBoundary,
) -> [Vec3; 8] {
    let depth = camera_far - camera_near;
    let t_near = (boundary.near_clip - camera_near) / depth;
    let t_far = (boundary.far_clip - camera_near) / depth;

    let mut corners = [Vec3::ZERO; 8];
    for i in 0..4 {
        let (from, to) = (frustum_corners[i], frustum_corners[i + 4]);
        corners[i] = from.lerp(to, t_near);
        corners[i + 4] = from.lerp(to, t_far);
    }
    corners
}

/// Up vector for a light-space view; falls back to +Z when looking along Y
pub fn light_view_up(direction: Vec3) -> Vec3 {
    if direction.normalize_or_zero().y.abs() > 0.999 { Vec3::Z } else { Vec3::Y }
}

/// Move `center` onto the shadow texel grid of a light looking along `direction`.
///
/// Only the light-space x/y coordinates are quantized; depth is kept.
pub fn snap_to_texel_grid(center: Vec3, direction: Vec3, world_units_per_texel: f32) -> Vec3 {
    if world_units_per_texel <= 0.0 {
        return center;
    }

    let light_view = Mat4::look_to_lh(Vec3::ZERO, direction, light_view_up(direction));
    let mut light_space = light_view.transform_point3(center) / world_units_per_texel;
    light_space.x = light_space.x.floor();
    light_space.y = light_space.y.floor();
    light_view.inverse().transform_point3(light_space * world_units_per_texel)
}

/// Stabilized orthographic view-projection of one cascade.
///
/// `shadow_extension` pushes the near plane back toward the light so
/// casters outside the cascade sphere still land in the map.
pub fn cascade_view_projection(
    corners: &[Vec3; 8],
    direction: Vec3,
    shadow_extension: f32,
    shadow_map_size: u32,
    depth: DepthConvention,
) -> Mat4 {
    let sphere = BoundingSphere::from_points_centroid(corners)
        .unwrap_or_else(|| BoundingSphere::new(Vec3::ZERO, 0.0));
    let radius = sphere.radius;
    let world_units_per_texel = radius * 2.0 / shadow_map_size.max(1) as f32;
    let center = snap_to_texel_grid(sphere.center, direction, world_units_per_texel);

    let view = Mat4::look_to_lh(center, direction, light_view_up(direction));
    let (near, far) = depth.adjust_clip_planes(-radius - shadow_extension, radius);
    let projection = Mat4::orthographic_lh(-radius, radius, -radius, radius, near, far);
    projection * view
}

#[cfg(test)]
#[path = "cascade_tests.rs"]
mod tests;
