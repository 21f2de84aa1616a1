/// Camera: projection parameters plus a world transform
///
/// Matrices are derived on demand for a given aspect ratio and depth
/// convention, so one camera can render into targets of any size.

use glam::{Mat4, Vec3};
use crate::geometry::Frustum;
use crate::graphics_device::DepthConvention;
use crate::scene::Transform;

pub const MIN_NEAR_CLIP: f32 = 0.03;
pub const MIN_NEAR_FAR_GAP: f32 = 0.1;

/// Projection kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective with a horizontal field of view in degrees
    Perspective { horizontal_fov_degrees: f32 },
    /// Orthographic with a horizontal extent in world units
    Orthographic { horizontal_size: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    projection: Projection,
    near_clip: f32,
    far_clip: f32,
    transform: Transform,
    background_color: [f32; 4],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective { horizontal_fov_degrees: 90.0 },
            near_clip: 0.1,
            far_clip: 100.0,
            transform: Transform::default(),
            background_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Camera {
    pub fn new(projection: Projection, near_clip: f32, far_clip: f32, transform: Transform) -> Self {
        let mut camera = Self { projection, transform, ..Default::default() };
        camera.set_near_clip(near_clip);
        camera.set_far_clip(far_clip);
        camera
    }

    // ===== GETTERS =====

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn background_color(&self) -> [f32; 4] {
        self.background_color
    }

    // ===== SETTERS =====

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Clamped to at least `MIN_NEAR_CLIP`; pushes the far plane out if needed
    pub fn set_near_clip(&mut self, near: f32) {
        self.near_clip = near.max(MIN_NEAR_CLIP);
        self.far_clip = self.far_clip.max(self.near_clip + MIN_NEAR_FAR_GAP);
    }

    /// Clamped to stay `MIN_NEAR_FAR_GAP` beyond the near plane
    pub fn set_far_clip(&mut self, far: f32) {
        self.far_clip = far.max(self.near_clip + MIN_NEAR_FAR_GAP);
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn set_background_color(&mut self, color: [f32; 4]) {
        self.background_color = color;
    }

    // ===== DERIVED =====

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.transform.position, self.transform.forward(), self.transform.up())
    }

    /// Projection for a target of the given aspect ratio (width / height)
    pub fn projection_matrix(&self, aspect: f32, depth: DepthConvention) -> Mat4 {
        let (near, far) = depth.adjust_clip_planes(self.near_clip, self.far_clip);
        match self.projection {
            Projection::Perspective { horizontal_fov_degrees } => {
                Mat4::perspective_lh(vertical_fov(horizontal_fov_degrees, aspect), aspect, near, far)
            }
            Projection::Orthographic { horizontal_size } => {
                let half_w = horizontal_size * 0.5;
                let half_h = half_w / aspect;
                Mat4::orthographic_lh(-half_w, half_w, -half_h, half_h, near, far)
            }
        }
    }

    pub fn view_projection_matrix(&self, aspect: f32, depth: DepthConvention) -> Mat4 {
        self.projection_matrix(aspect, depth) * self.view_matrix()
    }

    pub fn frustum(&self, aspect: f32, depth: DepthConvention) -> Frustum {
        Frustum::from_view_projection(&self.view_projection_matrix(aspect, depth))
    }

    /// World-space frustum corners: near quad then far quad, each
    /// counter-clockwise starting at top-right.
    pub fn frustum_corners_world(&self, aspect: f32) -> [Vec3; 8] {
        let (near_x, far_x) = match self.projection {
            Projection::Perspective { horizontal_fov_degrees } => {
                let t = (horizontal_fov_degrees.to_radians() * 0.5).tan();
                (self.near_clip * t, self.far_clip * t)
            }
            Projection::Orthographic { horizontal_size } => {
                (horizontal_size * 0.5, horizontal_size * 0.5)
            }
        };
        let (near_y, far_y) = (near_x / aspect, far_x / aspect);

        let t = &self.transform;
        let (p, right, up, forward) = (t.position, t.right(), t.up(), t.forward());
        let corner = |x: f32, y: f32, z: f32| p + right * x + up * y + forward * z;

        [
            corner(near_x, near_y, self.near_clip),
            corner(-near_x, near_y, self.near_clip),
            corner(-near_x, -near_y, self.near_clip),
            corner(near_x, -near_y, self.near_clip),
            corner(far_x, far_y, self.far_clip),
            corner(-far_x, far_y, self.far_clip),
            corner(-far_x, -far_y, self.far_clip),
            corner(far_x, -far_y, self.far_clip),
        ]
    }
}

/// Vertical FOV (radians) matching a horizontal FOV (degrees) at an aspect ratio
pub fn vertical_fov(horizontal_fov_degrees: f32, aspect: f32) -> f32 {
    2.0 * ((horizontal_fov_degrees.to_radians() * 0.5).tan() / aspect).atan()
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
