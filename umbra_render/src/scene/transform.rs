/// World transform of a scene object, as provided by the scene graph
///
/// Left-handed, +Z forward, +Y up, +X right.

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation, scale: Vec3::ONE }
    }

    /// Transform placed at `position` with its forward axis along `direction`.
    ///
    /// `up_hint` picks the roll; it must not be parallel to `direction`.
    pub fn looking_to(position: Vec3, direction: Vec3, up_hint: Vec3) -> Self {
        let forward = direction.normalize();
        let right = up_hint.cross(forward).normalize();
        let up = forward.cross(right);
        let rotation = Quat::from_mat3(&glam::Mat3::from_cols(right, up, forward));
        Self::from_position_rotation(position, rotation)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Model matrix (scale, then rotation, then translation)
    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Model matrix with scale normalized out
    pub fn local_to_world_without_scale(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    pub fn world_to_local(&self) -> Mat4 {
        self.local_to_world().inverse()
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
