/// Light component data, as read by the renderer each frame
///
/// Setters clamp out-of-range input instead of failing.

use glam::Vec3;
use super::Transform;

pub const MIN_SHADOW_NEAR_PLANE: f32 = 0.1;
pub const MAX_ANGLE_DEGREES: f32 = 179.0;

/// Light type (values match the shader-side encoding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LightType {
    Directional = 0,
    Spot = 1,
    Point = 2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    light_type: LightType,
    color: Vec3,
    intensity: f32,
    range: f32,
    inner_angle: f32,
    outer_angle: f32,
    casts_shadow: bool,
    shadow_near_plane: f32,
    shadow_depth_bias: f32,
    shadow_normal_bias: f32,
    shadow_extension: f32,
    transform: Transform,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::Directional,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 10.0,
            inner_angle: 30.0,
            outer_angle: 30.0,
            casts_shadow: false,
            shadow_near_plane: MIN_SHADOW_NEAR_PLANE,
            shadow_depth_bias: 0.0,
            shadow_normal_bias: 0.0,
            shadow_extension: 0.0,
            transform: Transform::default(),
        }
    }
}

impl Light {
    pub fn new(light_type: LightType, transform: Transform) -> Self {
        Self { light_type, transform, ..Default::default() }
    }

    pub fn directional(transform: Transform) -> Self {
        Self::new(LightType::Directional, transform)
    }

    pub fn spot(transform: Transform, range: f32, outer_angle: f32) -> Self {
        let mut light = Self::new(LightType::Spot, transform);
        light.set_range(range);
        light.set_outer_angle(outer_angle);
        light
    }

    pub fn point(transform: Transform, range: f32) -> Self {
        let mut light = Self::new(LightType::Point, transform);
        light.set_range(range);
        light
    }

    // ===== GETTERS =====

    pub fn light_type(&self) -> LightType {
        self.light_type
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    /// Inner cone angle in degrees (full angle)
    pub fn inner_angle(&self) -> f32 {
        self.inner_angle
    }

    /// Outer cone angle in degrees (full angle)
    pub fn outer_angle(&self) -> f32 {
        self.outer_angle
    }

    pub fn casts_shadow(&self) -> bool {
        self.casts_shadow
    }

    pub fn shadow_near_plane(&self) -> f32 {
        self.shadow_near_plane
    }

    pub fn shadow_depth_bias(&self) -> f32 {
        self.shadow_depth_bias
    }

    pub fn shadow_normal_bias(&self) -> f32 {
        self.shadow_normal_bias
    }

    /// Extra distance behind a directional cascade's near plane
    pub fn shadow_extension(&self) -> f32 {
        self.shadow_extension
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn direction(&self) -> Vec3 {
        self.transform.forward()
    }

    // ===== SETTERS =====

    pub fn set_light_type(&mut self, light_type: LightType) {
        self.light_type = light_type;
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.color = color.clamp(Vec3::ZERO, Vec3::ONE);
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    pub fn set_range(&mut self, range: f32) {
        self.range = range.max(0.0);
    }

    /// Clamped to `[0, outer_angle]`
    pub fn set_inner_angle(&mut self, degrees: f32) {
        self.inner_angle = degrees.clamp(0.0, self.outer_angle);
    }

    /// Clamped to `[inner_angle, 179]`
    pub fn set_outer_angle(&mut self, degrees: f32) {
        self.outer_angle = degrees.clamp(self.inner_angle, MAX_ANGLE_DEGREES);
    }

    pub fn set_casts_shadow(&mut self, casts_shadow: bool) {
        self.casts_shadow = casts_shadow;
    }

    pub fn set_shadow_near_plane(&mut self, near: f32) {
        self.shadow_near_plane = near.max(MIN_SHADOW_NEAR_PLANE);
    }

    pub fn set_shadow_depth_bias(&mut self, bias: f32) {
        self.shadow_depth_bias = bias.max(0.0);
    }

    pub fn set_shadow_normal_bias(&mut self, bias: f32) {
        self.shadow_normal_bias = bias.max(0.0);
    }

    pub fn set_shadow_extension(&mut self, extension: f32) {
        self.shadow_extension = extension.max(0.0);
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Spot cone in light space: the 4 base corners at `z = range`, then the apex.
    ///
    /// The base half-width is `tan(outer_angle / 2) * range`.
    pub fn spot_local_vertices(&self) -> [Vec3; 5] {
        let range = self.range;
        let r = (self.outer_angle.to_radians() * 0.5).tan() * range;
        [
            Vec3::new(-r, -r, range),
            Vec3::new(r, -r, range),
            Vec3::new(r, r, range),
            Vec3::new(-r, r, range),
            Vec3::ZERO,
        ]
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
