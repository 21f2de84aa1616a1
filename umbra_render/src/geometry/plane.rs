/// Plane `a*x + b*y + c*z + d = 0`
///
/// After [`Plane::normalize`] the normal `(a, b, c)` has unit length and
/// [`Plane::distance_to_point`] returns a true signed distance, positive on
/// the side the normal points to.

use glam::{Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    pub fn from_vec4(v: Vec4) -> Self {
        Self { a: v.x, b: v.y, c: v.z, d: v.w }
    }

    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.a, self.b, self.c, self.d)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }

    /// Scale so the normal is unit length. Degenerate planes are left as-is.
    pub fn normalize(&mut self) {
        let len = self.normal().length();
        if len > 0.0 {
            let inv = 1.0 / len;
            self.a *= inv;
            self.b *= inv;
            self.c *= inv;
            self.d *= inv;
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal().dot(point) + self.d
    }
}
