/// Geometry primitives used for visibility and shadow culling

pub mod aabb;
pub mod bounding_sphere;
pub mod plane;
pub mod frustum;

pub use aabb::AABB;
pub use bounding_sphere::BoundingSphere;
pub use plane::Plane;
pub use frustum::*;
