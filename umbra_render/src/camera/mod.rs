/// Camera module

pub mod camera;

pub use camera::{Camera, Projection, vertical_fov, MIN_NEAR_CLIP, MIN_NEAR_FAR_GAP};
