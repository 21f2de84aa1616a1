/// Scene-side data the renderer consumes: transforms, lights, meshes, skyboxes

pub mod transform;
pub mod light;
pub mod static_mesh;
pub mod component;

pub use transform::Transform;
pub use light::{Light, LightType, MIN_SHADOW_NEAR_PLANE, MAX_ANGLE_DEGREES};
pub use static_mesh::{Material, Skybox, StaticMesh, StaticMeshInstance, Submesh};
pub use component::ComponentSource;
