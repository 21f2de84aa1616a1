/// Visibility culling of lights and static-mesh submeshes against a frustum

pub mod visibility;
pub mod culling;

pub use visibility::{Visibility, StaticMeshSubmeshIndex, VisibilityPool};
pub use culling::{cull_lights, cull_static_meshes, light_world_vertices_spot};
