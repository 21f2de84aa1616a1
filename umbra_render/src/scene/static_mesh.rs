/// Static mesh data consumed by culling and drawing
///
/// Buffers and textures are opaque handles owned by the resource system;
/// the renderer only binds them.

use std::sync::Arc;
use crate::geometry::AABB;
use crate::graphics_device::{Buffer, IndexType, Texture};
use super::Transform;

/// One indexed draw range of a mesh, drawn with one material
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    pub first_index: u32,
    pub index_count: u32,
    pub base_vertex: i32,
    /// Index into the owning instance's material list
    pub material_index: usize,
    /// Local-space bounds of this range
    pub bounds: AABB,
}

#[derive(Clone)]
pub struct StaticMesh {
    pub vertex_buffer: Arc<dyn Buffer>,
    pub vertex_stride: u32,
    pub index_buffer: Arc<dyn Buffer>,
    pub index_type: IndexType,
    /// Local-space bounds of the whole mesh
    pub bounds: AABB,
    pub submeshes: Vec<Submesh>,
}

/// PBR material: optional texture maps and a packed constant buffer
#[derive(Clone)]
pub struct Material {
    pub albedo_map: Option<Arc<dyn Texture>>,
    pub metallic_map: Option<Arc<dyn Texture>>,
    pub roughness_map: Option<Arc<dyn Texture>>,
    pub ao_map: Option<Arc<dyn Texture>>,
    pub normal_map: Option<Arc<dyn Texture>>,
    pub opacity_mask: Option<Arc<dyn Texture>>,
    pub constant_buffer: Arc<dyn Buffer>,
}

/// A registered static mesh component, snapshotted once per frame
#[derive(Clone)]
pub struct StaticMeshInstance {
    pub mesh: Arc<StaticMesh>,
    pub materials: Vec<Arc<Material>>,
    pub transform: Transform,
}

impl StaticMeshInstance {
    /// Material for a submesh; falls back to the last material when the list is short
    pub fn material_for(&self, submesh: &Submesh) -> Option<&Arc<Material>> {
        self.materials.get(submesh.material_index).or_else(|| self.materials.last())
    }
}

/// Sky cube map
#[derive(Clone)]
pub struct Skybox {
    pub cubemap: Arc<dyn Texture>,
}
