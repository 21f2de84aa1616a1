/// Light and static-mesh culling
///
/// Both functions are pure over the snapshot slices: they clear their
/// output list, then append in input order. No allocation happens once the
/// output vectors have grown.

use glam::Vec3;
use crate::geometry::{AABB, BoundingSphere, Frustum};
use crate::scene::{Light, LightType, StaticMeshInstance};
use super::{StaticMeshSubmeshIndex, Visibility};

/// Fill `visibility.light_indices` with the lights touching `frustum`.
///
/// Directional lights are unbounded and always kept. Spot lights are tested
/// with the world box of their cone, point lights with their range sphere.
pub fn cull_lights(frustum: &Frustum, lights: &[Light], visibility: &mut Visibility) {
    visibility.light_indices.clear();

    for (index, light) in lights.iter().enumerate() {
        let visible = match light.light_type() {
            LightType::Directional => true,
            LightType::Spot => {
                let vertices = light_world_vertices_spot(light);
                AABB::from_vertices(&vertices)
                    .is_some_and(|bounds| frustum.intersects_aabb(&bounds))
            }
            LightType::Point => {
                frustum.intersects_sphere(&BoundingSphere::new(light.position(), light.range()))
            }
        };

        if visible {
            visibility.light_indices.push(index);
        }
    }
}

/// Spot cone vertices moved to world space (scale ignored)
pub fn light_world_vertices_spot(light: &Light) -> [Vec3; 5] {
    let model = light.transform().local_to_world_without_scale();
    light.spot_local_vertices().map(|v| model.transform_point3(v))
}

/// Fill `visibility.static_mesh_indices` with the visible submeshes.
///
/// A component is first tested with its whole-mesh bounds; only if that
/// passes are its submeshes tested individually.
pub fn cull_static_meshes(frustum: &Frustum, meshes: &[StaticMeshInstance], visibility: &mut Visibility) {
    visibility.static_mesh_indices.clear();

    for (mesh_index, instance) in meshes.iter().enumerate() {
        let model = instance.transform.local_to_world();

        if !frustum.intersects_aabb(&instance.mesh.bounds.transform(&model)) {
            continue;
        }

        for (submesh_index, submesh) in instance.mesh.submeshes.iter().enumerate() {
            if frustum.intersects_aabb(&submesh.bounds.transform(&model)) {
                visibility
                    .static_mesh_indices
                    .push(StaticMeshSubmeshIndex { mesh_index, submesh_index });
            }
        }
    }
}

#[cfg(test)]
#[path = "culling_tests.rs"]
mod tests;
