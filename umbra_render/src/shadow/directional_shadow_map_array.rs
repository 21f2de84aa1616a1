/// Depth texture array holding one full-resolution slice per cascade

use std::sync::Arc;
use glam::{Mat4, Vec2};
use crate::camera::Camera;
use crate::engine_bail;
use crate::error::Result;
use crate::scene::Light;
use crate::graphics_device::{
    DepthConvention, GraphicsDevice, Texture, TextureDesc, TextureFormat, TextureType, TextureUsage,
};
use super::{
    cascade_corners, cascade_view_projection, Cell, ShadowAtlas, ShadowCascadeBoundaries, Subcell,
    MAX_CASCADE_COUNT,
};

/// Cascade shadow maps of the single shadow-casting directional light.
///
/// Every cell is one array layer with a single subcell covering it, so the
/// normalized offset is always zero and the size always one.
pub struct DirectionalShadowMapArray {
    size: u32,
    texture: Arc<dyn Texture>,
    cells: Vec<Cell>,
}

impl DirectionalShadowMapArray {
    pub fn new(device: &dyn GraphicsDevice, size: u32) -> Result<Self> {
        if !size.is_power_of_two() {
            engine_bail!(
                "umbra::DirectionalShadowMapArray",
                "Shadow map size must be a power of two (got {})",
                size
            );
        }

        let texture = device.create_texture(TextureDesc {
            width: size,
            height: size,
            format: TextureFormat::D32_FLOAT,
            usage: TextureUsage::DEPTH_STENCIL | TextureUsage::SAMPLED,
            texture_type: TextureType::Tex2D,
            array_layers: MAX_CASCADE_COUNT as u32,
            sample_count: 1,
            debug_name: "Directional Shadow Map Array".to_string(),
        })?;

        Ok(Self {
            size,
            texture,
            cells: (0..MAX_CASCADE_COUNT).map(|_| Cell::new(1)).collect(),
        })
    }

    /// Drop every cascade of the previous camera
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset);
    }

    /// Compute the stabilized cascades of `light` for one camera.
    ///
    /// Unused boundaries leave their cell empty.
    pub fn update(
        &mut self,
        visible_light_index_index: usize,
        light: &Light,
        camera: &Camera,
        aspect: f32,
        boundaries: &ShadowCascadeBoundaries,
        depth: DepthConvention,
    ) {
        self.reset();

        let frustum_corners = camera.frustum_corners_world(aspect);
        let (near, far) = (camera.near_clip(), camera.far_clip());

        for (cascade, boundary) in boundaries.iter().enumerate().filter(|(_, b)| b.is_used()) {
            let corners = cascade_corners(&frustum_corners, near, far, boundary);
            let shadow_view_projection = cascade_view_projection(
                &corners,
                light.direction(),
                light.shadow_extension(),
                self.size,
                depth,
            );

            self.cells[cascade].set_subcell(0, Some(Subcell {
                shadow_view_projection,
                visible_light_index_index,
                shadow_map_index: cascade,
            }));
        }
    }

    /// View-projection of every cascade; identity where no cascade was computed
    pub fn cascade_matrices(&self) -> [Mat4; MAX_CASCADE_COUNT] {
        let mut matrices = [Mat4::IDENTITY; MAX_CASCADE_COUNT];
        for (matrix, cell) in matrices.iter_mut().zip(&self.cells) {
            if let Some(subcell) = cell.subcell(0) {
                *matrix = subcell.shadow_view_projection;
            }
        }
        matrices
    }
}

impl ShadowAtlas for DirectionalShadowMapArray {
    fn size(&self) -> u32 {
        self.size
    }

    fn element_count(&self) -> usize {
        self.cells.len()
    }

    fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    fn normalized_element_offset(&self, _index: usize) -> Vec2 {
        Vec2::ZERO
    }

    fn normalized_element_size(&self) -> f32 {
        1.0
    }

    fn depth_texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }

    fn subcell_layer(&self, cell_index: usize) -> u32 {
        cell_index as u32
    }
}

#[cfg(test)]
#[path = "directional_shadow_map_array_tests.rs"]
mod tests;
