/// Shadow atlas contract shared by the directional map array and the punctual atlas
///
/// An atlas is a depth texture split into cells; each cell is split again
/// into subcells. A populated subcell holds one light-space view-projection
/// and remembers which visible light (and which of its shadow views) it
/// belongs to.

use std::sync::Arc;
use glam::{Mat4, Vec2};
use crate::graphics_device::{Texture, Viewport};
use crate::renderer::shader_types::{ShaderLight, MAX_PER_LIGHT_SHADOW_MAP_COUNT};
use super::GridLayout;

/// One shadow view rendered into the atlas this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subcell {
    pub shadow_view_projection: Mat4,
    /// Index into the camera's visible-light list (not the registry)
    pub visible_light_index_index: usize,
    /// 0 for spot lights, the cube face for point lights, the cascade for directional lights
    pub shadow_map_index: usize,
}

#[derive(Debug, Clone)]
pub struct Cell {
    layout: GridLayout,
    subcells: Vec<Option<Subcell>>,
}

impl Cell {
    pub fn new(subdivision: u32) -> Self {
        let layout = GridLayout::new(subdivision);
        Self { layout, subcells: vec![None; layout.element_count()] }
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn element_count(&self) -> usize {
        self.subcells.len()
    }

    pub fn subcell(&self, index: usize) -> Option<&Subcell> {
        self.subcells.get(index).and_then(Option::as_ref)
    }

    /// Out-of-range indices are ignored
    pub fn set_subcell(&mut self, index: usize, subcell: Option<Subcell>) {
        if let Some(slot) = self.subcells.get_mut(index) {
            *slot = subcell;
        }
    }

    pub fn reset(&mut self) {
        self.subcells.iter_mut().for_each(|s| *s = None);
    }

    /// Populated subcells with their index
    pub fn populated(&self) -> impl Iterator<Item = (usize, &Subcell)> {
        self.subcells
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }
}

pub trait ShadowAtlas {
    /// Texel size of one side of the depth texture
    fn size(&self) -> u32;

    fn element_count(&self) -> usize;

    fn cell(&self, index: usize) -> &Cell;

    fn normalized_element_offset(&self, index: usize) -> Vec2;

    fn normalized_element_size(&self) -> f32;

    fn depth_texture(&self) -> &Arc<dyn Texture>;

    /// Depth array layer a cell renders into
    fn subcell_layer(&self, _cell_index: usize) -> u32 {
        0
    }

    /// Normalized top-left corner of a subcell inside the whole atlas
    fn subcell_normalized_offset(&self, cell_index: usize, subcell_index: usize) -> Vec2 {
        let cell = self.cell(cell_index);
        self.normalized_element_offset(cell_index)
            + cell.layout().normalized_element_offset(subcell_index) * self.normalized_element_size()
    }

    /// Normalized side length of every subcell of a cell
    fn subcell_normalized_size(&self, cell_index: usize) -> f32 {
        self.normalized_element_size() * self.cell(cell_index).layout().normalized_element_size()
    }

    fn subcell_viewport(&self, cell_index: usize, subcell_index: usize) -> Viewport {
        let size = self.size() as f32;
        let offset = self.subcell_normalized_offset(cell_index, subcell_index) * size;
        let extent = self.subcell_normalized_size(cell_index) * size;
        Viewport::new(offset.x, offset.y, extent, extent)
    }

    /// Write shadow matrices and atlas placement of every populated subcell
    /// into the light it belongs to.
    ///
    /// `shader_lights` is indexed like the camera's visible-light list.
    fn set_look_up_info(&self, shader_lights: &mut [ShaderLight]) {
        for cell_index in 0..self.element_count() {
            for (subcell_index, subcell) in self.cell(cell_index).populated() {
                let Some(light) = shader_lights.get_mut(subcell.visible_light_index_index) else {
                    continue;
                };
                let shadow_index = subcell.shadow_map_index;
                if shadow_index >= MAX_PER_LIGHT_SHADOW_MAP_COUNT {
                    continue;
                }

                light.is_casting_shadow = 1;
                light.sample_shadow_map[shadow_index] = 1;
                light.shadow_view_projection_matrices[shadow_index] = subcell.shadow_view_projection;
                light.shadow_atlas_offsets[shadow_index] =
                    self.subcell_normalized_offset(cell_index, subcell_index);
                light.shadow_atlas_sizes[shadow_index] = self.subcell_normalized_size(cell_index);
            }
        }
    }
}
