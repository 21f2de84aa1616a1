/// GPU-visible constant and structured-buffer layouts
///
/// Field order keeps every struct free of implicit padding so they can be
/// `Pod` and uploaded with `bytemuck::bytes_of` / `cast_slice`.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use crate::shadow::MAX_CASCADE_COUNT;

/// Shadow views per light: 6 cube faces for point lights, 1 for spot lights
pub const MAX_PER_LIGHT_SHADOW_MAP_COUNT: usize = 6;

/// Constant buffer slots
pub mod slots {
    pub const PER_FRAME_CB: u32 = 0;
    pub const PER_VIEW_CB: u32 = 1;
    pub const PER_DRAW_CB: u32 = 2;
    pub const MATERIAL_CB: u32 = 3;
    pub const POST_PROCESS_CB: u32 = 4;

    pub const ALBEDO_MAP: u32 = 0;
    pub const METALLIC_MAP: u32 = 1;
    pub const ROUGHNESS_MAP: u32 = 2;
    pub const AO_MAP: u32 = 3;
    pub const NORMAL_MAP: u32 = 4;
    pub const OPACITY_MASK: u32 = 5;
    pub const LIGHTS: u32 = 6;
    pub const DIRECTIONAL_SHADOW_MAP_ARRAY: u32 = 7;
    pub const PUNCTUAL_SHADOW_ATLAS: u32 = 8;
    pub const SKYBOX_CUBEMAP: u32 = 9;
    pub const POST_PROCESS_SOURCE: u32 = 10;
    pub const GIZMO_COLORS: u32 = 11;
    pub const GIZMO_LINES: u32 = 12;
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PerFrameConstants {
    pub ambient_light_color: [f32; 3],
    pub light_count: u32,
    pub inv_gamma: f32,
    pub directional_shadow_map_size: u32,
    pub punctual_shadow_atlas_size: u32,
    pub shadow_filtering_mode: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PerViewConstants {
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    pub view_projection_matrix: Mat4,
    pub shadow_cascade_matrices: [Mat4; MAX_CASCADE_COUNT],
    /// Far clip of each cascade, in view depth
    pub shadow_cascade_split_distances: [f32; MAX_CASCADE_COUNT],
    pub camera_position: [f32; 3],
    pub near_clip: f32,
    pub far_clip: f32,
    pub shadow_cascade_count: u32,
    pub visualize_shadow_cascades: u32,
    pub _padding: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PerDrawConstants {
    pub model_matrix: Mat4,
    /// Inverse transpose of the model matrix
    pub normal_matrix: Mat4,
}

impl PerDrawConstants {
    pub fn from_model(model_matrix: Mat4) -> Self {
        Self { model_matrix, normal_matrix: model_matrix.inverse().transpose() }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PostProcessConstants {
    pub inv_gamma: f32,
    pub _padding: [f32; 3],
}

/// One entry of the structured light buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ShaderLight {
    pub shadow_view_projection_matrices: [Mat4; MAX_PER_LIGHT_SHADOW_MAP_COUNT],
    pub color: [f32; 3],
    pub intensity: f32,
    pub direction: [f32; 3],
    pub light_type: u32,
    pub position: [f32; 3],
    pub range: f32,
    /// Normalized atlas offset of each shadow view
    pub shadow_atlas_offsets: [Vec2; MAX_PER_LIGHT_SHADOW_MAP_COUNT],
    /// Normalized atlas size of each shadow view
    pub shadow_atlas_sizes: [f32; MAX_PER_LIGHT_SHADOW_MAP_COUNT],
    pub sample_shadow_map: [u32; MAX_PER_LIGHT_SHADOW_MAP_COUNT],
    pub cos_half_inner_angle: f32,
    pub cos_half_outer_angle: f32,
    pub depth_bias: f32,
    pub normal_bias: f32,
    pub is_casting_shadow: u32,
    pub _padding: [u32; 3],
}

/// One queued gizmo line; `color_index` points into the color buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineGizmoVertexData {
    pub from: [f32; 3],
    pub color_index: u32,
    pub to: [f32; 3],
    pub _padding: u32,
}
