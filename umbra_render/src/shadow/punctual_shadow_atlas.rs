/// Coverage-ranked atlas for spot and point light shadows
///
/// The atlas is a 2x2 grid of cells; cell `k` is split into
/// `PUNCTUAL_CELL_SUBDIVISIONS[k]` squared subcells, so tier 0 gets one
/// quarter of the atlas and tier 3 gets 64 small slots. Each frame the
/// shadow views of visible lights are ranked by how much of the screen
/// their volume covers and packed nearest-first.

use std::sync::Arc;
use glam::{Mat4, Quat, Vec2, Vec3};
use crate::engine_bail;
use crate::engine_trace;
use crate::error::Result;
use crate::geometry::AABB;
use crate::graphics_device::{
    DepthConvention, GraphicsDevice, Texture, TextureDesc, TextureFormat, TextureType, TextureUsage,
};
use crate::scene::{Light, LightType};
use crate::visibility::light_world_vertices_spot;
use super::{light_view_up, Cell, GridLayout, ShadowAtlas, Subcell};

pub const PUNCTUAL_TIER_COUNT: usize = 4;
pub const PUNCTUAL_CELL_SUBDIVISIONS: [u32; PUNCTUAL_TIER_COUNT] = [1, 2, 4, 8];

/// Minimum screen coverage of each tier
pub const PUNCTUAL_TIER_THRESHOLDS: [f32; PUNCTUAL_TIER_COUNT] = [1.0, 0.25, 0.0625, 0.015625];

/// Cube faces in shadow-index order: +X, -X, +Y, -Y, +Z, -Z
const POINT_FACE_DIRECTIONS: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y),
    (Vec3::NEG_X, Vec3::Y),
    (Vec3::Y, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::Z),
    (Vec3::Z, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y),
];

/// Rotation taking the +Z face volume onto each cube face
fn point_face_rotation(face: usize) -> Quat {
    use std::f32::consts::{FRAC_PI_2, PI};
    match face {
        0 => Quat::from_rotation_y(FRAC_PI_2),
        1 => Quat::from_rotation_y(-FRAC_PI_2),
        2 => Quat::from_rotation_x(-FRAC_PI_2),
        3 => Quat::from_rotation_x(FRAC_PI_2),
        4 => Quat::IDENTITY,
        _ => Quat::from_rotation_y(PI),
    }
}

/// World-space pyramid of one point light cube face: 4 far corners, then the light position
pub fn point_face_world_vertices(position: Vec3, range: f32, face: usize) -> [Vec3; 5] {
    let rotation = point_face_rotation(face);
    let r = range;
    [
        rotation * Vec3::new(r, r, r) + position,
        rotation * Vec3::new(-r, r, r) + position,
        rotation * Vec3::new(-r, -r, r) + position,
        rotation * Vec3::new(r, -r, r) + position,
        position,
    ]
}

/// Fraction of the screen covered by the projected bounds of `vertices`.
///
/// A camera inside the vertices' bounding box counts as full coverage.
pub fn screen_coverage(vertices: &[Vec3], camera_position: Vec3, camera_view_projection: &Mat4) -> f32 {
    let Some(bounds) = AABB::from_vertices(vertices) else {
        return 0.0;
    };
    if bounds.contains_point(camera_position) {
        return 1.0;
    }

    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for vertex in vertices {
        let projected = camera_view_projection.project_point3(*vertex).truncate();
        min = min.min(projected);
        max = max.max(projected);
    }

    let min = min.clamp(Vec2::NEG_ONE, Vec2::ONE);
    let max = max.clamp(Vec2::NEG_ONE, Vec2::ONE);
    let extent = max - min;
    extent.x * extent.y / 4.0
}

/// Tier for a screen coverage; `None` below the smallest threshold
pub fn coverage_tier(coverage: f32) -> Option<usize> {
    PUNCTUAL_TIER_THRESHOLDS.iter().position(|&threshold| coverage >= threshold)
}

#[derive(Debug, Clone, Copy)]
struct ShadowCandidate {
    visible_light_index_index: usize,
    shadow_map_index: usize,
    distance_to_camera: f32,
}

/// Camera state the atlas packing depends on
#[derive(Debug, Clone, Copy)]
pub struct PunctualShadowView {
    pub camera_position: Vec3,
    pub camera_view_projection: Mat4,
    pub shadow_distance: f32,
    pub depth: DepthConvention,
}

pub struct PunctualShadowAtlas {
    size: u32,
    texture: Arc<dyn Texture>,
    layout: GridLayout,
    cells: Vec<Cell>,
    tiers: [Vec<ShadowCandidate>; PUNCTUAL_TIER_COUNT],
}

impl PunctualShadowAtlas {
    pub fn new(device: &dyn GraphicsDevice, size: u32) -> Result<Self> {
        if !size.is_power_of_two() {
            engine_bail!(
                "umbra::PunctualShadowAtlas",
                "Shadow atlas size must be a power of two (got {})",
                size
            );
        }

        let texture = device.create_texture(TextureDesc {
            width: size,
            height: size,
            format: TextureFormat::D32_FLOAT,
            usage: TextureUsage::DEPTH_STENCIL | TextureUsage::SAMPLED,
            texture_type: TextureType::Tex2D,
            array_layers: 1,
            sample_count: 1,
            debug_name: "Punctual Shadow Atlas".to_string(),
        })?;

        Ok(Self {
            size,
            texture,
            layout: GridLayout::new(2),
            cells: PUNCTUAL_CELL_SUBDIVISIONS.iter().map(|&s| Cell::new(s)).collect(),
            tiers: Default::default(),
        })
    }

    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset);
    }

    /// Rank and pack the shadow views of `visible_light_indices` for one camera.
    ///
    /// Subcells reference lights by their position in `visible_light_indices`.
    pub fn update(&mut self, lights: &[Light], visible_light_indices: &[usize], view: &PunctualShadowView) {
        self.tiers.iter_mut().for_each(Vec::clear);

        for (index_index, &light_index) in visible_light_indices.iter().enumerate() {
            let Some(light) = lights.get(light_index) else {
                continue;
            };
            if !light.casts_shadow() || light.light_type() == LightType::Directional {
                continue;
            }
            if Self::beyond_shadow_distance(light, view) {
                continue;
            }

            let distance_to_camera = light.position().distance(view.camera_position);
            let mut push = |shadow_map_index: usize, vertices: &[Vec3]| {
                let coverage = screen_coverage(vertices, view.camera_position, &view.camera_view_projection);
                if let Some(tier) = coverage_tier(coverage) {
                    self.tiers[tier].push(ShadowCandidate {
                        visible_light_index_index: index_index,
                        shadow_map_index,
                        distance_to_camera,
                    });
                }
            };

            match light.light_type() {
                LightType::Spot => push(0, &light_world_vertices_spot(light)),
                LightType::Point => {
                    for face in 0..POINT_FACE_DIRECTIONS.len() {
                        push(face, &point_face_world_vertices(light.position(), light.range(), face));
                    }
                }
                LightType::Directional => {}
            }
        }

        for tier in 0..PUNCTUAL_TIER_COUNT {
            let mut candidates = std::mem::take(&mut self.tiers[tier]);
            candidates.sort_by(|a, b| b.distance_to_camera.total_cmp(&a.distance_to_camera));

            let cell = &mut self.cells[tier];
            for subcell_index in 0..cell.element_count() {
                let subcell = candidates.pop().and_then(|candidate| {
                    let light = lights.get(*visible_light_indices.get(candidate.visible_light_index_index)?)?;
                    Some(Subcell {
                        shadow_view_projection: Self::shadow_view_projection(
                            light,
                            candidate.shadow_map_index,
                            view.depth,
                        ),
                        visible_light_index_index: candidate.visible_light_index_index,
                        shadow_map_index: candidate.shadow_map_index,
                    })
                });
                cell.set_subcell(subcell_index, subcell);
            }

            if tier + 1 < PUNCTUAL_TIER_COUNT {
                self.tiers[tier + 1].append(&mut candidates);
            } else if !candidates.is_empty() {
                engine_trace!(
                    "umbra::PunctualShadowAtlas",
                    "No atlas slot left for {} punctual shadow view(s)",
                    candidates.len()
                );
            }

            candidates.clear();
            self.tiers[tier] = candidates;
        }
    }

    /// Bounding volume pulled one range toward the camera is still past the shadow distance
    fn beyond_shadow_distance(light: &Light, view: &PunctualShadowView) -> bool {
        let position = light.position();
        let toward_light = (position - view.camera_position).normalize_or_zero();
        (position - toward_light * light.range()).distance(view.camera_position) > view.shadow_distance
    }

    /// Light-space view-projection of one shadow view of a spot or point light
    pub fn shadow_view_projection(light: &Light, shadow_map_index: usize, depth: DepthConvention) -> Mat4 {
        let position = light.position();
        let (near, far) = depth.adjust_clip_planes(light.shadow_near_plane(), light.range());

        match light.light_type() {
            LightType::Point => {
                let (direction, up) = POINT_FACE_DIRECTIONS[shadow_map_index.min(POINT_FACE_DIRECTIONS.len() - 1)];
                let projection = Mat4::perspective_lh(std::f32::consts::FRAC_PI_2, 1.0, near, far);
                projection * Mat4::look_to_lh(position, direction, up)
            }
            _ => {
                let direction = light.direction();
                let projection = Mat4::perspective_lh(light.outer_angle().to_radians(), 1.0, near, far);
                projection * Mat4::look_to_lh(position, direction, light_view_up(direction))
            }
        }
    }
}

impl ShadowAtlas for PunctualShadowAtlas {
    fn size(&self) -> u32 {
        self.size
    }

    fn element_count(&self) -> usize {
        self.layout.element_count()
    }

    fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    fn normalized_element_offset(&self, index: usize) -> Vec2 {
        self.layout.normalized_element_offset(index)
    }

    fn normalized_element_size(&self) -> f32 {
        self.layout.normalized_element_size()
    }

    fn depth_texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }
}

#[cfg(test)]
#[path = "punctual_shadow_atlas_tests.rs"]
mod tests;
