/// Per-camera frame orchestration
///
/// Stage order inside one camera:
/// 1. HDR target, per-frame constants, light culling
/// 2. Cascade boundaries, directional then punctual shadow maps
/// 3. Static-mesh culling, per-view constants, depth pre-pass
/// 4. Light buffer upload, forward pass, skybox
/// 5. MSAA resolve, post-process into the final target
///
/// The forward pass reads shadow matrices written by stage 2 and tests
/// against the depth written by stage 3, so the order is fixed.

use std::sync::Arc;
use bytemuck::Zeroable;
use glam::Mat4;

use crate::camera::Camera;
use crate::engine_bail;
use crate::error::Result;
use crate::geometry::Frustum;
use crate::graphics_device::{
    CommandList, DepthConvention, DepthTarget, Texture, TextureFormat, Viewport,
};
use crate::render_target::{RenderTarget, RenderTargetDesc};
use crate::scene::{Light, LightType, Material, StaticMeshInstance};
use crate::shadow::{
    calculate_cascade_boundaries, PunctualShadowView, ShadowAtlas, ShadowCascadeBoundaries,
};
use crate::visibility::{cull_lights, cull_static_meshes, StaticMeshSubmeshIndex};
use super::gpu_buffer::ConstantBufferPool;
use super::renderer::{lock, record_or_discard, FrameResources, Renderer};
use super::renderer_settings::RendererSettings;
use super::shader_types::{
    slots, PerDrawConstants, PerFrameConstants, PerViewConstants, PostProcessConstants, ShaderLight,
};

/// Everything a camera's shadow stage reads, snapshotted once
struct CameraView<'a> {
    camera: &'a Camera,
    aspect: f32,
    depth: DepthConvention,
    view_projection: Mat4,
    lights: &'a [Light],
    meshes: &'a [StaticMeshInstance],
}

impl Renderer {
    /// Draw the scene as seen by `camera` into `target`, or into the back
    /// buffer when `target` is `None`.
    ///
    /// The command list is recorded on the calling thread and executed
    /// before returning.
    ///
    /// # Errors
    ///
    /// Any buffer update, render-target allocation or command recording
    /// failure aborts the camera and is returned as is.
    pub fn draw_camera(&self, camera: &Camera, target: Option<&RenderTarget>) -> Result<()> {
        let settings = self.settings();
        let device = self.device.as_ref();
        let depth = device.depth_convention();

        let target_color = self.target_color_texture(target)?;
        let (width, height) = (target_color.info().width, target_color.info().height);
        let aspect = width as f32 / height.max(1) as f32;

        let lights = self.snapshot_lights();
        let meshes = self.snapshot_static_meshes();
        let skybox = self.first_skybox();
        let view = CameraView {
            camera,
            aspect,
            depth,
            view_projection: camera.view_projection_matrix(aspect, depth),
            lights: &lights,
            meshes: &meshes,
        };

        let mut frame_guard = lock(&self.frame);
        let frame = &mut *frame_guard;
        let shared = self.thread_command_list()?;
        let mut list_guard = lock(shared.as_ref());

        // HDR scene target
        let hdr_desc = RenderTargetDesc {
            width,
            height,
            color_format: Some(TextureFormat::R11G11B10_FLOAT),
            depth_buffer_bit_count: 32,
            stencil_buffer_bit_count: 0,
            sample_count: settings.multisampling_mode().sample_count(),
            enable_unordered_access: false,
            debug_name: "Camera HDR RenderTarget".to_string(),
        };
        let hdr = self.temp_render_targets.get(device, &hdr_desc)?;
        let (Some(hdr_color), Some(hdr_depth)) = (hdr.color_texture(), hdr.depth_stencil_texture()) else {
            engine_bail!("umbra::Renderer", "HDR target is missing an attachment");
        };

        let mut camera_visibility = self.visibility_pool.take();
        let recorded = record_or_discard(&mut **list_guard, |list| {
            list.begin_event("Draw Camera")?;
            list.clear_color(hdr_color, camera.background_color())?;

            cull_lights(&Frustum::from_view_projection(&view.view_projection), &lights, &mut camera_visibility);

            frame.per_frame.update(&PerFrameConstants {
                ambient_light_color: settings.ambient_light_color().to_array(),
                light_count: camera_visibility.light_indices.len() as u32,
                inv_gamma: settings.inv_gamma(),
                directional_shadow_map_size: self.config.directional_shadow_map_size,
                punctual_shadow_atlas_size: self.config.punctual_shadow_atlas_size,
                shadow_filtering_mode: settings.shadow_filtering_mode() as u32,
            })?;

            // Shadows
            let boundaries = calculate_cascade_boundaries(
                camera.near_clip(),
                camera.far_clip(),
                settings.shadow_distance(),
                settings.shadow_cascade_count(),
                settings.normalized_shadow_cascade_splits(),
            );
            list.begin_event("Shadows")?;
            self.draw_directional_shadows(list, frame, &view, &camera_visibility.light_indices, &boundaries)?;
            self.draw_punctual_shadows(list, frame, &view, &camera_visibility.light_indices, &settings)?;
            list.end_event()?;

            cull_static_meshes(&Frustum::from_view_projection(&view.view_projection), &meshes, &mut camera_visibility);

            let camera_constants = camera_view_constants(&view, &boundaries, &settings, frame);
            let camera_view = frame.per_view.acquire(device, &camera_constants)?;
            let full_viewport = Viewport::full(width, height);
            let hdr_depth_target = DepthTarget { texture: hdr_depth, layer: 0 };

            // Depth pre-pass
            list.begin_event("Depth Pre-Pass")?;
            list.clear_depth(hdr_depth, 0, depth.clear_depth())?;
            list.bind_pipeline(&self.pipelines.depth_pre_pass)?;
            list.set_render_targets(None, Some(hdr_depth_target))?;
            list.set_viewport(full_viewport)?;
            list.bind_constant_buffer(slots::PER_FRAME_CB, frame.per_frame.buffer())?;
            list.bind_constant_buffer(slots::PER_VIEW_CB, camera_view.buffer())?;
            self.draw_static_meshes(list, &mut frame.per_draw, &meshes, &camera_visibility.static_mesh_indices, false)?;
            list.end_event()?;

            // Light buffer
            frame.shader_lights.clear();
            frame.shader_lights.extend(camera_visibility.light_indices.iter().map(|&i| shader_light(&lights[i])));
            frame.directional_shadows.set_look_up_info(&mut frame.shader_lights);
            frame.punctual_shadows.set_look_up_info(&mut frame.shader_lights);
            frame.lights.update(device, &frame.shader_lights)?;

            // Forward
            list.begin_event("Forward Pass")?;
            list.bind_pipeline(&self.pipelines.forward)?;
            list.set_render_targets(Some(hdr_color), Some(hdr_depth_target))?;
            list.set_viewport(full_viewport)?;
            list.bind_constant_buffer(slots::PER_FRAME_CB, frame.per_frame.buffer())?;
            list.bind_constant_buffer(slots::PER_VIEW_CB, camera_view.buffer())?;
            list.bind_structured_buffer(slots::LIGHTS, frame.lights.buffer())?;
            list.bind_texture(slots::DIRECTIONAL_SHADOW_MAP_ARRAY, Some(frame.directional_shadows.depth_texture()))?;
            list.bind_texture(slots::PUNCTUAL_SHADOW_ATLAS, Some(frame.punctual_shadows.depth_texture()))?;
            self.draw_static_meshes(list, &mut frame.per_draw, &meshes, &camera_visibility.static_mesh_indices, true)?;
            list.bind_texture(slots::DIRECTIONAL_SHADOW_MAP_ARRAY, None)?;
            list.bind_texture(slots::PUNCTUAL_SHADOW_ATLAS, None)?;
            list.end_event()?;

            if let Some(skybox) = &skybox {
                list.begin_event("Skybox")?;
                list.bind_pipeline(&self.pipelines.skybox)?;
                list.bind_constant_buffer(slots::PER_VIEW_CB, camera_view.buffer())?;
                list.bind_texture(slots::SKYBOX_CUBEMAP, Some(&skybox.cubemap))?;
                list.draw(36, 0)?;
                list.end_event()?;
            }

            // Resolve
            let resolved;
            let post_process_source: &Arc<dyn Texture> = if settings.multisampling_mode().is_enabled() {
                let resolve_desc = RenderTargetDesc {
                    sample_count: 1,
                    debug_name: "Camera HDR Resolve RenderTarget".to_string(),
                    ..hdr_desc.clone()
                };
                resolved = self.temp_render_targets.get(device, &resolve_desc)?;
                let Some(resolved_color) = resolved.color_texture() else {
                    engine_bail!("umbra::Renderer", "Resolve target has no color attachment");
                };
                list.begin_event("Resolve")?;
                list.resolve(resolved_color, hdr_color)?;
                list.end_event()?;
                resolved_color
            } else {
                hdr_color
            };

            // Post-process
            frame.post_process.update(&PostProcessConstants { inv_gamma: settings.inv_gamma(), _padding: [0.0; 3] })?;
            list.begin_event("Post-Process")?;
            list.bind_pipeline(&self.pipelines.post_process)?;
            list.set_render_targets(Some(&target_color), None)?;
            list.set_viewport(full_viewport)?;
            list.bind_constant_buffer(slots::POST_PROCESS_CB, frame.post_process.buffer())?;
            list.bind_texture(slots::POST_PROCESS_SOURCE, Some(post_process_source))?;
            list.draw(3, 0)?;
            list.bind_texture(slots::POST_PROCESS_SOURCE, None)?;
            list.end_event()?;

            list.end_event()?;
            list.close()?;
            self.execute_command_list(list)?;
            Ok(camera_view)
        });
        self.visibility_pool.give_back(camera_visibility);

        frame.last_camera_view = Some(recorded?);
        Ok(())
    }

    /// Draw every registered game camera, in registry order
    pub fn draw_all_cameras(&self, target: Option<&RenderTarget>) -> Result<()> {
        for camera in self.snapshot_game_cameras() {
            self.draw_camera(&camera, target)?;
        }
        Ok(())
    }

    /// Cascades of the first visible shadow-casting directional light
    fn draw_directional_shadows(
        &self,
        list: &mut dyn CommandList,
        frame: &mut FrameResources,
        view: &CameraView<'_>,
        visible_lights: &[usize],
        boundaries: &ShadowCascadeBoundaries,
    ) -> Result<()> {
        frame.directional_shadows.reset();

        let caster = visible_lights.iter().enumerate().find(|&(_, &light_index)| {
            let light = &view.lights[light_index];
            light.light_type() == LightType::Directional && light.casts_shadow()
        });
        let Some((index_index, &light_index)) = caster else {
            return Ok(());
        };

        frame.directional_shadows.update(
            index_index,
            &view.lights[light_index],
            view.camera,
            view.aspect,
            boundaries,
            view.depth,
        );

        list.begin_event("Directional Shadows")?;
        self.draw_shadow_atlas(list, &frame.directional_shadows, &mut frame.per_view, &mut frame.per_draw, view)?;
        list.end_event()
    }

    fn draw_punctual_shadows(
        &self,
        list: &mut dyn CommandList,
        frame: &mut FrameResources,
        view: &CameraView<'_>,
        visible_lights: &[usize],
        settings: &RendererSettings,
    ) -> Result<()> {
        frame.punctual_shadows.update(view.lights, visible_lights, &PunctualShadowView {
            camera_position: view.camera.position(),
            camera_view_projection: view.view_projection,
            shadow_distance: settings.shadow_distance(),
            depth: view.depth,
        });

        list.begin_event("Punctual Shadows")?;
        self.draw_shadow_atlas(list, &frame.punctual_shadows, &mut frame.per_view, &mut frame.per_draw, view)?;
        list.end_event()
    }

    /// Render the static meshes seen by every populated subcell of `atlas`
    fn draw_shadow_atlas(
        &self,
        list: &mut dyn CommandList,
        atlas: &dyn ShadowAtlas,
        per_view: &mut ConstantBufferPool<PerViewConstants>,
        per_draw: &mut ConstantBufferPool<PerDrawConstants>,
        view: &CameraView<'_>,
    ) -> Result<()> {
        let device = self.device.as_ref();
        let texture = atlas.depth_texture();
        let mut bound_layer = None;

        list.bind_pipeline(&self.pipelines.shadow_depth)?;

        for cell_index in 0..atlas.element_count() {
            let layer = atlas.subcell_layer(cell_index);

            for (subcell_index, subcell) in atlas.cell(cell_index).populated() {
                if bound_layer != Some(layer) {
                    list.clear_depth(texture, layer, view.depth.clear_depth())?;
                    list.set_render_targets(None, Some(DepthTarget { texture, layer }))?;
                    bound_layer = Some(layer);
                }
                list.set_viewport(atlas.subcell_viewport(cell_index, subcell_index))?;

                let shadow_view = per_view.acquire(device, &shadow_view_constants(subcell.shadow_view_projection))?;
                list.bind_constant_buffer(slots::PER_VIEW_CB, shadow_view.buffer())?;

                let mut visibility = self.visibility_pool.take();
                cull_static_meshes(
                    &Frustum::from_view_projection(&subcell.shadow_view_projection),
                    view.meshes,
                    &mut visibility,
                );
                let drawn = self.draw_static_meshes(list, per_draw, view.meshes, &visibility.static_mesh_indices, false);
                self.visibility_pool.give_back(visibility);
                drawn?;
            }
        }
        Ok(())
    }

    fn draw_static_meshes(
        &self,
        list: &mut dyn CommandList,
        per_draw: &mut ConstantBufferPool<PerDrawConstants>,
        meshes: &[StaticMeshInstance],
        visible: &[StaticMeshSubmeshIndex],
        bind_materials: bool,
    ) -> Result<()> {
        let device = self.device.as_ref();

        for index in visible {
            let Some(instance) = meshes.get(index.mesh_index) else {
                continue;
            };
            let mesh = &instance.mesh;
            let Some(submesh) = mesh.submeshes.get(index.submesh_index) else {
                continue;
            };

            let draw = per_draw.acquire(device, &PerDrawConstants::from_model(instance.transform.local_to_world()))?;
            list.bind_constant_buffer(slots::PER_DRAW_CB, draw.buffer())?;
            list.bind_vertex_buffer(&mesh.vertex_buffer, mesh.vertex_stride, 0)?;
            list.bind_index_buffer(&mesh.index_buffer, 0, mesh.index_type)?;
            if bind_materials {
                if let Some(material) = instance.material_for(submesh) {
                    bind_material(list, material)?;
                }
            }
            list.draw_indexed(submesh.index_count, submesh.first_index, submesh.base_vertex)?;
        }
        Ok(())
    }
}

fn bind_material(list: &mut dyn CommandList, material: &Material) -> Result<()> {
    list.bind_texture(slots::ALBEDO_MAP, material.albedo_map.as_ref())?;
    list.bind_texture(slots::METALLIC_MAP, material.metallic_map.as_ref())?;
    list.bind_texture(slots::ROUGHNESS_MAP, material.roughness_map.as_ref())?;
    list.bind_texture(slots::AO_MAP, material.ao_map.as_ref())?;
    list.bind_texture(slots::NORMAL_MAP, material.normal_map.as_ref())?;
    list.bind_texture(slots::OPACITY_MASK, material.opacity_mask.as_ref())?;
    list.bind_constant_buffer(slots::MATERIAL_CB, &material.constant_buffer)
}

fn camera_view_constants(
    view: &CameraView<'_>,
    boundaries: &ShadowCascadeBoundaries,
    settings: &RendererSettings,
    frame: &FrameResources,
) -> PerViewConstants {
    let camera = view.camera;
    PerViewConstants {
        view_matrix: camera.view_matrix(),
        projection_matrix: camera.projection_matrix(view.aspect, view.depth),
        view_projection_matrix: view.view_projection,
        shadow_cascade_matrices: frame.directional_shadows.cascade_matrices(),
        shadow_cascade_split_distances: boundaries.map(|boundary| boundary.far_clip),
        camera_position: camera.position().to_array(),
        near_clip: camera.near_clip(),
        far_clip: camera.far_clip(),
        shadow_cascade_count: boundaries.iter().filter(|b| b.is_used()).count() as u32,
        visualize_shadow_cascades: settings.is_visualizing_shadow_cascades() as u32,
        _padding: 0,
    }
}

/// The light-space matrix doubles as view-projection; view is identity
fn shadow_view_constants(shadow_view_projection: Mat4) -> PerViewConstants {
    PerViewConstants {
        view_matrix: Mat4::IDENTITY,
        projection_matrix: shadow_view_projection,
        view_projection_matrix: shadow_view_projection,
        ..PerViewConstants::zeroed()
    }
}

/// Shader-side light without shadow data; the atlases fill that in
fn shader_light(light: &Light) -> ShaderLight {
    ShaderLight {
        color: light.color().to_array(),
        intensity: light.intensity(),
        direction: light.direction().to_array(),
        light_type: light.light_type() as u32,
        position: light.position().to_array(),
        range: light.range(),
        cos_half_inner_angle: (light.inner_angle().to_radians() * 0.5).cos(),
        cos_half_outer_angle: (light.outer_angle().to_radians() * 0.5).cos(),
        depth_bias: light.shadow_depth_bias(),
        normal_bias: light.shadow_normal_bias(),
        ..ShaderLight::zeroed()
    }
}
