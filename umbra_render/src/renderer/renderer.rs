/// Renderer - the rendering context the host creates once and passes around
///
/// Owns the component registries, the shadow atlases, the temporary
/// render-target cache and the per-thread command lists. Frame
/// orchestration lives in `renderer_frame.rs`.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::thread::{self, ThreadId};
use glam::{Vec3, Vec4};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::graphics_device::{
    CommandList, CompareOp, CullMode, DepthState, GraphicsDevice, Pipeline, PipelineDesc,
    PipelineKind, PrimitiveTopology, Texture, Viewport,
};
use crate::render_target::{RenderTarget, TemporaryRenderTargetCache};
use crate::scene::{ComponentSource, Light, Skybox, StaticMeshInstance};
use crate::shadow::{DirectionalShadowMapArray, PunctualShadowAtlas};
use crate::visibility::VisibilityPool;
use crate::{engine_err, engine_error, engine_info};
use super::gizmo_queue::GizmoQueue;
use super::gpu_buffer::{ConstantBuffer, ConstantBufferPool, StructuredBuffer};
use super::renderer_settings::{RendererConfig, RendererSettings};
use super::shader_types::{
    slots, LineGizmoVertexData, PerDrawConstants, PerFrameConstants, PerViewConstants,
    PostProcessConstants, ShaderLight,
};

new_key_type! {
    /// Handle of a registered static mesh
    pub struct StaticMeshKey;
    /// Handle of a registered light
    pub struct LightKey;
    /// Handle of a registered skybox
    pub struct SkyboxKey;
    /// Handle of a registered game camera
    pub struct CameraKey;
}

/// A deferred command list shared between the renderer and its recording thread
pub type SharedCommandList = Arc<Mutex<Box<dyn CommandList>>>;

/// Lock a mutex, recovering the data if a panicking thread poisoned it
pub(super) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One pipeline per fixed program
pub(super) struct Pipelines {
    pub shadow_depth: Arc<dyn Pipeline>,
    pub depth_pre_pass: Arc<dyn Pipeline>,
    pub forward: Arc<dyn Pipeline>,
    pub skybox: Arc<dyn Pipeline>,
    pub post_process: Arc<dyn Pipeline>,
    pub line_gizmo: Arc<dyn Pipeline>,
}

impl Pipelines {
    fn new(device: &dyn GraphicsDevice) -> Result<Self> {
        let depth = device.depth_convention();
        let create = |kind, topology, cull_mode, depth_state: Option<DepthState>| {
            device.create_pipeline(PipelineDesc {
                kind,
                topology,
                cull_mode,
                depth: depth_state,
                depth_bias: None,
            })
        };
        let write_closer = Some(DepthState { compare_op: depth.closer(), write_enable: true });
        let test_closer_or_equal =
            Some(DepthState { compare_op: depth.closer_or_equal(), write_enable: false });

        Ok(Self {
            shadow_depth: create(PipelineKind::ShadowDepth, PrimitiveTopology::TriangleList, CullMode::Back, write_closer)?,
            depth_pre_pass: create(PipelineKind::DepthPrePass, PrimitiveTopology::TriangleList, CullMode::Back, write_closer)?,
            forward: create(PipelineKind::Forward, PrimitiveTopology::TriangleList, CullMode::Back, test_closer_or_equal)?,
            skybox: create(PipelineKind::Skybox, PrimitiveTopology::TriangleList, CullMode::Front, test_closer_or_equal)?,
            post_process: create(PipelineKind::PostProcess, PrimitiveTopology::TriangleList, CullMode::None, None)?,
            line_gizmo: create(
                PipelineKind::LineGizmo,
                PrimitiveTopology::LineList,
                CullMode::None,
                Some(DepthState { compare_op: CompareOp::Always, write_enable: false }),
            )?,
        })
    }
}

/// GPU state rewritten while drawing; one frame records at a time
pub(super) struct FrameResources {
    pub directional_shadows: DirectionalShadowMapArray,
    pub punctual_shadows: PunctualShadowAtlas,
    pub per_frame: ConstantBuffer<PerFrameConstants>,
    pub post_process: ConstantBuffer<PostProcessConstants>,
    pub per_view: ConstantBufferPool<PerViewConstants>,
    pub per_draw: ConstantBufferPool<PerDrawConstants>,
    pub lights: StructuredBuffer<ShaderLight>,
    pub gizmo_colors: StructuredBuffer<[f32; 4]>,
    pub gizmo_lines: StructuredBuffer<LineGizmoVertexData>,
    /// Scratch for the light buffer, indexed like the camera's visible lights
    pub shader_lights: Vec<ShaderLight>,
    /// View constants of the last drawn camera, used by the gizmo pass
    pub last_camera_view: Option<Arc<ConstantBuffer<PerViewConstants>>>,
}

impl FrameResources {
    fn new(device: &dyn GraphicsDevice, config: &RendererConfig) -> Result<Self> {
        Ok(Self {
            directional_shadows: DirectionalShadowMapArray::new(device, config.directional_shadow_map_size)?,
            punctual_shadows: PunctualShadowAtlas::new(device, config.punctual_shadow_atlas_size)?,
            per_frame: ConstantBuffer::new(device, "Per Frame Constants")?,
            post_process: ConstantBuffer::new(device, "Post Process Constants")?,
            per_view: ConstantBufferPool::new("Per View Constants"),
            per_draw: ConstantBufferPool::new("Per Draw Constants"),
            lights: StructuredBuffer::new(device, config.initial_light_capacity, "Lights")?,
            gizmo_colors: StructuredBuffer::new(device, 64, "Gizmo Colors")?,
            gizmo_lines: StructuredBuffer::new(device, 64, "Gizmo Lines")?,
            shader_lights: Vec::with_capacity(config.initial_light_capacity),
            last_camera_view: None,
        })
    }
}

/// Rendering context
///
/// Every method takes `&self`. Registries, the command-list map and the
/// immediate context each have their own lock; drawing a camera holds the
/// frame resources for the whole recording.
pub struct Renderer {
    pub(super) device: Arc<dyn GraphicsDevice>,
    pub(super) config: RendererConfig,
    pub(super) settings: RwLock<RendererSettings>,
    pub(super) static_meshes: Mutex<SlotMap<StaticMeshKey, Arc<dyn ComponentSource<StaticMeshInstance>>>>,
    pub(super) lights: Mutex<SlotMap<LightKey, Arc<dyn ComponentSource<Light>>>>,
    pub(super) skyboxes: Mutex<SlotMap<SkyboxKey, Skybox>>,
    pub(super) game_cameras: Mutex<SlotMap<CameraKey, Arc<dyn ComponentSource<Camera>>>>,
    pub(super) temp_render_targets: TemporaryRenderTargetCache,
    pub(super) visibility_pool: VisibilityPool,
    pub(super) pipelines: Pipelines,
    pub(super) frame: Mutex<FrameResources>,
    thread_command_lists: Mutex<FxHashMap<ThreadId, SharedCommandList>>,
    immediate_context: Mutex<()>,
    gizmos: Mutex<GizmoQueue>,
}

impl Renderer {
    /// Create the shadow atlases, constant buffers and fixed pipelines.
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if any of them cannot be
    /// created; a renderer without its fixed resource set cannot draw.
    pub fn new(device: Arc<dyn GraphicsDevice>, config: RendererConfig) -> Result<Self> {
        let frame = FrameResources::new(device.as_ref(), &config)
            .map_err(|e| initialization_failed("frame resources", e))?;
        let pipelines = Pipelines::new(device.as_ref())
            .map_err(|e| initialization_failed("pipelines", e))?;

        engine_info!(
            "umbra::Renderer",
            "Renderer created ({:?} depth, {}px cascades, {}px punctual atlas)",
            device.depth_convention(),
            config.directional_shadow_map_size,
            config.punctual_shadow_atlas_size
        );

        Ok(Self {
            settings: RwLock::new(config.settings.clone()),
            device,
            config,
            static_meshes: Mutex::new(SlotMap::with_key()),
            lights: Mutex::new(SlotMap::with_key()),
            skyboxes: Mutex::new(SlotMap::with_key()),
            game_cameras: Mutex::new(SlotMap::with_key()),
            temp_render_targets: TemporaryRenderTargetCache::new(),
            visibility_pool: VisibilityPool::new(),
            pipelines,
            frame: Mutex::new(frame),
            thread_command_lists: Mutex::new(FxHashMap::default()),
            immediate_context: Mutex::new(()),
            gizmos: Mutex::new(GizmoQueue::new()),
        })
    }

    // ===== ACCESSORS =====

    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Copy of the current runtime settings
    pub fn settings(&self) -> RendererSettings {
        self.settings.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Change runtime settings; takes effect from the next drawn camera
    pub fn update_settings<F: FnOnce(&mut RendererSettings)>(&self, update: F) {
        let mut settings = self.settings.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        update(&mut settings);
    }

    pub fn temporary_render_targets(&self) -> &TemporaryRenderTargetCache {
        &self.temp_render_targets
    }

    // ===== REGISTRIES =====

    pub fn register_static_mesh(&self, mesh: Arc<dyn ComponentSource<StaticMeshInstance>>) -> StaticMeshKey {
        lock(&self.static_meshes).insert(mesh)
    }

    /// Returns false if `key` was not registered
    pub fn unregister_static_mesh(&self, key: StaticMeshKey) -> bool {
        lock(&self.static_meshes).remove(key).is_some()
    }

    pub fn static_mesh_count(&self) -> usize {
        lock(&self.static_meshes).len()
    }

    pub fn register_light(&self, light: Arc<dyn ComponentSource<Light>>) -> LightKey {
        lock(&self.lights).insert(light)
    }

    pub fn unregister_light(&self, key: LightKey) -> bool {
        lock(&self.lights).remove(key).is_some()
    }

    pub fn light_count(&self) -> usize {
        lock(&self.lights).len()
    }

    pub fn register_skybox(&self, skybox: Skybox) -> SkyboxKey {
        lock(&self.skyboxes).insert(skybox)
    }

    pub fn unregister_skybox(&self, key: SkyboxKey) -> bool {
        lock(&self.skyboxes).remove(key).is_some()
    }

    pub fn register_game_camera(&self, camera: Arc<dyn ComponentSource<Camera>>) -> CameraKey {
        lock(&self.game_cameras).insert(camera)
    }

    pub fn unregister_game_camera(&self, key: CameraKey) -> bool {
        lock(&self.game_cameras).remove(key).is_some()
    }

    pub fn game_camera_count(&self) -> usize {
        lock(&self.game_cameras).len()
    }

    pub(super) fn snapshot_lights(&self) -> Vec<Light> {
        lock(&self.lights).values().map(|light| light.snapshot()).collect()
    }

    pub(super) fn snapshot_static_meshes(&self) -> Vec<StaticMeshInstance> {
        lock(&self.static_meshes).values().map(|mesh| mesh.snapshot()).collect()
    }

    pub(super) fn snapshot_game_cameras(&self) -> Vec<Camera> {
        lock(&self.game_cameras).values().map(|camera| camera.snapshot()).collect()
    }

    pub(super) fn first_skybox(&self) -> Option<Skybox> {
        lock(&self.skyboxes).values().next().cloned()
    }

    // ===== COMMAND LISTS =====

    /// The calling thread's deferred command list, created on first use
    pub fn thread_command_list(&self) -> Result<SharedCommandList> {
        let id = thread::current().id();
        let mut lists = lock(&self.thread_command_lists);
        if let Some(list) = lists.get(&id) {
            return Ok(list.clone());
        }

        let list: SharedCommandList = Arc::new(Mutex::new(self.device.create_command_list()?));
        lists.insert(id, list.clone());
        Ok(list)
    }

    /// Number of threads that own a command list
    pub fn thread_command_list_count(&self) -> usize {
        lock(&self.thread_command_lists).len()
    }

    /// Submit a closed command list on the immediate context
    pub fn execute_command_list(&self, command_list: &mut dyn CommandList) -> Result<()> {
        let _immediate = lock(&self.immediate_context);
        self.device.execute_command_list(command_list)
    }

    /// Color texture a pass writes its final output to
    pub(super) fn target_color_texture(&self, target: Option<&RenderTarget>) -> Result<Arc<dyn Texture>> {
        match target {
            Some(target) => target.color_texture().cloned().ok_or_else(|| {
                engine_err!(
                    "umbra::Renderer",
                    "Render target '{}' has no color attachment",
                    target.desc().debug_name
                )
            }),
            None => self.device.back_buffer(),
        }
    }

    // ===== GIZMOS =====

    /// Queue a debug line for the next gizmo pass
    pub fn draw_line_at_next_render(&self, from: Vec3, to: Vec3, color: Vec4) {
        lock(&self.gizmos).push_line(from, to, color);
    }

    /// Number of lines queued since the last present
    pub fn queued_gizmo_line_count(&self) -> usize {
        lock(&self.gizmos).len()
    }

    /// Draw every queued line into `target` (the back buffer for `None`)
    /// with the view of the last drawn camera.
    ///
    /// Nothing is recorded when the queue is empty.
    pub fn draw_gizmos(&self, target: Option<&RenderTarget>) -> Result<()> {
        let gizmos = lock(&self.gizmos);
        if gizmos.is_empty() {
            return Ok(());
        }

        let target_color = self.target_color_texture(target)?;
        let device = self.device.as_ref();
        let mut frame_guard = lock(&self.frame);
        let frame = &mut *frame_guard;
        frame.gizmo_colors.update(device, gizmos.colors())?;
        frame.gizmo_lines.update(device, gizmos.lines())?;

        let shared = self.thread_command_list()?;
        let mut list_guard = lock(shared.as_ref());

        let info = target_color.info();
        record_or_discard(&mut **list_guard, |list| {
            list.begin_event("Gizmos")?;
            list.bind_pipeline(&self.pipelines.line_gizmo)?;
            list.set_render_targets(Some(&target_color), None)?;
            list.set_viewport(Viewport::full(info.width, info.height))?;
            if let Some(view) = &frame.last_camera_view {
                list.bind_constant_buffer(slots::PER_VIEW_CB, view.buffer())?;
            }
            list.bind_structured_buffer(slots::GIZMO_COLORS, frame.gizmo_colors.buffer())?;
            list.bind_structured_buffer(slots::GIZMO_LINES, frame.gizmo_lines.buffer())?;
            list.draw_instanced(2, gizmos.len() as u32)?;
            list.end_event()?;
            list.close()?;

            self.execute_command_list(list)
        })
    }

    // ===== PRESENT =====

    /// Present the back buffer, then start the next frame: the gizmo queue
    /// is emptied and the temporary render targets age by one frame.
    pub fn present(&self) -> Result<()> {
        let sync_interval = self.settings().sync_interval();
        self.device.present(sync_interval)?;

        lock(&self.gizmos).clear();
        {
            let mut frame = lock(&self.frame);
            frame.per_view.reset();
            frame.per_draw.reset();
            frame.last_camera_view = None;
        }
        self.temp_render_targets.release_unused();
        Ok(())
    }
}

/// Run `record` on `list`; when it fails, whatever it recorded is dropped so
/// the thread's next frame starts from an empty list
pub(super) fn record_or_discard<T>(
    list: &mut dyn CommandList,
    record: impl FnOnce(&mut dyn CommandList) -> Result<T>,
) -> Result<T> {
    let recorded = record(&mut *list);
    if recorded.is_err() {
        if let Err(e) = list.reset() {
            engine_error!("umbra::Renderer", "Failed to discard a partially recorded command list: {}", e);
        }
    }
    recorded
}

fn initialization_failed(what: &str, error: Error) -> Error {
    engine_error!("umbra::Renderer", "Failed to create {}: {}", what, error);
    Error::InitializationFailed(format!("{}: {}", what, error))
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
