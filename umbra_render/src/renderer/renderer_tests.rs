/// Unit tests for Renderer, driven through the mock graphics device

use super::*;
use std::mem::size_of;
use std::sync::atomic::Ordering;
use glam::{Mat4, Vec3};
use crate::geometry::AABB;
use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, MockTexture};
use crate::graphics_device::{BufferDesc, BufferUsage, IndexType};
use crate::render_target::RenderTargetDesc;
use crate::renderer::renderer_settings::MultisamplingMode;
use crate::scene::{LightType, Material, StaticMesh, Submesh, Transform};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn small_config() -> RendererConfig {
    RendererConfig {
        directional_shadow_map_size: 256,
        punctual_shadow_atlas_size: 256,
        initial_light_capacity: 4,
        settings: RendererSettings::default(),
    }
}

fn new_renderer() -> (Arc<MockGraphicsDevice>, Renderer) {
    let device = Arc::new(MockGraphicsDevice::new());
    let renderer = Renderer::new(device.clone(), small_config()).unwrap();
    (device, renderer)
}

fn events(device: &MockGraphicsDevice) -> Vec<String> {
    device
        .executed_commands()
        .iter()
        .filter_map(|c| c.strip_prefix("begin_event "))
        .map(String::from)
        .collect()
}

fn count(device: &MockGraphicsDevice, command: &str) -> usize {
    device.executed_commands().iter().filter(|c| c.as_str() == command).count()
}

fn cube_at(device: &MockGraphicsDevice, position: Vec3) -> Arc<RwLock<StaticMeshInstance>> {
    let buffer = |name: &str, usage| {
        device
            .create_buffer(BufferDesc { size: 64, usage, stride: 0, debug_name: name.to_string() })
            .unwrap()
    };
    let bounds = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let mesh = StaticMesh {
        vertex_buffer: buffer("cube vertices", BufferUsage::Vertex),
        vertex_stride: 32,
        index_buffer: buffer("cube indices", BufferUsage::Index),
        index_type: IndexType::U16,
        bounds,
        submeshes: vec![Submesh { first_index: 0, index_count: 36, base_vertex: 0, material_index: 0, bounds }],
    };
    let material = Material {
        albedo_map: None,
        metallic_map: None,
        roughness_map: None,
        ao_map: None,
        normal_map: None,
        opacity_mask: None,
        constant_buffer: buffer("cube material", BufferUsage::Constant),
    };
    Arc::new(RwLock::new(StaticMeshInstance {
        mesh: Arc::new(mesh),
        materials: vec![Arc::new(material)],
        transform: Transform::from_position(position),
    }))
}

fn shadow_casting_sun() -> Arc<RwLock<Light>> {
    let mut light = Light::directional(Transform::looking_to(
        Vec3::new(0.0, 20.0, 0.0),
        Vec3::new(0.3, -1.0, 0.2),
        Vec3::Z,
    ));
    light.set_casts_shadow(true);
    Arc::new(RwLock::new(light))
}

fn uploaded_lights(device: &MockGraphicsDevice, count: usize) -> Vec<ShaderLight> {
    let buffer = device.buffer_named("Lights").unwrap();
    let bytes = buffer.contents.lock().unwrap();
    (0..count)
        .map(|i| {
            let start = i * size_of::<ShaderLight>();
            bytemuck::pod_read_unaligned(&bytes[start..start + size_of::<ShaderLight>()])
        })
        .collect()
}

// ============================================================================
// CREATION
// ============================================================================

#[test]
fn test_new_creates_fixed_resources() {
    let (device, renderer) = new_renderer();

    let textures = device.created_textures.lock().unwrap().clone();
    assert!(textures.contains(&"Directional Shadow Map Array".to_string()));
    assert!(textures.contains(&"Punctual Shadow Atlas".to_string()));
    assert_eq!(device.created_pipelines.lock().unwrap().len(), 6);
    assert!(device.buffer_named("Per Frame Constants").is_some());
    assert_eq!(renderer.config().directional_shadow_map_size, 256);
}

#[test]
fn test_pipelines_follow_depth_convention() {
    let (device, _renderer) = new_renderer();
    let pipelines = device.created_pipelines.lock().unwrap();
    let forward = pipelines.iter().find(|p| p.kind == PipelineKind::Forward).unwrap();
    assert_eq!(forward.depth.unwrap().compare_op, CompareOp::GreaterOrEqual);
    assert!(!forward.depth.unwrap().write_enable);

    let gizmo = pipelines.iter().find(|p| p.kind == PipelineKind::LineGizmo).unwrap();
    assert_eq!(gizmo.topology, PrimitiveTopology::LineList);
}

#[test]
fn test_new_fails_when_textures_cannot_be_created() {
    let device = Arc::new(MockGraphicsDevice::new());
    device.fail_texture_creation.store(true, Ordering::SeqCst);

    let result = Renderer::new(device, small_config());
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
fn test_new_rejects_non_power_of_two_atlas() {
    let device = Arc::new(MockGraphicsDevice::new());
    let config = RendererConfig { punctual_shadow_atlas_size: 1000, ..small_config() };
    assert!(Renderer::new(device, config).is_err());
}

// ============================================================================
// REGISTRIES
// ============================================================================

#[test]
fn test_register_and_unregister() {
    let (device, renderer) = new_renderer();

    let mesh = renderer.register_static_mesh(cube_at(&device, Vec3::ZERO));
    let light = renderer.register_light(shadow_casting_sun());
    let camera = renderer.register_game_camera(Arc::new(RwLock::new(Camera::default())));
    assert_eq!(renderer.static_mesh_count(), 1);
    assert_eq!(renderer.light_count(), 1);
    assert_eq!(renderer.game_camera_count(), 1);

    assert!(renderer.unregister_static_mesh(mesh));
    assert!(!renderer.unregister_static_mesh(mesh));
    assert!(renderer.unregister_light(light));
    assert!(renderer.unregister_game_camera(camera));
    assert_eq!(renderer.static_mesh_count(), 0);
    assert_eq!(renderer.light_count(), 0);
    assert_eq!(renderer.game_camera_count(), 0);
}

#[test]
fn test_light_changes_are_seen_by_the_next_draw() {
    let (device, renderer) = new_renderer();
    let light = Arc::new(RwLock::new(Light::point(Transform::from_position(Vec3::new(0.0, 0.0, 5.0)), 2.0)));
    renderer.register_light(light.clone());

    light.write().unwrap().set_intensity(7.0);
    renderer.draw_camera(&Camera::default(), None).unwrap();

    assert_eq!(uploaded_lights(&device, 1)[0].intensity, 7.0);
}

// ============================================================================
// STAGE ORDER
// ============================================================================

#[test]
fn test_draw_camera_stage_order_without_shadow_casters() {
    let (device, renderer) = new_renderer();
    renderer.draw_camera(&Camera::default(), None).unwrap();

    assert_eq!(
        events(&device),
        vec![
            "Draw Camera",
            "Shadows",
            "Punctual Shadows",
            "Depth Pre-Pass",
            "Forward Pass",
            "Resolve",
            "Post-Process",
        ]
    );
    assert_eq!(count(&device, "resolve samples=8"), 1);
}

#[test]
fn test_draw_camera_stage_order_with_sun_and_skybox() {
    let (device, renderer) = new_renderer();
    renderer.update_settings(|s| s.set_multisampling_mode(MultisamplingMode::Off));
    renderer.register_light(shadow_casting_sun());
    renderer.register_skybox(Skybox { cubemap: Arc::new(MockTexture::color_2d(4, 4, "sky")) });

    renderer.draw_camera(&Camera::default(), None).unwrap();

    assert_eq!(
        events(&device),
        vec![
            "Draw Camera",
            "Shadows",
            "Directional Shadows",
            "Punctual Shadows",
            "Depth Pre-Pass",
            "Forward Pass",
            "Skybox",
            "Post-Process",
        ]
    );
    assert_eq!(count(&device, "draw 36 0"), 1);
    assert!(!device.executed_commands().iter().any(|c| c.starts_with("resolve")));
}

#[test]
fn test_sun_renders_one_layer_per_active_cascade() {
    let (device, renderer) = new_renderer();
    renderer.register_light(shadow_casting_sun());

    renderer.draw_camera(&Camera::default(), None).unwrap();
    assert_eq!(count(&device, "clear_depth layer=3 value=0"), 1);

    device.clear_executed();
    renderer.update_settings(|s| s.set_shadow_cascade_count(2));
    renderer.draw_camera(&Camera::default(), None).unwrap();
    assert_eq!(count(&device, "clear_depth layer=1 value=0"), 1);
    assert_eq!(count(&device, "clear_depth layer=2 value=0"), 0);
    assert_eq!(count(&device, "clear_depth layer=3 value=0"), 0);
}

// ============================================================================
// MESHES AND LIGHTS
// ============================================================================

#[test]
fn test_visible_mesh_drawn_in_depth_and_forward_pass() {
    let (device, renderer) = new_renderer();
    renderer.register_static_mesh(cube_at(&device, Vec3::new(0.0, 0.0, 5.0)));

    renderer.draw_camera(&Camera::default(), None).unwrap();

    assert_eq!(count(&device, "draw_indexed 36 0 0"), 2);
    assert_eq!(count(&device, "bind_constant_buffer 3"), 1);
    assert_eq!(count(&device, "bind_texture 0 false"), 1);
}

#[test]
fn test_mesh_behind_camera_is_not_drawn() {
    let (device, renderer) = new_renderer();
    renderer.register_static_mesh(cube_at(&device, Vec3::new(0.0, 0.0, -50.0)));

    renderer.draw_camera(&Camera::default(), None).unwrap();

    assert_eq!(count(&device, "draw_indexed 36 0 0"), 0);
}

#[test]
fn test_light_buffer_holds_visible_lights() {
    let (device, renderer) = new_renderer();
    renderer.register_light(Arc::new(RwLock::new(Light::point(
        Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
        2.0,
    ))));
    renderer.register_light(Arc::new(RwLock::new(Light::point(
        Transform::from_position(Vec3::new(0.0, 0.0, -50.0)),
        2.0,
    ))));

    renderer.draw_camera(&Camera::default(), None).unwrap();

    let light = uploaded_lights(&device, 1)[0];
    assert_eq!(light.light_type, LightType::Point as u32);
    assert_eq!(light.range, 2.0);
    assert_eq!(light.position, [0.0, 0.0, 5.0]);
    assert_eq!(light.is_casting_shadow, 0);

    let per_frame = device.buffer_named("Per Frame Constants").unwrap();
    let per_frame: PerFrameConstants = bytemuck::pod_read_unaligned(&per_frame.contents.lock().unwrap());
    assert_eq!(per_frame.light_count, 1);
}

#[test]
fn test_spot_caster_gets_shadow_look_up_info() {
    let (device, renderer) = new_renderer();
    let mut spot = Light::spot(
        Transform::looking_to(Vec3::new(0.0, 0.0, 3.0), Vec3::Z, Vec3::Y),
        5.0,
        60.0,
    );
    spot.set_casts_shadow(true);
    renderer.register_light(Arc::new(RwLock::new(spot)));

    renderer.draw_camera(&Camera::default(), None).unwrap();

    let light = uploaded_lights(&device, 1)[0];
    assert_eq!(light.is_casting_shadow, 1);
    assert_eq!(light.sample_shadow_map[0], 1);
    assert!(light.shadow_atlas_sizes[0] > 0.0);
}

#[test]
fn test_sun_cascades_reach_light_and_view_constants() {
    let (device, renderer) = new_renderer();
    renderer.register_light(shadow_casting_sun());

    renderer.draw_camera(&Camera::default(), None).unwrap();

    let light = uploaded_lights(&device, 1)[0];
    assert_eq!(light.is_casting_shadow, 1);
    assert_eq!(light.sample_shadow_map[..4], [1, 1, 1, 1]);
    assert_ne!(light.shadow_view_projection_matrices[0], Mat4::ZERO);
}

// ============================================================================
// TARGETS
// ============================================================================

#[test]
fn test_draw_into_render_target_uses_its_size() {
    let (device, renderer) = new_renderer();
    let target = RenderTarget::new(device.as_ref(), RenderTargetDesc {
        width: 320,
        height: 200,
        debug_name: "Editor Viewport".to_string(),
        ..Default::default()
    })
    .unwrap();

    renderer.draw_camera(&Camera::default(), Some(&target)).unwrap();

    assert!(count(&device, "set_viewport 0 0 320 200") >= 1);
}

#[test]
fn test_draw_into_depth_only_target_fails() {
    let (device, renderer) = new_renderer();
    let target = RenderTarget::new(device.as_ref(), RenderTargetDesc {
        color_format: None,
        depth_buffer_bit_count: 32,
        debug_name: "Depth Only".to_string(),
        ..Default::default()
    })
    .unwrap();

    assert!(renderer.draw_camera(&Camera::default(), Some(&target)).is_err());
    assert!(device.executed_commands().is_empty());
}

#[test]
fn test_failed_draw_is_discarded_before_the_next_draw() {
    let (device, renderer) = new_renderer();
    renderer.register_static_mesh(cube_at(&device, Vec3::new(0.0, 0.0, 5.0)));
    *device.fail_textures_named.lock().unwrap() = Some("Resolve".to_string());

    assert!(renderer.draw_camera(&Camera::default(), None).is_err());
    assert!(device.executed_commands().is_empty());
    assert_eq!(renderer.visibility_pool.idle_count(), 1);

    *device.fail_textures_named.lock().unwrap() = None;
    renderer.draw_camera(&Camera::default(), None).unwrap();

    let executed = events(&device);
    assert_eq!(executed.iter().filter(|e| *e == "Draw Camera").count(), 1);
    assert_eq!(executed.len(), count(&device, "end_event"));
    let clears = device.executed_commands().iter().filter(|c| c.starts_with("clear_color")).count();
    assert_eq!(clears, 1);
    assert_eq!(count(&device, "draw_indexed 36 0 0"), 2);
    assert_eq!(renderer.visibility_pool.idle_count(), 1);
}

#[test]
fn test_hdr_targets_reused_then_evicted_after_presents() {
    let (_device, renderer) = new_renderer();
    let cache = renderer.temporary_render_targets();

    renderer.draw_camera(&Camera::default(), None).unwrap();
    renderer.draw_camera(&Camera::default(), None).unwrap();
    // HDR target plus its resolve target
    assert_eq!(cache.len(), 2);

    for _ in 0..5 {
        renderer.present().unwrap();
    }
    renderer.draw_camera(&Camera::default(), None).unwrap();
    for _ in 0..9 {
        renderer.present().unwrap();
    }
    assert_eq!(cache.len(), 2);

    renderer.present().unwrap();
    assert!(cache.is_empty());
}

#[test]
fn test_draw_all_cameras_draws_each_camera() {
    let (device, renderer) = new_renderer();
    let first = renderer.register_game_camera(Arc::new(RwLock::new(Camera::default())));
    renderer.register_game_camera(Arc::new(RwLock::new(Camera::default())));

    renderer.draw_all_cameras(None).unwrap();
    assert_eq!(count(&device, "begin_event Draw Camera"), 2);

    device.clear_executed();
    renderer.unregister_game_camera(first);
    renderer.draw_all_cameras(None).unwrap();
    assert_eq!(count(&device, "begin_event Draw Camera"), 1);
}

// ============================================================================
// COMMAND LISTS
// ============================================================================

#[test]
fn test_thread_command_list_is_per_thread() {
    let (_device, renderer) = new_renderer();

    let first = renderer.thread_command_list().unwrap();
    let again = renderer.thread_command_list().unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let other = std::thread::scope(|scope| {
        scope.spawn(|| renderer.thread_command_list().unwrap()).join().unwrap()
    });
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(renderer.thread_command_list_count(), 2);
}

#[test]
fn test_execute_command_list_submits_recorded_commands() {
    let (device, renderer) = new_renderer();
    let shared = renderer.thread_command_list().unwrap();
    let mut list = shared.lock().unwrap();
    list.draw(3, 0).unwrap();
    list.close().unwrap();

    renderer.execute_command_list(&mut **list).unwrap();
    assert_eq!(device.executed_commands(), vec!["draw 3 0"]);
}

// ============================================================================
// GIZMOS AND PRESENT
// ============================================================================

#[test]
fn test_empty_gizmo_queue_records_nothing() {
    let (device, renderer) = new_renderer();
    renderer.draw_gizmos(None).unwrap();
    assert!(device.executed_commands().is_empty());
}

#[test]
fn test_gizmos_drawn_once_then_cleared_by_present() {
    let (device, renderer) = new_renderer();
    renderer.draw_line_at_next_render(Vec3::ZERO, Vec3::X, Vec4::new(1.0, 0.0, 0.0, 1.0));
    renderer.draw_line_at_next_render(Vec3::ZERO, Vec3::Y, Vec4::new(0.0, 1.0, 0.0, 1.0));

    renderer.draw_gizmos(None).unwrap();
    assert_eq!(count(&device, "bind_pipeline LineGizmo"), 1);
    assert_eq!(count(&device, "draw_instanced 2 2"), 1);

    let lines = device.buffer_named("Gizmo Lines").unwrap();
    let second: LineGizmoVertexData = bytemuck::pod_read_unaligned(
        &lines.contents.lock().unwrap()[size_of::<LineGizmoVertexData>()..2 * size_of::<LineGizmoVertexData>()],
    );
    assert_eq!(second.color_index, 1);
    assert_eq!(second.to, [0.0, 1.0, 0.0]);

    renderer.present().unwrap();
    assert_eq!(renderer.queued_gizmo_line_count(), 0);
    assert_eq!(device.present_count.load(Ordering::SeqCst), 1);

    device.clear_executed();
    renderer.draw_gizmos(None).unwrap();
    assert!(device.executed_commands().is_empty());
}

#[test]
fn test_gizmos_use_last_camera_view() {
    let (device, renderer) = new_renderer();
    renderer.draw_camera(&Camera::default(), None).unwrap();
    renderer.draw_line_at_next_render(Vec3::ZERO, Vec3::ONE, Vec4::ONE);

    device.clear_executed();
    renderer.draw_gizmos(None).unwrap();
    assert_eq!(count(&device, "bind_constant_buffer 1"), 1);
}

#[test]
fn test_settings_round_trip_through_renderer() {
    let (_device, renderer) = new_renderer();
    renderer.update_settings(|s| {
        s.set_shadow_distance(-5.0);
        s.set_sync_interval(1);
    });

    let settings = renderer.settings();
    assert_eq!(settings.shadow_distance(), 0.0);
    assert_eq!(settings.sync_interval(), 1);
}
