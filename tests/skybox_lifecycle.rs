//! Skybox lifecycle tests driven through the headless backend.
//!
//! These cover the full initialize, update, render and finalize sequence and
//! inspect what reached the backend.

mod common;

use glam::{Mat4, Vec4};
use rstest::rstest;

use common::{headless_setup, solid_config, solid_source};
use skybox_scene::backend::*;
use skybox_scene::scene::{Camera, CameraInput};
use skybox_scene::skybox::{SkyboxTargets, SkyboxUniforms};
use skybox_scene::{Engine, EngineConfig, SkyboxError, SkyboxRenderer};

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_initialize_creates_pipeline_and_bindings() {
    let (mut backend, shared) = headless_setup();
    let skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();

    let pipeline = backend.pipeline_descriptor(skybox.pipeline()).unwrap();
    assert_eq!(pipeline.vertex.entry_point, "vs_main");
    assert_eq!(pipeline.fragment.as_ref().unwrap().entry_point, "fs_main");
    assert_eq!(pipeline.cull_mode, CullMode::None);
    assert_eq!(pipeline.bind_group_layouts.len(), 1);

    let uniforms = backend.buffer_descriptor(skybox.uniform_buffer()).unwrap();
    assert_eq!(uniforms.size, SkyboxUniforms::SIZE);
    assert_eq!(uniforms.size % 16, 0);
    assert!(uniforms.usage.contains(BufferUsage::UNIFORM));

    // Sphere with tessellation 6: 6 rings of 12 segments, two triangles each
    assert_eq!(skybox.index_count(), 6 * 12 * 6);
}

#[test]
fn test_shared_cube_map_is_bound_twice() {
    let (mut backend, shared) = headless_setup();
    let skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();

    let entries = backend.bind_group_entries(skybox.bind_group()).unwrap().to_vec();
    assert_eq!(entries.len(), 4);

    let uniform_buffers = entries
        .iter()
        .filter(|(_, entry)| matches!(entry, BindGroupEntry::Buffer { .. }))
        .count();
    assert_eq!(uniform_buffers, 1);

    let view_at = |binding: u32| {
        entries.iter().find_map(|(b, entry)| match entry {
            BindGroupEntry::Texture(view) if *b == binding => Some(*view),
            _ => None,
        })
    };
    let day = view_at(1).unwrap();
    let evening = view_at(2).unwrap();
    assert_eq!(day, evening);

    let (texture, dimension) = backend.texture_view_info(day).unwrap();
    assert_eq!(dimension, TextureViewDimension::Cube);
    let desc = backend.texture_descriptor(texture.unwrap()).unwrap();
    assert_eq!(desc.array_layers, 6);
    assert_eq!(backend.live_texture_count(), 1);

    let sampler = entries
        .iter()
        .find_map(|(_, entry)| match entry {
            BindGroupEntry::Sampler(s) => Some(*s),
            _ => None,
        })
        .unwrap();
    let sampler = backend.sampler_descriptor(sampler).unwrap();
    assert_eq!(sampler.filter, FilterMode::Linear);
    assert_eq!(sampler.address_mode, AddressMode::ClampToEdge);
}

#[test]
fn test_distinct_cube_maps_get_their_own_textures() {
    let (mut backend, shared) = headless_setup();
    let config = solid_config().with_cube_maps(
        solid_source([90, 150, 235, 255], "day"),
        solid_source([230, 120, 60, 255], "evening"),
    );
    let skybox = SkyboxRenderer::new(&mut backend, &shared, config).unwrap();

    let entries = backend.bind_group_entries(skybox.bind_group()).unwrap();
    let views: Vec<_> = entries
        .iter()
        .filter_map(|(_, entry)| match entry {
            BindGroupEntry::Texture(view) => Some(*view),
            _ => None,
        })
        .collect();
    assert_eq!(views.len(), 2);
    assert_ne!(views[0], views[1]);
    assert_eq!(backend.live_texture_count(), 2);
}

#[test]
fn test_pipeline_failure_is_fatal() {
    let mut backend = HeadlessBackend::new(64, 64).with_failing_pipelines();
    let shared = skybox_scene::scene::SharedResources::new(&mut backend, Mat4::IDENTITY).unwrap();

    let result = SkyboxRenderer::new(&mut backend, &shared, solid_config());

    assert!(matches!(
        result,
        Err(SkyboxError::Backend(BackendError::PipelineCreationFailed(_)))
    ));
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_one_second_rotates_thirty_units() {
    let (mut backend, shared) = headless_setup();
    let mut skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();

    skybox.update(&mut backend, 1.0, &Camera::default(), &shared);

    assert!((skybox.angle() - 30.0).abs() < 1e-5);
    let expected = Mat4::from_rotation_y(0.3_f32.to_radians());
    assert!(skybox.world_matrix().abs_diff_eq(expected, 1e-6));
    assert!(skybox.uniforms().world.abs_diff_eq(expected, 1e-6));
}

#[rstest]
#[case(0.0, 0.0)]
#[case(0.25, 7.5)]
#[case(2.0, 60.0)]
fn test_angle_after_single_update(#[case] dt: f32, #[case] angle: f32) {
    let (mut backend, shared) = headless_setup();
    let mut skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();

    skybox.update(&mut backend, dt, &Camera::default(), &shared);

    assert!((skybox.angle() - angle).abs() < 1e-5);
}

#[test]
fn test_uniform_payload_matches_camera() {
    let (mut backend, shared) = headless_setup();
    let mut skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();
    let camera = Camera::default();

    skybox.set_day_progress(0.5);
    skybox.update(&mut backend, 0.0, &camera, &shared);

    let uniforms = skybox.uniforms();
    assert_eq!(uniforms.view, camera.view_matrix());
    assert_eq!(uniforms.projection, shared.projection());
    assert_eq!(uniforms.day_progress, Vec4::new(0.5, 0.0, 0.0, 0.0));
    assert_eq!(
        backend.buffer_contents(skybox.uniform_buffer()).unwrap(),
        uniforms.as_bytes()
    );
}

// ============================================================================
// Render
// ============================================================================

#[test]
fn test_render_issues_single_indexed_draw() {
    let (mut backend, shared) = headless_setup();
    let mut skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();
    skybox.update(&mut backend, 1.0, &Camera::default(), &shared);

    let frame = backend.begin_frame().unwrap();
    backend.clear_commands();
    skybox.render(&mut backend, &SkyboxTargets::new(frame.swapchain_view));

    let commands = backend.commands();
    assert_eq!(commands.len(), 7);
    assert!(matches!(commands[0], RecordedCommand::BeginRenderPass(_)));
    assert_eq!(commands[1], RecordedCommand::SetPipeline(skybox.pipeline()));
    assert_eq!(
        commands[2],
        RecordedCommand::SetBindGroup {
            index: 0,
            bind_group: skybox.bind_group(),
        }
    );
    assert!(matches!(commands[3], RecordedCommand::SetVertexBuffer { slot: 0, .. }));
    assert!(matches!(
        commands[4],
        RecordedCommand::SetIndexBuffer {
            format: IndexFormat::Uint32,
            ..
        }
    ));
    assert_eq!(
        commands[5],
        RecordedCommand::DrawIndexed {
            indices: 0..skybox.index_count(),
            base_vertex: 0,
            instances: 0..1,
        }
    );
    assert_eq!(commands[6], RecordedCommand::EndRenderPass);
    assert_eq!(backend.draw_count(), 1);
}

#[test]
fn test_render_twice_without_update_draws_twice() {
    let (mut backend, shared) = headless_setup();
    let skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();

    let frame = backend.begin_frame().unwrap();
    let targets = SkyboxTargets::new(frame.swapchain_view);
    skybox.render(&mut backend, &targets);
    skybox.render(&mut backend, &targets);

    assert_eq!(backend.draw_count(), 2);
}

// ============================================================================
// Finalize
// ============================================================================

#[test]
fn test_finalize_releases_everything() {
    let (mut backend, shared) = headless_setup();
    let config = solid_config().with_cube_maps(
        solid_source([255, 255, 255, 255], "day"),
        solid_source([0, 0, 0, 255], "evening"),
    );
    let skybox = SkyboxRenderer::new(&mut backend, &shared, config).unwrap();
    assert_eq!(backend.live_buffer_count(), 3);
    assert_eq!(backend.live_texture_count(), 2);

    skybox.finalize(&mut backend);

    assert_eq!(backend.live_buffer_count(), 0);
    assert_eq!(backend.live_texture_count(), 0);
}

// ============================================================================
// Engine
// ============================================================================

fn engine() -> Engine<HeadlessBackend> {
    let config = EngineConfig::default()
        .with_skybox(solid_config().with_depth_format(Some(TextureFormat::Depth32Float)))
        .with_day_progress(0.25);
    Engine::new(HeadlessBackend::new(800, 600), config).unwrap()
}

#[test]
fn test_engine_frames() {
    let mut engine = engine();
    let input = CameraInput::default();

    for _ in 0..3 {
        engine.update(0.5, &input);
        engine.render().unwrap();
    }

    assert!((engine.skybox().angle() - 45.0).abs() < 1e-4);
    assert_eq!(engine.skybox().day_progress(), 0.25);
    assert_eq!(engine.skybox().config().color_format, TextureFormat::Bgra8UnormSrgb);

    let backend = engine.backend();
    assert_eq!(backend.draw_count(), 3);
    let frames = backend
        .commands()
        .iter()
        .filter(|c| **c == RecordedCommand::EndFrame)
        .count();
    assert_eq!(frames, 3);

    let pass = backend
        .commands()
        .iter()
        .find_map(|c| match c {
            RecordedCommand::BeginRenderPass(desc) => Some(desc.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(pass.depth_attachment.map(|d| d.load), Some(LoadOp::Clear(1.0)));
    assert!(matches!(pass.color_attachments[0].load, LoadOp::Clear(_)));
}

#[test]
fn test_engine_resize_updates_projection() {
    let mut engine = engine();
    let before = engine.projection();

    engine.resize(400, 600).unwrap();

    assert_eq!(engine.dimensions(), (400, 600));
    assert_ne!(engine.projection(), before);
    engine.update(0.1, &CameraInput::default());
    assert_eq!(engine.skybox().uniforms().projection, engine.projection());
}

#[test]
fn test_engine_day_progress_stays_in_range() {
    let mut engine = engine();

    assert_eq!(engine.adjust_day_progress(0.5), 0.75);
    assert_eq!(engine.adjust_day_progress(1.0), 1.0);
    assert_eq!(engine.adjust_day_progress(-3.0), 0.0);
}

#[test]
fn test_engine_shutdown_releases_resources() {
    let mut engine = engine();
    engine.update(0.1, &CameraInput::default());
    engine.render().unwrap();

    let backend = engine.shutdown();

    assert_eq!(backend.live_buffer_count(), 0);
    assert_eq!(backend.live_texture_count(), 0);
}
