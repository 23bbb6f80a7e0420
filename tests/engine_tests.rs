//! Whole-engine sessions driven through the public API.
use cgmath::Deg;
use voxel_world::camera_state::camera::Camera;
use voxel_world::config::EngineConfig;
use voxel_world::rendering::MemoryFaceRenderer;
use voxel_world::voxels::chunk::CHUNK_WIDTH;
use voxel_world::EngineState;

fn engine_from_json(json: &str, sink: &mut MemoryFaceRenderer) -> EngineState {
    let config = EngineConfig::from_json_str(json).unwrap();
    EngineState::new(config, sink)
}

#[test]
fn crossing_a_chunk_border_loads_the_new_window() {
    let mut sink = MemoryFaceRenderer::new();
    let mut engine = engine_from_json(
        r#"{ "render_distance": 1, "terrain_radius": 1, "seed": 7 }"#,
        &mut sink,
    );
    engine.frame(&mut sink);
    assert_eq!(engine.world.chunk_count(), 9);
    assert!(!engine.world.has_chunk(2, 0));

    engine.camera_state.camera.position.x += 2.0 * CHUNK_WIDTH as f32;
    let stats = engine.frame(&mut sink);
    assert_eq!(engine.camera_state.chunk_position(), (2, 0));
    assert_eq!(engine.world.chunk_count(), 15);
    assert_eq!(stats.edits_applied, 6);
    for chunk_z in -1..=1 {
        assert!(engine.world.has_chunk(3, chunk_z));
        assert!(engine.chunk_renderer.is_chunk_rendered(3, chunk_z));
    }
}

#[test]
fn same_seed_builds_the_same_world() {
    let json = r#"{ "render_distance": 1, "terrain_radius": 1, "seed": 99 }"#;
    let mut sink = MemoryFaceRenderer::new();
    let first = engine_from_json(json, &mut sink);
    let second = engine_from_json(json, &mut sink);
    for chunk_x in -1..=1 {
        for chunk_z in -1..=1 {
            assert_eq!(
                first.world.chunk(chunk_x, chunk_z),
                second.world.chunk(chunk_x, chunk_z)
            );
        }
    }
}

#[test]
fn digging_straight_down_removes_one_block_per_swing() {
    let mut sink = MemoryFaceRenderer::new();
    let mut engine = engine_from_json(r#"{ "render_distance": 1, "terrain_radius": 1 }"#, &mut sink);
    let eye = engine.camera_state.eye();
    engine.camera_state.camera = Camera::new(eye, Deg(0.0), Deg(-90.0));
    engine.frame(&mut sink);

    let Some(first) = engine.target_block() else {
        // Spawned over water deeper than the reach.
        return;
    };
    assert!(engine.break_block());
    engine.frame(&mut sink);

    if let Some(second) = engine.target_block() {
        assert!(second.position.y < first.position.y);
        assert_eq!(second.position.x, first.position.x);
        assert_eq!(second.position.z, first.position.z);
    }
}
