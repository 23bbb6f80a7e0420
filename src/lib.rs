#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The core of a voxel game client: chunked block storage, exact ray casting
//! against that storage, and an incremental chunk meshing pipeline that keeps
//! rendered geometry consistent with mutable block data.
//!
//! ## Key Modules
//!
//! * `voxels` - Block registry, chunks, the world, rays and terrain generation
//! * `rendering` - Per-chunk meshes, the render-distance window and the face sink
//! * `camera_state` - Camera, projection and view frustum
//! * `core` - Small shared utilities such as the spiral iterator
//!
//! ## Architecture
//!
//! Gameplay edits the [`voxels::world::World`], which records every change as a
//! `WorldEdit`. Once per frame [`rendering::ChunkRenderer::update_blocks`]
//! drains those edits and re-meshes only the faces they can affect, then the
//! render pass draws the chunks around the camera through a
//! [`rendering::FaceRenderer`]. Nothing in this crate talks to a graphics API.
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::config::EngineConfig;
//! use voxel_world::rendering::MemoryFaceRenderer;
//! use voxel_world::EngineState;
//!
//! let mut sink = MemoryFaceRenderer::new();
//! let config = EngineConfig { render_distance: 1, terrain_radius: 1, ..EngineConfig::default() };
//! let mut engine = EngineState::new(config, &mut sink);
//! let stats = engine.frame(&mut sink);
//! assert_eq!(engine.chunk_renderer.rendered_chunk_count(), 9);
//! # let _ = stats;
//! ```

use cgmath::Deg;
use log::info;

pub mod core;
mod engine_state;

pub use engine_state::{
    camera_state, config, hotbar, rendering, voxels, EngineState, FrameStats,
};

use config::{ConfigError, EngineConfig};
use rendering::MemoryFaceRenderer;

/// Number of frames the demo simulates.
const DEMO_FRAMES: usize = 120;

/// Runs a headless demo session.
///
/// Loads the config file named by the first command-line argument (defaults
/// otherwise), builds the engine, and simulates a player looking around,
/// walking, and breaking and placing blocks, logging statistics as it goes.
/// Set `RUST_LOG=info` (or `debug`) to see the output.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut sink = MemoryFaceRenderer::new();
    let mut engine = EngineState::new(config, &mut sink);

    let mut edits = 0;
    for frame in 0..DEMO_FRAMES {
        engine.camera_state.camera.rotate(Deg(3.0), Deg(0.0));
        if frame % 10 == 0 {
            let direction = engine.camera_state.direction();
            engine.camera_state.camera.position.x += direction.x * 4.0;
            engine.camera_state.camera.position.z += direction.z * 4.0;
        }
        match frame % 4 {
            0 => {
                engine.break_block();
            }
            2 => {
                engine.place_block();
            }
            _ => {}
        }
        if frame % 30 == 29 {
            engine.select_next_block(&mut sink);
        }

        let stats = engine.frame(&mut sink);
        edits += stats.edits_applied;
        sink.take_draws();
        log::debug!("Frame {}: {:?}", frame, stats);
    }

    info!(
        "Simulated {} frames: {} edits, {} chunks loaded, {} meshed",
        DEMO_FRAMES,
        edits,
        engine.world.chunk_count(),
        engine.chunk_renderer.rendered_chunk_count()
    );
    info!(
        "Face sink: {} buffers, {} bytes, {} uploads",
        sink.buffer_count(),
        sink.total_used_memory(),
        sink.total_writes()
    );
    if engine.is_eye_underwater() {
        info!("Camera ended the session underwater");
    }

    engine.shutdown(&mut sink);
    Ok(())
}
