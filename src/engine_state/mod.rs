//! # Engine State Module
//!
//! The core engine module that ties the voxel world to the renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Camera position, orientation and frustum
//! * `config` - Runtime settings loaded from JSON
//! * `hotbar` - The block the player is holding
//! * `rendering` - Meshing, edit dispatch and drawing through a face sink
//! * `voxels` - Blocks, chunks, the world, rays and terrain generation
//!
//! ## Frame Order
//!
//! A frame is strictly `update` then `render`. All world edits made between two
//! frames are applied to the meshes in `update`, so `render` never sees a
//! half-applied set of edits. Everything runs on the calling thread.

use std::rc::Rc;

use camera_state::{camera, CameraState};
use cgmath::{Deg, Point3};
use config::EngineConfig;
use hotbar::Hotbar;
use rendering::{ChunkRenderer, FaceRenderer};
use voxels::{
    block::{BlockRegistry, AIR_ID},
    collision::block_coords_at,
    generator::TerrainGenerator,
    world::{RaycastHit, World},
};

pub mod camera_state;
pub mod config;
pub mod hotbar;
pub mod rendering;
pub mod voxels;

/// Height of the camera above the terrain surface at spawn.
const EYE_HEIGHT: f32 = 1.6;

/// What a frame drew.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// World edits applied to meshes during the update phase.
    pub edits_applied: usize,
    /// Chunks whose opaque faces were drawn.
    pub opaque_chunks: usize,
    /// Chunks whose translucent faces were drawn.
    pub translucent_chunks: usize,
}

/// The main state container for the voxel engine
///
/// Owns the block registry, the world, the chunk renderer, the camera and the
/// hotbar, and coordinates their interactions.
///
/// # Examples
///
/// ```
/// use voxel_world::config::EngineConfig;
/// use voxel_world::rendering::MemoryFaceRenderer;
/// use voxel_world::EngineState;
///
/// let config = EngineConfig { render_distance: 1, terrain_radius: 1, ..EngineConfig::default() };
/// let mut sink = MemoryFaceRenderer::new();
/// let mut engine = EngineState::new(config, &mut sink);
///
/// // Main game loop
/// engine.update(&mut sink);
/// let stats = engine.render(&mut sink);
/// assert!(stats.opaque_chunks > 0);
/// ```
pub struct EngineState {
    /// Runtime settings
    pub config: EngineConfig,
    /// Camera state managing position and orientation
    pub camera_state: CameraState,
    /// The voxel world containing all chunk data
    pub world: World,
    /// Meshes and draws the chunks around the camera
    pub chunk_renderer: ChunkRenderer,
    /// The block placed by `place_block`
    pub hotbar: Hotbar,
    registry: Rc<BlockRegistry>,
    generator: TerrainGenerator,
}

impl EngineState {
    /// Builds the engine: registers blocks, generates the starting terrain and
    /// places the camera on the surface at the origin.
    pub fn new(config: EngineConfig, sink: &mut dyn FaceRenderer) -> Self {
        let registry = Rc::new(BlockRegistry::register_all());
        let generator = TerrainGenerator::new(config.seed);
        let mut world = World::new(registry.clone());

        let radius = config.terrain_radius;
        for chunk_x in -radius..=radius {
            for chunk_z in -radius..=radius {
                world.insert_chunk(chunk_x, chunk_z, generator.generate(chunk_x, chunk_z));
            }
        }

        let spawn_y = generator.height_at(0, 0) as f32 + 0.5 + EYE_HEIGHT;
        let camera = camera::Camera::new(Point3::new(0.0, spawn_y, 0.0), Deg(45.0), Deg(-20.0));
        let projection = camera::Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);

        let mut hotbar = Hotbar::new();
        hotbar.init(&registry, sink);

        log::info!(
            "Engine started: {} chunks loaded, render distance {}, seed {}",
            world.chunk_count(),
            config.render_distance,
            config.seed
        );

        EngineState {
            chunk_renderer: ChunkRenderer::new(config.chunk_capacity()),
            camera_state: CameraState::new(camera, projection),
            world,
            hotbar,
            registry,
            generator,
            config,
        }
    }

    /// The block registry shared with the world.
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Generates and loads a chunk if it is not loaded yet.
    ///
    /// # Returns
    /// `true` if a chunk was generated.
    pub fn load_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> bool {
        if self.world.has_chunk(chunk_x, chunk_z) {
            return false;
        }
        let chunk = self.generator.generate(chunk_x, chunk_z);
        self.world.insert_chunk(chunk_x, chunk_z, chunk);
        true
    }

    /// First half of a frame: track the camera and apply pending world edits.
    ///
    /// # Returns
    /// The number of edits applied.
    pub fn update(&mut self, sink: &mut dyn FaceRenderer) -> usize {
        if let Some(updates) = self.camera_state.update() {
            let (chunk_x, chunk_z) = updates.new_chunk_position;
            let distance = self.config.render_distance;
            for dx in -distance..=distance {
                for dz in -distance..=distance {
                    self.load_chunk(chunk_x + dx, chunk_z + dz);
                }
            }
        }
        self.chunk_renderer.update_blocks(&mut self.world, sink)
    }

    /// Second half of a frame: draw opaque chunks near to far, translucent
    /// chunks far to near, then the hotbar.
    pub fn render(&mut self, sink: &mut dyn FaceRenderer) -> FrameStats {
        let (chunk_x, chunk_z) = self.camera_state.chunk_position();
        let distance = self.config.render_distance;
        let frustum = self.camera_state.frustum();

        let opaque_chunks = self.chunk_renderer.render(
            &self.world,
            sink,
            chunk_x,
            chunk_z,
            distance,
            Some(&frustum),
        );
        let translucent_chunks = self.chunk_renderer.render_translucent(
            sink,
            chunk_x,
            chunk_z,
            distance,
            Some(&frustum),
        );
        self.hotbar.render(sink);

        FrameStats {
            edits_applied: 0,
            opaque_chunks,
            translucent_chunks,
        }
    }

    /// Runs `update` then `render`.
    pub fn frame(&mut self, sink: &mut dyn FaceRenderer) -> FrameStats {
        let edits_applied = self.update(sink);
        FrameStats {
            edits_applied,
            ..self.render(sink)
        }
    }

    /// The block the camera is looking at, within reach.
    pub fn target_block(&self) -> Option<RaycastHit> {
        self.world.raycast(
            self.camera_state.eye(),
            self.camera_state.direction(),
            self.config.reach,
            false,
            false,
        )
    }

    /// Removes the targeted block.
    ///
    /// # Returns
    /// `true` if a block was removed.
    pub fn break_block(&mut self) -> bool {
        let Some(hit) = self.target_block() else {
            return false;
        };
        let position = hit.position;
        self.world.set_block(position.x, position.y, position.z, AIR_ID)
    }

    /// Places the held block against the targeted face.
    ///
    /// Refuses to place into the voxel containing the camera.
    ///
    /// # Returns
    /// `true` if a block was placed.
    pub fn place_block(&mut self) -> bool {
        let hit = self.world.raycast(
            self.camera_state.eye(),
            self.camera_state.direction(),
            self.config.reach,
            true,
            false,
        );
        let Some(hit) = hit else {
            return false;
        };
        let position = hit.position;
        if position == block_coords_at(self.camera_state.eye()) {
            return false;
        }
        self.world
            .set_block(position.x, position.y, position.z, self.hotbar.held())
    }

    /// Holds the next registered block.
    pub fn select_next_block(&mut self, sink: &mut dyn FaceRenderer) {
        self.hotbar.next(&self.registry, sink);
    }

    /// Holds the previous registered block.
    pub fn select_previous_block(&mut self, sink: &mut dyn FaceRenderer) {
        self.hotbar.previous(&self.registry, sink);
    }

    /// Whether the camera is inside a fluid block.
    pub fn is_eye_underwater(&self) -> bool {
        self.world.is_underwater(self.camera_state.eye())
    }

    /// Frees every sink buffer the engine owns.
    pub fn shutdown(&mut self, sink: &mut dyn FaceRenderer) {
        self.chunk_renderer.reset(sink);
        self.hotbar.destroy(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::MemoryFaceRenderer;
    use crate::engine_state::voxels::block::STONE_ID;
    use cgmath::Deg;

    fn small_engine(sink: &mut MemoryFaceRenderer) -> EngineState {
        let config = EngineConfig {
            render_distance: 1,
            terrain_radius: 1,
            ..EngineConfig::default()
        };
        EngineState::new(config, sink)
    }

    fn look_down_from(engine: &mut EngineState, eye: Point3<f32>) {
        engine.camera_state.camera = camera::Camera::new(eye, Deg(0.0), Deg(-90.0));
    }

    #[test]
    fn first_frame_meshes_the_window() {
        let mut sink = MemoryFaceRenderer::new();
        let mut engine = small_engine(&mut sink);
        let stats = engine.frame(&mut sink);
        assert_eq!(stats.edits_applied, 9);
        assert_eq!(engine.chunk_renderer.rendered_chunk_count(), 9);
        assert!(stats.opaque_chunks > 0);
    }

    #[test]
    fn break_then_place_restores_a_block() {
        let mut sink = MemoryFaceRenderer::new();
        let mut engine = small_engine(&mut sink);
        engine.world.set_block(0, 114, 0, STONE_ID);
        engine.world.set_block(0, 115, 0, STONE_ID);
        look_down_from(&mut engine, Point3::new(0.0, 120.0, 0.0));
        engine.frame(&mut sink);

        let target = engine.target_block().unwrap();
        assert_eq!(target.position, Point3::new(0, 115, 0));
        assert!(engine.break_block());
        assert!(engine.world.get_block(0, 115, 0).is_air());
        assert_eq!(engine.frame(&mut sink).edits_applied, 1);

        assert!(engine.place_block());
        assert_eq!(engine.world.get_block_id(0, 115, 0), engine.hotbar.held());
        assert_eq!(engine.frame(&mut sink).edits_applied, 1);
    }

    #[test]
    fn nothing_in_reach_places_nothing() {
        let mut sink = MemoryFaceRenderer::new();
        let mut engine = small_engine(&mut sink);
        look_down_from(&mut engine, Point3::new(0.0, 120.0, 0.0));
        assert!(engine.target_block().is_none());
        assert!(!engine.break_block());
        assert!(!engine.place_block());
        assert!(!engine.is_eye_underwater());
    }

    #[test]
    fn shutdown_frees_all_buffers() {
        let mut sink = MemoryFaceRenderer::new();
        let mut engine = small_engine(&mut sink);
        engine.frame(&mut sink);
        engine.shutdown(&mut sink);
        assert_eq!(sink.buffer_count(), 0);
    }
}
