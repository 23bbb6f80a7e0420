//! # World Module
//!
//! This module provides the `World` struct, the spatial authority for "which
//! block is at (x, y, z)".
//!
//! ## Architecture
//!
//! The world is a sparse 2D grid of full-height chunks keyed by a packed
//! 64-bit chunk key. Only chunks that have been generated or loaded are kept;
//! generation itself happens elsewhere and hands chunks over through
//! [`World::insert_chunk`].
//!
//! Every query is total: a position in an unloaded chunk, or above or below
//! the world, resolves to air instead of failing.
//!
//! ## Edit Notifications
//!
//! Each mutation records a [`WorldEdit`] in a queue. Whatever caches derived
//! data (the chunk renderer's meshes) drains that queue once per frame with
//! [`World::drain_edits`], so a cache never depends on the order in which
//! gameplay code happens to call things.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use cgmath::{Point3, Vector3};

use super::block::block_side::BlockSide;
use super::block::{Block, BlockId, BlockRegistry, AIR_ID};
use super::chunk::{Chunk, CHUNK_WIDTH};
use super::collision::block_coords_at;
use super::ray::{block_coord_at, Ray};

/// Packs two signed chunk coordinates into one map key.
///
/// `chunk_x` occupies the high 32 bits and `chunk_z` the low 32 bits.
pub fn chunk_key(chunk_x: i32, chunk_z: i32) -> u64 {
    ((chunk_x as u32 as u64) << 32) | (chunk_z as u32 as u64)
}

/// Recovers the chunk coordinates packed by [`chunk_key`].
pub fn unpack_chunk_key(key: u64) -> (i32, i32) {
    ((key >> 32) as u32 as i32, key as u32 as i32)
}

/// Splits a world X or Z coordinate into (chunk coordinate, chunk-relative
/// coordinate).
pub fn split_coord(value: i32) -> (i32, i32) {
    (value.div_euclid(CHUNK_WIDTH), value.rem_euclid(CHUNK_WIDTH))
}

/// A change to the world that derived caches must react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorldEdit {
    /// A single block changed id.
    Block {
        /// World X of the block.
        x: i32,
        /// World Y of the block.
        y: i32,
        /// World Z of the block.
        z: i32,
    },
    /// A whole chunk was loaded or replaced.
    Chunk {
        /// X coordinate of the chunk.
        chunk_x: i32,
        /// Z coordinate of the chunk.
        chunk_z: i32,
    },
    /// A chunk was unloaded.
    Unload {
        /// X coordinate of the chunk.
        chunk_x: i32,
        /// Z coordinate of the chunk.
        chunk_z: i32,
    },
}

/// The result of a successful raycast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// The hit block, or the block in front of it when an offset was requested.
    pub position: Point3<i32>,
    /// The face of the hit block the ray entered through.
    pub face: BlockSide,
    /// Distance along the ray to that face.
    pub distance: f32,
}

/// Represents a voxel world composed of full-height chunks.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use voxel_world::voxels::block::{BlockRegistry, STONE_ID};
/// use voxel_world::voxels::chunk::Chunk;
/// use voxel_world::voxels::world::World;
///
/// let mut world = World::new(Rc::new(BlockRegistry::register_all()));
/// world.insert_chunk(0, 0, Chunk::empty());
/// assert!(world.set_block(3, 10, 4, STONE_ID));
/// assert_eq!(world.get_block(3, 10, 4).id(), STONE_ID);
/// // Unloaded space reads as air.
/// assert!(world.get_block(1000, 10, 4).is_air());
/// ```
pub struct World {
    /// The block table every stored id refers to.
    registry: Rc<BlockRegistry>,
    /// Loaded chunks by packed chunk key.
    chunks: HashMap<u64, Chunk>,
    /// Edits not yet consumed by the renderer.
    pending_edits: VecDeque<WorldEdit>,
}

impl World {
    /// Creates a new, empty world over the given block registry.
    pub fn new(registry: Rc<BlockRegistry>) -> Self {
        World {
            registry,
            chunks: HashMap::new(),
            pending_edits: VecDeque::new(),
        }
    }

    /// The block registry this world's ids refer to.
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Adds or replaces the chunk at the given chunk coordinates.
    ///
    /// Ids the registry does not know are replaced with air.
    pub fn insert_chunk(&mut self, chunk_x: i32, chunk_z: i32, mut chunk: Chunk) {
        let max_id = self.registry.registered_ids();
        let unknown: Vec<_> = chunk
            .occupied_blocks()
            .filter(|&(_, id)| id as usize > max_id)
            .map(|(position, _)| position)
            .collect();
        if !unknown.is_empty() {
            log::warn!(
                "Chunk ({}, {}) holds {} unregistered block ids, replacing them with air",
                chunk_x,
                chunk_z,
                unknown.len()
            );
            for position in unknown {
                chunk.set(position.x, position.y, position.z, AIR_ID);
            }
        }

        self.chunks.insert(chunk_key(chunk_x, chunk_z), chunk);
        self.pending_edits
            .push_back(WorldEdit::Chunk { chunk_x, chunk_z });
        log::debug!("Loaded chunk ({}, {})", chunk_x, chunk_z);
    }

    /// Removes a chunk, returning it if it was loaded.
    pub fn remove_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Option<Chunk> {
        let chunk = self.chunks.remove(&chunk_key(chunk_x, chunk_z))?;
        self.pending_edits
            .push_back(WorldEdit::Unload { chunk_x, chunk_z });
        log::debug!("Unloaded chunk ({}, {})", chunk_x, chunk_z);
        Some(chunk)
    }

    /// Whether the chunk at the given chunk coordinates is loaded.
    pub fn has_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.chunks.contains_key(&chunk_key(chunk_x, chunk_z))
    }

    /// Borrows a loaded chunk.
    pub fn chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&Chunk> {
        self.chunks.get(&chunk_key(chunk_x, chunk_z))
    }

    /// The number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Gets the id of the block at world coordinates; air if unloaded.
    pub fn get_block_id(&self, x: i32, y: i32, z: i32) -> BlockId {
        let (chunk_x, rel_x) = split_coord(x);
        let (chunk_z, rel_z) = split_coord(z);
        match self.chunk(chunk_x, chunk_z) {
            Some(chunk) => chunk.get(rel_x, y, rel_z),
            None => self.registry.air().id(),
        }
    }

    /// Gets the prototype of the block at world coordinates.
    ///
    /// Never fails: unloaded chunks and out-of-range Y give the air prototype.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> &Block {
        self.registry.from_id(self.get_block_id(x, y, z))
    }

    /// Whether the block at world coordinates is an opaque cube.
    pub fn is_opaque_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_opaque_cube()
    }

    /// Whether the block at world coordinates is a fluid.
    pub fn is_fluid_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_fluid()
    }

    /// Whether a point lies inside a fluid block.
    pub fn is_underwater(&self, point: Point3<f32>) -> bool {
        let block = block_coords_at(point);
        self.is_fluid_at(block.x, block.y, block.z)
    }

    /// How much of a body of `height` standing at `feet` is under fluid.
    ///
    /// Only the fluid column starting at the block containing the feet counts.
    ///
    /// # Returns
    /// A value in `0.0..=height`.
    pub fn water_height(&self, feet: Point3<f32>, height: f32) -> f32 {
        let base = block_coords_at(feet);
        let max_y = block_coord_at(feet.y + height) + 1;

        let mut top = None;
        let mut y = base.y;
        while y <= max_y && self.is_fluid_at(base.x, y, base.z) {
            top = Some(y);
            y += 1;
        }

        match top {
            Some(top_y) => (top_y as f32 + 0.5 - feet.y).clamp(0.0, height),
            None => 0.0,
        }
    }

    /// Sets the block at world coordinates.
    ///
    /// # Returns
    /// `true` if the stored id changed. Writes into unloaded chunks or outside
    /// the world height are ignored and return `false`, as do writes that store
    /// the id already present or an id the registry does not know.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        if id as usize > self.registry.registered_ids() {
            log::warn!("Ignoring unregistered block id {} at ({}, {}, {})", id, x, y, z);
            return false;
        }
        let (chunk_x, rel_x) = split_coord(x);
        let (chunk_z, rel_z) = split_coord(z);
        let Some(chunk) = self.chunks.get_mut(&chunk_key(chunk_x, chunk_z)) else {
            log::warn!("Ignoring edit at ({}, {}, {}) in an unloaded chunk", x, y, z);
            return false;
        };

        match chunk.set(rel_x, y, rel_z, id) {
            Some(previous) if previous != id => {
                self.pending_edits.push_back(WorldEdit::Block { x, y, z });
                true
            }
            Some(_) => false,
            None => {
                log::warn!("Ignoring edit at ({}, {}, {}) outside the world height", x, y, z);
                false
            }
        }
    }

    /// Takes every edit recorded since the last drain, oldest first.
    pub fn drain_edits(&mut self) -> Vec<WorldEdit> {
        self.pending_edits.drain(..).collect()
    }

    /// The number of edits waiting to be drained.
    pub fn pending_edit_count(&self) -> usize {
        self.pending_edits.len()
    }

    /// Finds the first block along a ray.
    ///
    /// Starting from the voxel containing `origin`, steps through voxels along
    /// `direction` until one qualifies: an opaque cube, or a fluid when
    /// `hit_fluids` is set. The origin voxel itself is never tested.
    ///
    /// # Arguments
    /// * `origin` - Where the ray starts (usually the eye position)
    /// * `direction` - Unit direction of the ray
    /// * `max_dist` - Hits entered beyond this distance are ignored; must be finite
    /// * `offset` - Report the voxel just before the hit (for placing blocks)
    /// * `hit_fluids` - Whether fluid blocks stop the ray
    ///
    /// # Returns
    /// The hit, or `None` if nothing qualified within `max_dist`.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_dist: f32,
        offset: bool,
        hit_fluids: bool,
    ) -> Option<RaycastHit> {
        if !max_dist.is_finite() {
            return None;
        }
        let mut ray = Ray::new(origin, direction);
        loop {
            ray.next_face();
            // Written so that a NaN distance also stops the walk.
            if !(ray.distance() <= max_dist) {
                return None;
            }

            let voxel = ray.voxel();
            let block = self.get_block(voxel.x, voxel.y, voxel.z);
            if block.is_opaque_cube() || (hit_fluids && block.is_fluid()) {
                let face = ray.last_face();
                let position = if offset {
                    voxel + face.vector()
                } else {
                    voxel
                };
                return Some(RaycastHit {
                    position,
                    face,
                    distance: ray.distance(),
                });
            }
        }
    }
}
