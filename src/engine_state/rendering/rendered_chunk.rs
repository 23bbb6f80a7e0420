//! # Rendered Chunk Module
//!
//! A `RenderedChunk` is the cached visible geometry of one world chunk: the
//! list of block faces that are not hidden by a neighbouring opaque cube,
//! split into an opaque list and a translucent list.
//!
//! ## Face Rule
//!
//! A face of a non-air block `B` toward its neighbour `N` is visible iff `N`
//! is not an opaque cube and either `B` is an opaque cube or `N` is a
//! different block. The second half stops water from drawing the faces
//! between two water blocks. Neighbours are read through the [`World`], so
//! faces on a chunk border look across into the adjacent chunk (and treat an
//! unloaded chunk as air).
//!
//! ## Incremental Updates
//!
//! Faces are stored per block, keyed by `(block index, face id)`. Every
//! partial update recomputes the full face set of each touched block with the
//! same routine a from-scratch mesh uses, so after any sequence of updates the
//! lists hold exactly what [`RenderedChunk::prerender`] would build.
//!
//! Recomputed lists are only marked dirty when their contents actually
//! changed. [`RenderedChunk::update_buffers`] uploads dirty lists and does
//! nothing otherwise.

use std::collections::BTreeMap;

use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::engine_state::voxels::world::World;

use super::face_renderer::{FaceBufferId, FaceData, FaceRenderer};
use super::frustum::ViewFrustum;

/// Orders faces by block index, then face id.
fn face_key(index: usize, side: BlockSide) -> usize {
    index * 6 + side.id() as usize
}

/// One of the two face lists of a rendered chunk.
#[derive(Debug, Default)]
struct FaceList {
    buffer: Option<FaceBufferId>,
    faces: BTreeMap<usize, FaceData>,
    dirty: bool,
}

impl FaceList {
    fn set(&mut self, key: usize, face: Option<FaceData>) {
        let previous = match face {
            Some(face) => self.faces.insert(key, face),
            None => self.faces.remove(&key),
        };
        if previous != face {
            self.dirty = true;
        }
    }

    /// Empties the list for a rebuild, returning what it held.
    fn begin_rebuild(&mut self) -> (BTreeMap<usize, FaceData>, bool) {
        let previous = std::mem::take(&mut self.faces);
        (previous, std::mem::replace(&mut self.dirty, false))
    }

    /// Marks the list dirty only if the rebuild changed it.
    fn end_rebuild(&mut self, (previous, was_dirty): (BTreeMap<usize, FaceData>, bool)) {
        self.dirty = was_dirty || previous != self.faces;
    }

    fn collect(&self) -> Vec<FaceData> {
        self.faces.values().copied().collect()
    }

    fn flush(&mut self, sink: &mut dyn FaceRenderer) -> bool {
        let Some(buffer) = self.buffer else {
            return false;
        };
        if !self.dirty {
            return false;
        }
        sink.load(buffer, &self.collect());
        self.dirty = false;
        true
    }
}

/// Cached visible faces of the chunk at `(chunk_x, chunk_z)`.
///
/// # Lifecycle
///
/// 1. [`new`](Self::new) binds the chunk coordinates
/// 2. [`init`](Self::init) allocates the two sink buffers
/// 3. [`prerender`](Self::prerender) builds the full face lists
/// 4. `update_*` calls keep them in step with world edits
/// 5. [`destroy`](Self::destroy) frees the sink buffers
#[derive(Debug)]
pub struct RenderedChunk {
    chunk_x: i32,
    chunk_z: i32,
    opaque: FaceList,
    translucent: FaceList,
}

impl RenderedChunk {
    /// Creates an uninitialized rendered chunk for the given chunk coordinates.
    pub fn new(chunk_x: i32, chunk_z: i32) -> Self {
        RenderedChunk {
            chunk_x,
            chunk_z,
            opaque: FaceList::default(),
            translucent: FaceList::default(),
        }
    }

    /// Allocates the opaque and translucent buffers in `sink`.
    ///
    /// Does nothing if the chunk is already initialized.
    pub fn init(&mut self, sink: &mut dyn FaceRenderer) {
        if self.is_initialized() {
            return;
        }
        self.opaque.buffer = Some(sink.create_buffer());
        self.translucent.buffer = Some(sink.create_buffer());
        // Fresh buffers are empty, so whatever is cached must be uploaded.
        self.opaque.dirty = true;
        self.translucent.dirty = true;
    }

    /// Whether [`init`](Self::init) has allocated the sink buffers.
    pub fn is_initialized(&self) -> bool {
        self.opaque.buffer.is_some() && self.translucent.buffer.is_some()
    }

    /// The chunk coordinates this chunk renders.
    pub fn chunk_coords(&self) -> (i32, i32) {
        (self.chunk_x, self.chunk_z)
    }

    /// World position of chunk-relative (0, 0, 0).
    pub fn origin(&self) -> Point3<i32> {
        Point3::new(self.chunk_x * CHUNK_WIDTH, 0, self.chunk_z * CHUNK_WIDTH)
    }

    /// Rebuilds both face lists from scratch.
    pub fn prerender(&mut self, world: &World) {
        let opaque = self.opaque.begin_rebuild();
        let translucent = self.translucent.begin_rebuild();

        if let Some(chunk) = world.chunk(self.chunk_x, self.chunk_z) {
            for (position, _) in chunk.occupied_blocks() {
                self.prerender_block(world, position.x, position.y, position.z);
            }
        }
        self.opaque.end_rebuild(opaque);
        self.translucent.end_rebuild(translucent);
        log::debug!(
            "Meshed chunk ({}, {}): {} opaque, {} translucent faces",
            self.chunk_x,
            self.chunk_z,
            self.opaque.faces.len(),
            self.translucent.faces.len()
        );
    }

    /// Recomputes the faces of one block.
    ///
    /// Coordinates outside the chunk are ignored.
    pub fn prerender_block(&mut self, world: &World, rel_x: i32, y: i32, rel_z: i32) {
        let Some(index) = Chunk::index_of(rel_x, y, rel_z) else {
            return;
        };
        let x = self.chunk_x * CHUNK_WIDTH + rel_x;
        let z = self.chunk_z * CHUNK_WIDTH + rel_z;
        let block = world.get_block(x, y, z);

        for side in BlockSide::all() {
            let key = face_key(index, side);
            let face = if block.is_air() {
                None
            } else {
                let offset = side.vector();
                let neighbor = world.get_block(x + offset.x, y + offset.y, z + offset.z);
                let visible = !neighbor.is_opaque_cube()
                    && (block.is_opaque_cube() || neighbor.id() != block.id());
                visible.then(|| FaceData::new(rel_x, y, rel_z, side, block.face_texture(side)))
            };

            if block.is_opaque_cube() {
                self.opaque.set(key, face);
                self.translucent.set(key, None);
            } else {
                self.translucent.set(key, face);
                self.opaque.set(key, None);
            }
        }
    }

    /// Recomputes a block and its neighbours inside this chunk.
    pub fn update_block(&mut self, world: &World, rel_x: i32, y: i32, rel_z: i32) {
        self.prerender_block(world, rel_x, y, rel_z);
        for side in BlockSide::all() {
            let offset = side.vector();
            let (nx, ny, nz) = (rel_x + offset.x, y + offset.y, rel_z + offset.z);
            if Chunk::in_bounds(nx, ny, nz) {
                self.prerender_block(world, nx, ny, nz);
            }
        }
    }

    /// Recomputes every block with the given relative X.
    pub fn update_plane_x(&mut self, world: &World, rel_x: i32) {
        for y in 0..CHUNK_HEIGHT {
            for rel_z in 0..CHUNK_WIDTH {
                self.prerender_block(world, rel_x, y, rel_z);
            }
        }
    }

    /// Recomputes every block with the given relative Z.
    pub fn update_plane_z(&mut self, world: &World, rel_z: i32) {
        for y in 0..CHUNK_HEIGHT {
            for rel_x in 0..CHUNK_WIDTH {
                self.prerender_block(world, rel_x, y, rel_z);
            }
        }
    }

    /// Whether either face list changed since the last upload.
    pub fn has_pending_changes(&self) -> bool {
        self.opaque.dirty || self.translucent.dirty
    }

    /// Uploads changed face lists to the sink.
    ///
    /// # Returns
    /// `true` if anything was uploaded. Without pending changes, or before
    /// [`init`](Self::init), the sink is not touched.
    pub fn update_buffers(&mut self, sink: &mut dyn FaceRenderer) -> bool {
        let opaque = self.opaque.flush(sink);
        let translucent = self.translucent.flush(sink);
        opaque || translucent
    }

    /// Draws the opaque faces if the chunk passes the frustum test.
    ///
    /// # Returns
    /// `true` if a draw was issued.
    pub fn render(&self, sink: &mut dyn FaceRenderer, frustum: Option<&ViewFrustum>) -> bool {
        if !self.is_visible(frustum) {
            return false;
        }
        match self.opaque.buffer {
            Some(buffer) if !self.opaque.faces.is_empty() => {
                sink.draw(buffer, self.origin());
                true
            }
            _ => false,
        }
    }

    /// Draws the translucent faces if the chunk passes the frustum test.
    pub fn render_translucent(
        &self,
        sink: &mut dyn FaceRenderer,
        frustum: Option<&ViewFrustum>,
    ) -> bool {
        if !self.is_visible(frustum) {
            return false;
        }
        match self.translucent.buffer {
            Some(buffer) if !self.translucent.faces.is_empty() => {
                sink.draw(buffer, self.origin());
                true
            }
            _ => false,
        }
    }

    fn is_visible(&self, frustum: Option<&ViewFrustum>) -> bool {
        frustum.map_or(true, |f| f.intersects_chunk(self.chunk_x, self.chunk_z))
    }

    /// Frees the sink buffers. The chunk can be initialized again afterwards.
    pub fn destroy(&mut self, sink: &mut dyn FaceRenderer) {
        for list in [&mut self.opaque, &mut self.translucent] {
            if let Some(buffer) = list.buffer.take() {
                sink.delete_buffer(buffer);
            }
        }
    }

    /// The opaque faces, ordered by block index then face id.
    pub fn opaque_faces(&self) -> Vec<FaceData> {
        self.opaque.collect()
    }

    /// The translucent faces, ordered by block index then face id.
    pub fn translucent_faces(&self) -> Vec<FaceData> {
        self.translucent.collect()
    }

    /// The opaque buffer handle, once initialized.
    pub fn opaque_buffer(&self) -> Option<FaceBufferId> {
        self.opaque.buffer
    }

    /// The translucent buffer handle, once initialized.
    pub fn translucent_buffer(&self) -> Option<FaceBufferId> {
        self.translucent.buffer
    }
}
