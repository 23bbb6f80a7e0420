//! # Chunk Renderer Module
//!
//! Decides which chunks are meshed and drawn, and routes world edits to the
//! meshes they affect.
//!
//! ## Visibility Cache
//!
//! Rendered chunks live in an LRU cache keyed by packed chunk key. A chunk is
//! meshed the first time the render pass reaches it, and every draw marks it
//! recently used, so the chunks that fall out of the cache are the ones that
//! have been out of view the longest. Evicted chunks free their sink buffers.
//!
//! ## Edit Dispatch
//!
//! [`ChunkRenderer::update_blocks`] drains the world's edit queue and turns
//! each [`WorldEdit`] into [`MeshUpdate`]s:
//!
//! | Edit | Mesh updates |
//! |------|--------------|
//! | block inside a chunk | that block and its neighbours |
//! | block on a chunk border | the above, plus the facing plane of the neighbour chunk |
//! | chunk loaded | full re-mesh, plus the facing plane of all four neighbours |
//! | chunk unloaded | its mesh is dropped, plus the facing plane of all four neighbours |
//!
//! Every touched chunk uploads its buffers once, after all edits of the frame
//! have been applied.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::core::spiral_iterator::SpiralIterator;
use crate::engine_state::voxels::chunk::CHUNK_WIDTH;
use crate::engine_state::voxels::world::{chunk_key, split_coord, World, WorldEdit};

use super::face_renderer::FaceRenderer;
use super::frustum::ViewFrustum;
use super::rendered_chunk::RenderedChunk;

/// A unit of re-meshing work for one rendered chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshUpdate {
    /// Re-evaluate one block and its in-chunk neighbours.
    #[allow(missing_docs)]
    Block {
        chunk_x: i32,
        chunk_z: i32,
        rel_x: i32,
        y: i32,
        rel_z: i32,
    },
    /// Re-evaluate the plane of blocks with the given relative X.
    #[allow(missing_docs)]
    PlaneX { chunk_x: i32, chunk_z: i32, rel_x: i32 },
    /// Re-evaluate the plane of blocks with the given relative Z.
    #[allow(missing_docs)]
    PlaneZ { chunk_x: i32, chunk_z: i32, rel_z: i32 },
    /// Rebuild the whole chunk.
    #[allow(missing_docs)]
    Full { chunk_x: i32, chunk_z: i32 },
}

impl MeshUpdate {
    /// The chunk this update applies to.
    pub fn chunk_coords(&self) -> (i32, i32) {
        match *self {
            MeshUpdate::Block { chunk_x, chunk_z, .. }
            | MeshUpdate::PlaneX { chunk_x, chunk_z, .. }
            | MeshUpdate::PlaneZ { chunk_x, chunk_z, .. }
            | MeshUpdate::Full { chunk_x, chunk_z } => (chunk_x, chunk_z),
        }
    }

    /// The mesh updates a world edit requires.
    pub fn for_edit(edit: WorldEdit) -> Vec<MeshUpdate> {
        match edit {
            WorldEdit::Block { x, y, z } => {
                let (chunk_x, rel_x) = split_coord(x);
                let (chunk_z, rel_z) = split_coord(z);
                let mut updates = vec![MeshUpdate::Block {
                    chunk_x,
                    chunk_z,
                    rel_x,
                    y,
                    rel_z,
                }];
                if rel_x == 0 {
                    updates.push(MeshUpdate::PlaneX {
                        chunk_x: chunk_x - 1,
                        chunk_z,
                        rel_x: CHUNK_WIDTH - 1,
                    });
                } else if rel_x == CHUNK_WIDTH - 1 {
                    updates.push(MeshUpdate::PlaneX {
                        chunk_x: chunk_x + 1,
                        chunk_z,
                        rel_x: 0,
                    });
                }
                if rel_z == 0 {
                    updates.push(MeshUpdate::PlaneZ {
                        chunk_x,
                        chunk_z: chunk_z - 1,
                        rel_z: CHUNK_WIDTH - 1,
                    });
                } else if rel_z == CHUNK_WIDTH - 1 {
                    updates.push(MeshUpdate::PlaneZ {
                        chunk_x,
                        chunk_z: chunk_z + 1,
                        rel_z: 0,
                    });
                }
                updates
            }
            WorldEdit::Chunk { chunk_x, chunk_z } => {
                let mut updates = vec![MeshUpdate::Full { chunk_x, chunk_z }];
                updates.extend(Self::neighbor_planes(chunk_x, chunk_z));
                updates
            }
            WorldEdit::Unload { chunk_x, chunk_z } => {
                Self::neighbor_planes(chunk_x, chunk_z).to_vec()
            }
        }
    }

    /// The planes of the four neighbouring chunks that face the given chunk.
    pub fn neighbor_planes(chunk_x: i32, chunk_z: i32) -> [MeshUpdate; 4] {
        let last = CHUNK_WIDTH - 1;
        [
            MeshUpdate::PlaneX { chunk_x: chunk_x - 1, chunk_z, rel_x: last },
            MeshUpdate::PlaneX { chunk_x: chunk_x + 1, chunk_z, rel_x: 0 },
            MeshUpdate::PlaneZ { chunk_x, chunk_z: chunk_z - 1, rel_z: last },
            MeshUpdate::PlaneZ { chunk_x, chunk_z: chunk_z + 1, rel_z: 0 },
        ]
    }
}

/// Orchestrates meshing and drawing of the chunks around the camera.
pub struct ChunkRenderer {
    /// Rendered chunks by packed chunk key, least recently drawn first out.
    rendered_chunks: LruCache<u64, RenderedChunk>,
}

impl ChunkRenderer {
    /// Creates a renderer that keeps at most `capacity` chunks meshed.
    pub fn new(capacity: NonZeroUsize) -> Self {
        ChunkRenderer {
            rendered_chunks: LruCache::new(capacity),
        }
    }

    /// Creates a renderer sized for a render distance: twice the number of
    /// chunks in the render window.
    pub fn for_render_distance(render_distance: i32) -> Self {
        let side = 2 * render_distance.max(0) as usize + 1;
        let capacity = NonZeroUsize::new(2 * side * side).unwrap_or(NonZeroUsize::MIN);
        Self::new(capacity)
    }

    /// Whether the chunk at the given chunk coordinates is currently meshed.
    pub fn is_chunk_rendered(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.rendered_chunks.contains(&chunk_key(chunk_x, chunk_z))
    }

    /// The number of meshed chunks.
    pub fn rendered_chunk_count(&self) -> usize {
        self.rendered_chunks.len()
    }

    /// Borrows a meshed chunk without marking it used.
    pub fn rendered_chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&RenderedChunk> {
        self.rendered_chunks.peek(&chunk_key(chunk_x, chunk_z))
    }

    /// Drops every meshed chunk and frees its buffers.
    pub fn reset(&mut self, sink: &mut dyn FaceRenderer) {
        let count = self.rendered_chunks.len();
        while let Some((_, mut chunk)) = self.rendered_chunks.pop_lru() {
            chunk.destroy(sink);
        }
        log::info!("Chunk renderer reset, dropped {} meshes", count);
    }

    /// Applies every pending world edit to the affected meshes.
    ///
    /// Must run before [`render`](Self::render) in a frame.
    ///
    /// # Returns
    /// The number of edits drained.
    pub fn update_blocks(&mut self, world: &mut World, sink: &mut dyn FaceRenderer) -> usize {
        let edits = world.drain_edits();
        if edits.is_empty() {
            return 0;
        }

        let mut touched = BTreeSet::new();
        for edit in &edits {
            if let WorldEdit::Unload { chunk_x, chunk_z } = *edit {
                self.discard(sink, chunk_x, chunk_z);
            }
            for update in MeshUpdate::for_edit(*edit) {
                log::trace!("{:?} -> {:?}", edit, update);
                self.apply(world, update, &mut touched);
            }
        }
        self.flush(sink, &touched);

        log::debug!(
            "Applied {} world edits to {} meshes",
            edits.len(),
            touched.len()
        );
        edits.len()
    }

    /// Meshes and draws the opaque geometry around the camera chunk.
    ///
    /// Walks the spiral outward from the camera to `render_distance`. Loaded
    /// chunks that are not meshed yet are meshed on the spot, and the chunks
    /// that pass the frustum test are drawn nearest first.
    ///
    /// # Returns
    /// The number of chunks drawn.
    pub fn render(
        &mut self,
        world: &World,
        sink: &mut dyn FaceRenderer,
        camera_chunk_x: i32,
        camera_chunk_z: i32,
        render_distance: i32,
        frustum: Option<&ViewFrustum>,
    ) -> usize {
        let mut drawn = 0;
        let window = SpiralIterator::within(camera_chunk_x, camera_chunk_z, render_distance);
        for (chunk_x, chunk_z) in window {
            if !world.has_chunk(chunk_x, chunk_z) {
                continue;
            }
            if !self.is_chunk_rendered(chunk_x, chunk_z) {
                self.prerender_chunk(world, sink, chunk_x, chunk_z);
            }
            if let Some(chunk) = self.rendered_chunks.get(&chunk_key(chunk_x, chunk_z)) {
                if chunk.render(sink, frustum) {
                    drawn += 1;
                }
            }
        }
        drawn
    }

    /// Draws the translucent geometry of the meshed chunks around the camera,
    /// farthest first.
    pub fn render_translucent(
        &self,
        sink: &mut dyn FaceRenderer,
        camera_chunk_x: i32,
        camera_chunk_z: i32,
        render_distance: i32,
        frustum: Option<&ViewFrustum>,
    ) -> usize {
        let window: Vec<(i32, i32)> =
            SpiralIterator::within(camera_chunk_x, camera_chunk_z, render_distance).collect();
        let mut drawn = 0;
        for (chunk_x, chunk_z) in window.into_iter().rev() {
            let Some(chunk) = self.rendered_chunks.peek(&chunk_key(chunk_x, chunk_z)) else {
                continue;
            };
            if chunk.render_translucent(sink, frustum) {
                drawn += 1;
            }
        }
        drawn
    }

    /// Creates and meshes the chunk, then refreshes the neighbour planes that
    /// face it.
    fn prerender_chunk(
        &mut self,
        world: &World,
        sink: &mut dyn FaceRenderer,
        chunk_x: i32,
        chunk_z: i32,
    ) {
        let mut chunk = RenderedChunk::new(chunk_x, chunk_z);
        chunk.init(sink);
        chunk.prerender(world);

        if let Some((evicted_key, mut evicted)) =
            self.rendered_chunks.push(chunk_key(chunk_x, chunk_z), chunk)
        {
            if evicted_key != chunk_key(chunk_x, chunk_z) {
                let (evicted_x, evicted_z) = evicted.chunk_coords();
                log::debug!("Evicted mesh of chunk ({}, {})", evicted_x, evicted_z);
            }
            evicted.destroy(sink);
        }

        let mut touched = BTreeSet::new();
        touched.insert(chunk_key(chunk_x, chunk_z));
        for update in MeshUpdate::neighbor_planes(chunk_x, chunk_z) {
            self.apply(world, update, &mut touched);
        }
        self.flush(sink, &touched);
    }

    /// Drops the mesh of an unloaded chunk and frees its buffers.
    fn discard(&mut self, sink: &mut dyn FaceRenderer, chunk_x: i32, chunk_z: i32) {
        if let Some(mut chunk) = self.rendered_chunks.pop(&chunk_key(chunk_x, chunk_z)) {
            chunk.destroy(sink);
            log::debug!("Dropped mesh of unloaded chunk ({}, {})", chunk_x, chunk_z);
        }
    }

    /// Applies one update if its chunk is meshed, recording the chunk as touched.
    fn apply(&mut self, world: &World, update: MeshUpdate, touched: &mut BTreeSet<u64>) {
        let (chunk_x, chunk_z) = update.chunk_coords();
        let key = chunk_key(chunk_x, chunk_z);
        let Some(chunk) = self.rendered_chunks.peek_mut(&key) else {
            return;
        };

        match update {
            MeshUpdate::Block { rel_x, y, rel_z, .. } => chunk.update_block(world, rel_x, y, rel_z),
            MeshUpdate::PlaneX { rel_x, .. } => chunk.update_plane_x(world, rel_x),
            MeshUpdate::PlaneZ { rel_z, .. } => chunk.update_plane_z(world, rel_z),
            MeshUpdate::Full { .. } => chunk.prerender(world),
        }
        touched.insert(key);
    }

    fn flush(&mut self, sink: &mut dyn FaceRenderer, touched: &BTreeSet<u64>) {
        for key in touched {
            if let Some(chunk) = self.rendered_chunks.peek_mut(key) {
                chunk.update_buffers(sink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::engine_state::rendering::face_renderer::MemoryFaceRenderer;
    use crate::engine_state::voxels::block::{BlockRegistry, STONE_ID};
    use crate::engine_state::voxels::chunk::Chunk;

    fn world(radius: i32) -> World {
        let mut world = World::new(Rc::new(BlockRegistry::register_all()));
        for chunk_x in -radius..=radius {
            for chunk_z in -radius..=radius {
                world.insert_chunk(chunk_x, chunk_z, Chunk::empty());
            }
        }
        world
    }

    #[test]
    fn border_edits_add_neighbor_planes() {
        let updates = MeshUpdate::for_edit(WorldEdit::Block { x: 16, y: 4, z: 31 });
        assert_eq!(
            updates,
            vec![
                MeshUpdate::Block { chunk_x: 1, chunk_z: 1, rel_x: 0, y: 4, rel_z: 15 },
                MeshUpdate::PlaneX { chunk_x: 0, chunk_z: 1, rel_x: 15 },
                MeshUpdate::PlaneZ { chunk_x: 1, chunk_z: 2, rel_z: 0 },
            ]
        );
        assert_eq!(
            MeshUpdate::for_edit(WorldEdit::Block { x: 5, y: 4, z: 5 }).len(),
            1
        );
    }

    #[test]
    fn chunk_loads_refresh_all_neighbors() {
        let updates = MeshUpdate::for_edit(WorldEdit::Chunk { chunk_x: 2, chunk_z: -1 });
        assert_eq!(updates.len(), 5);
        assert_eq!(updates[0], MeshUpdate::Full { chunk_x: 2, chunk_z: -1 });
        let neighbors: Vec<_> = updates[1..].iter().map(MeshUpdate::chunk_coords).collect();
        assert_eq!(neighbors, [(1, -1), (3, -1), (2, -2), (2, 0)]);
    }

    #[test]
    fn unloads_refresh_only_the_neighbors() {
        let updates = MeshUpdate::for_edit(WorldEdit::Unload { chunk_x: 0, chunk_z: 0 });
        assert_eq!(updates, MeshUpdate::neighbor_planes(0, 0).to_vec());
    }

    #[test]
    fn render_meshes_loaded_chunks_within_distance() {
        let mut world = world(3);
        world.set_block(0, 0, 0, STONE_ID);
        world.drain_edits();
        let mut sink = MemoryFaceRenderer::new();
        let mut renderer = ChunkRenderer::for_render_distance(1);

        let drawn = renderer.render(&world, &mut sink, 0, 0, 1, None);
        assert_eq!(renderer.rendered_chunk_count(), 9);
        assert_eq!(drawn, 1);
        assert!(renderer.is_chunk_rendered(-1, 1));
        assert!(!renderer.is_chunk_rendered(2, 0));
        assert_eq!(sink.buffer_count(), 18);
    }

    #[test]
    fn negative_render_distance_meshes_nothing() {
        let world = world(1);
        let mut sink = MemoryFaceRenderer::new();
        let mut renderer = ChunkRenderer::for_render_distance(1);
        assert_eq!(renderer.render(&world, &mut sink, 0, 0, -1, None), 0);
        assert_eq!(renderer.rendered_chunk_count(), 0);
        assert_eq!(sink.buffer_count(), 0);
    }

    #[test]
    fn unloaded_chunks_are_skipped() {
        let world = world(0);
        let mut sink = MemoryFaceRenderer::new();
        let mut renderer = ChunkRenderer::for_render_distance(2);
        renderer.render(&world, &mut sink, 0, 0, 2, None);
        assert_eq!(renderer.rendered_chunk_count(), 1);
    }

    #[test]
    fn eviction_frees_buffers() {
        let world = world(3);
        let mut sink = MemoryFaceRenderer::new();
        let mut renderer = ChunkRenderer::new(NonZeroUsize::new(4).unwrap());
        renderer.render(&world, &mut sink, 0, 0, 1, None);
        assert_eq!(renderer.rendered_chunk_count(), 4);
        assert_eq!(sink.buffer_count(), 8);
    }

    #[test]
    fn reset_drops_everything() {
        let world = world(1);
        let mut sink = MemoryFaceRenderer::new();
        let mut renderer = ChunkRenderer::for_render_distance(1);
        renderer.render(&world, &mut sink, 0, 0, 1, None);
        renderer.reset(&mut sink);
        assert_eq!(renderer.rendered_chunk_count(), 0);
        assert_eq!(sink.buffer_count(), 0);
    }

    #[test]
    fn update_blocks_drains_the_queue() {
        let mut world = world(1);
        let mut sink = MemoryFaceRenderer::new();
        let mut renderer = ChunkRenderer::for_render_distance(1);
        renderer.update_blocks(&mut world, &mut sink);
        renderer.render(&world, &mut sink, 0, 0, 1, None);

        world.set_block(3, 3, 3, STONE_ID);
        assert_eq!(renderer.update_blocks(&mut world, &mut sink), 1);
        assert_eq!(world.pending_edit_count(), 0);
        let chunk = renderer.rendered_chunk(0, 0).unwrap();
        assert_eq!(chunk.opaque_faces().len(), 6);
        assert!(!chunk.has_pending_changes());
    }
}
