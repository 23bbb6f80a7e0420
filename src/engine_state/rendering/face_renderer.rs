//! # Face Renderer Module
//!
//! The boundary between the mesher and whatever draws its output.
//!
//! Meshes are lists of [`FaceData`] records, one per visible block face. A
//! [`FaceRenderer`] owns the buffers those lists are loaded into and knows how
//! to draw them; the mesher only ever holds opaque [`FaceBufferId`] handles.
//!
//! [`MemoryFaceRenderer`] keeps every buffer in memory and records what was
//! drawn. It is what the demo binary and the tests render into.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::textures::TextureId;

/// One visible block face, positioned relative to its buffer's origin.
///
/// Laid out as five bytes so a face list can be uploaded with
/// `bytemuck::cast_slice` and no conversion.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct FaceData {
    /// Block X relative to the buffer origin.
    pub x: u8,
    /// Block Y relative to the buffer origin.
    pub y: u8,
    /// Block Z relative to the buffer origin.
    pub z: u8,
    /// Face id, see [`BlockSide`].
    pub face: u8,
    /// Texture drawn on the face.
    pub texture: TextureId,
}

impl FaceData {
    /// Builds a face record from chunk-relative coordinates.
    ///
    /// Coordinates must lie inside a chunk, which always fits in a byte.
    pub fn new(rel_x: i32, y: i32, rel_z: i32, side: BlockSide, texture: TextureId) -> Self {
        FaceData {
            x: rel_x as u8,
            y: y as u8,
            z: rel_z as u8,
            face: side.id(),
            texture,
        }
    }

    /// The side this face belongs to.
    pub fn side(&self) -> Option<BlockSide> {
        BlockSide::from_id(self.face)
    }
}

/// Handle to a buffer owned by a [`FaceRenderer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceBufferId(pub u32);

/// A sink for face lists.
///
/// Implementations own all buffer storage. Callers create a buffer, load it
/// with a complete face list whenever its contents change, draw it as often as
/// they like, and delete it when done.
pub trait FaceRenderer {
    /// Allocates a new, empty buffer.
    fn create_buffer(&mut self) -> FaceBufferId;

    /// Replaces the contents of `buffer` with `faces`.
    fn load(&mut self, buffer: FaceBufferId, faces: &[FaceData]);

    /// Draws `buffer` with its face coordinates offset by `origin`.
    fn draw(&mut self, buffer: FaceBufferId, origin: Point3<i32>);

    /// Frees `buffer`. The id must not be used afterwards.
    fn delete_buffer(&mut self, buffer: FaceBufferId);
}

/// Usage statistics for one in-memory buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Bytes currently stored in the buffer.
    pub used_memory: u64,
    /// Number of times the buffer has been loaded.
    pub times_written: u64,
    /// Number of times the buffer has been drawn.
    pub times_drawn: u64,
}

/// A draw recorded by [`MemoryFaceRenderer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    /// The buffer that was drawn.
    pub buffer: FaceBufferId,
    /// The origin it was drawn at.
    pub origin: Point3<i32>,
    /// How many faces it held at the time.
    pub face_count: usize,
}

#[derive(Debug, Default)]
struct MemoryBuffer {
    faces: Vec<FaceData>,
    analytics: BufferAnalytics,
}

/// A [`FaceRenderer`] that keeps every buffer in memory.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::rendering::face_renderer::{FaceRenderer, MemoryFaceRenderer};
///
/// let mut renderer = MemoryFaceRenderer::new();
/// let buffer = renderer.create_buffer();
/// renderer.load(buffer, &[]);
/// renderer.draw(buffer, Point3::new(0, 0, 0));
/// assert_eq!(renderer.take_draws().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryFaceRenderer {
    buffers: HashMap<FaceBufferId, MemoryBuffer>,
    next_id: u32,
    draws: Vec<DrawCall>,
}

impl MemoryFaceRenderer {
    /// Creates a renderer with no buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The faces currently loaded into `buffer`.
    pub fn faces(&self, buffer: FaceBufferId) -> Option<&[FaceData]> {
        self.buffers.get(&buffer).map(|b| b.faces.as_slice())
    }

    /// Usage statistics for `buffer`.
    pub fn analytics(&self, buffer: FaceBufferId) -> Option<BufferAnalytics> {
        self.buffers.get(&buffer).map(|b| b.analytics)
    }

    /// The number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Total loads across all live buffers.
    pub fn total_writes(&self) -> u64 {
        self.buffers
            .values()
            .fold(0, |acc, buffer| acc + buffer.analytics.times_written)
    }

    /// Total bytes stored across all live buffers.
    pub fn total_used_memory(&self) -> u64 {
        self.buffers
            .values()
            .fold(0, |acc, buffer| acc + buffer.analytics.used_memory)
    }

    /// Returns the draws recorded since the last call and clears the record.
    pub fn take_draws(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draws)
    }
}

impl FaceRenderer for MemoryFaceRenderer {
    fn create_buffer(&mut self) -> FaceBufferId {
        let id = FaceBufferId(self.next_id);
        self.next_id += 1;
        self.buffers.insert(id, MemoryBuffer::default());
        id
    }

    fn load(&mut self, buffer: FaceBufferId, faces: &[FaceData]) {
        let Some(stored) = self.buffers.get_mut(&buffer) else {
            log::warn!("Load into unknown face buffer {:?}", buffer);
            return;
        };
        stored.faces.clear();
        stored.faces.extend_from_slice(faces);
        stored.analytics.used_memory = bytemuck::cast_slice::<FaceData, u8>(faces).len() as u64;
        stored.analytics.times_written += 1;
    }

    fn draw(&mut self, buffer: FaceBufferId, origin: Point3<i32>) {
        let Some(stored) = self.buffers.get_mut(&buffer) else {
            log::warn!("Draw of unknown face buffer {:?}", buffer);
            return;
        };
        stored.analytics.times_drawn += 1;
        self.draws.push(DrawCall {
            buffer,
            origin,
            face_count: stored.faces.len(),
        });
    }

    fn delete_buffer(&mut self, buffer: FaceBufferId) {
        if self.buffers.remove(&buffer).is_none() {
            log::warn!("Delete of unknown face buffer {:?}", buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_data_is_five_bytes() {
        assert_eq!(std::mem::size_of::<FaceData>(), 5);
        let face = FaceData::new(15, 127, 3, BlockSide::TOP, 4);
        assert_eq!(bytemuck::bytes_of(&face), &[15, 127, 3, 5, 4]);
        assert_eq!(face.side(), Some(BlockSide::TOP));
    }

    #[test]
    fn loads_replace_contents_and_count_writes() {
        let mut renderer = MemoryFaceRenderer::new();
        let buffer = renderer.create_buffer();
        let a = FaceData::new(0, 0, 0, BlockSide::FRONT, 1);
        let b = FaceData::new(1, 0, 0, BlockSide::BACK, 1);

        renderer.load(buffer, &[a, b]);
        renderer.load(buffer, &[b]);
        assert_eq!(renderer.faces(buffer), Some(&[b][..]));
        let analytics = renderer.analytics(buffer).unwrap();
        assert_eq!(analytics.times_written, 2);
        assert_eq!(analytics.used_memory, 5);
    }

    #[test]
    fn deleted_buffers_are_gone() {
        let mut renderer = MemoryFaceRenderer::new();
        let first = renderer.create_buffer();
        let second = renderer.create_buffer();
        assert_ne!(first, second);

        renderer.delete_buffer(first);
        assert_eq!(renderer.buffer_count(), 1);
        assert!(renderer.faces(first).is_none());
        renderer.draw(first, Point3::new(0, 0, 0));
        assert!(renderer.take_draws().is_empty());
    }
}
