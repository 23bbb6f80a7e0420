//! # Chunk Iteration Module
//!
//! This module provides an iterator over all non-air blocks in a chunk.
//!
//! ## Occupancy-Aware Iteration
//!
//! The `ChunkBlockIterator` walks the chunk's `solid_array` bit vector rather
//! than the block vector, jumping straight to the next set bit. Mostly-empty
//! chunks (the sky half of every column) are therefore skipped a machine word at
//! a time instead of block by block.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockId;

use super::Chunk;

/// An iterator over all non-air blocks in a chunk, in block index order.
///
/// Yields chunk-relative positions together with the block id stored there.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Index of the next position in the solid array to examine
    current_solid_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned before the first block.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_solid_offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockId);

    fn next(&mut self) -> Option<Self::Item> {
        let solid_array = &self.chunk_ref.solid_array;
        if self.current_solid_offset >= solid_array.len() {
            return None;
        }

        let skipped = solid_array[self.current_solid_offset..].first_one()?;
        let index = self.current_solid_offset + skipped;
        self.current_solid_offset = index + 1;

        let (rel_x, y, rel_z) = Chunk::position_of(index);
        Some((Point3::new(rel_x, y, rel_z), self.chunk_ref.blocks[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{DIRT_ID, STONE_ID};

    #[test]
    fn yields_only_occupied_blocks_in_index_order() {
        let mut chunk = Chunk::empty();
        chunk.set(5, 60, 5, STONE_ID);
        chunk.set(0, 0, 0, DIRT_ID);
        chunk.set(15, 127, 15, STONE_ID);

        let blocks: Vec<_> = chunk.occupied_blocks().collect();
        assert_eq!(
            blocks,
            vec![
                (Point3::new(0, 0, 0), DIRT_ID),
                (Point3::new(5, 60, 5), STONE_ID),
                (Point3::new(15, 127, 15), STONE_ID),
            ]
        );
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        assert_eq!(Chunk::empty().occupied_blocks().count(), 0);
    }
}
