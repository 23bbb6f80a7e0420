//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size column of block ids
//! that is the unit of storage and of meshing.
//!
//! The world is a 2D grid of full-height chunks, so a chunk spans
//! `CHUNK_WIDTH` blocks along X and Z and the whole world height along Y.
//!
//! ## Memory Layout
//!
//! Blocks are stored as one flat vector of [`BlockId`]s, Y-major:
//! `index = rel_x + CHUNK_WIDTH * (rel_z + CHUNK_WIDTH * y)`. Alongside it a
//! bit vector (`solid_array`) records which positions are not air, so iteration
//! over the occupied blocks can skip empty space a word at a time.
//!
//! ### Performance Characteristics
//! - **Block Lookup**: O(1)
//! - **Block Write**: O(1), keeps `solid_array` in sync
//! - **Occupied Iteration**: proportional to the number of non-air blocks plus
//!   one scan of the bit vector

use bitvec::prelude::BitVec;
use serde::{Deserialize, Serialize};

use super::block::{BlockId, AIR_ID};

pub mod chunk_iteration;

use chunk_iteration::ChunkBlockIterator;

/// The width of a chunk along X and Z, in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// The height of a chunk (and of the world) along Y, in blocks.
pub const CHUNK_HEIGHT: i32 = 128;
/// The number of blocks in one horizontal layer of a chunk.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_WIDTH * CHUNK_WIDTH) as usize;
/// The total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_PLANE_SIZE * CHUNK_HEIGHT as usize;

/// A `CHUNK_WIDTH` x `CHUNK_HEIGHT` x `CHUNK_WIDTH` grid of block ids.
///
/// All accessors take chunk-relative coordinates and are bounds-checked:
/// reading outside the chunk yields air, writing outside it does nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChunkData", into = "ChunkData")]
pub struct Chunk {
    /// Block ids in Y-major order.
    blocks: Vec<BlockId>,

    /// One bit per block, set when the block is not air.
    solid_array: BitVec,
}

/// The serialized form of a chunk: just the block ids.
///
/// This is the boundary handed to whatever persists chunks; the occupancy bit
/// vector is rebuilt on load.
#[derive(Serialize, Deserialize)]
pub struct ChunkData {
    /// Block ids in the same Y-major order `Chunk` uses.
    pub blocks: Vec<BlockId>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty() -> Self {
        Chunk {
            blocks: vec![AIR_ID; CHUNK_VOLUME],
            solid_array: BitVec::repeat(false, CHUNK_VOLUME),
        }
    }

    /// Creates a new chunk with every block set to `id`.
    pub fn filled(id: BlockId) -> Self {
        Chunk {
            blocks: vec![id; CHUNK_VOLUME],
            solid_array: BitVec::repeat(id != AIR_ID, CHUNK_VOLUME),
        }
    }

    /// Whether the chunk-relative coordinates lie inside the chunk.
    pub fn in_bounds(rel_x: i32, y: i32, rel_z: i32) -> bool {
        (0..CHUNK_WIDTH).contains(&rel_x)
            && (0..CHUNK_HEIGHT).contains(&y)
            && (0..CHUNK_WIDTH).contains(&rel_z)
    }

    /// Converts chunk-relative coordinates to an index into the block vector.
    ///
    /// # Returns
    /// `None` if the coordinates lie outside the chunk.
    pub fn index_of(rel_x: i32, y: i32, rel_z: i32) -> Option<usize> {
        if !Self::in_bounds(rel_x, y, rel_z) {
            return None;
        }
        Some((rel_x + CHUNK_WIDTH * (rel_z + CHUNK_WIDTH * y)) as usize)
    }

    /// Converts a block vector index back into chunk-relative coordinates.
    pub fn position_of(index: usize) -> (i32, i32, i32) {
        let index = index as i32;
        let rel_x = index % CHUNK_WIDTH;
        let rel_z = (index / CHUNK_WIDTH) % CHUNK_WIDTH;
        let y = index / (CHUNK_WIDTH * CHUNK_WIDTH);
        (rel_x, y, rel_z)
    }

    /// Gets the block id at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// The stored id, or [`AIR_ID`] if the coordinates are out of bounds.
    pub fn get(&self, rel_x: i32, y: i32, rel_z: i32) -> BlockId {
        match Self::index_of(rel_x, y, rel_z) {
            Some(index) => self.blocks[index],
            None => AIR_ID,
        }
    }

    /// Sets the block id at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// The id previously stored there, or `None` if the coordinates are out of
    /// bounds (in which case nothing is written).
    pub fn set(&mut self, rel_x: i32, y: i32, rel_z: i32, id: BlockId) -> Option<BlockId> {
        let index = Self::index_of(rel_x, y, rel_z)?;
        let previous = std::mem::replace(&mut self.blocks[index], id);
        self.solid_array.set(index, id != AIR_ID);
        Some(previous)
    }

    /// Whether the block at the given coordinates is anything other than air.
    pub fn is_occupied(&self, rel_x: i32, y: i32, rel_z: i32) -> bool {
        Self::index_of(rel_x, y, rel_z).is_some_and(|index| self.solid_array[index])
    }

    /// The number of non-air blocks in the chunk.
    pub fn occupied_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Whether the chunk contains only air.
    pub fn is_empty(&self) -> bool {
        self.solid_array.not_any()
    }

    /// The Y of the highest non-air block in a column.
    pub fn highest_block(&self, rel_x: i32, rel_z: i32) -> Option<i32> {
        (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| self.is_occupied(rel_x, y, rel_z))
    }

    /// Iterates over every non-air block together with its position.
    pub fn occupied_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Chunk> for ChunkData {
    fn from(chunk: Chunk) -> Self {
        ChunkData {
            blocks: chunk.blocks,
        }
    }
}

impl TryFrom<ChunkData> for Chunk {
    type Error = String;

    fn try_from(data: ChunkData) -> Result<Self, Self::Error> {
        if data.blocks.len() != CHUNK_VOLUME {
            return Err(format!(
                "chunk holds {} blocks, expected {}",
                data.blocks.len(),
                CHUNK_VOLUME
            ));
        }
        let solid_array = data.blocks.iter().map(|&id| id != AIR_ID).collect();
        Ok(Chunk {
            blocks: data.blocks,
            solid_array,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{DIRT_ID, STONE_ID};

    #[test]
    fn out_of_range_reads_are_air() {
        let chunk = Chunk::filled(STONE_ID);
        assert_eq!(chunk.get(0, 0, 0), STONE_ID);
        assert_eq!(chunk.get(-1, 0, 0), AIR_ID);
        assert_eq!(chunk.get(0, CHUNK_HEIGHT, 0), AIR_ID);
        assert_eq!(chunk.get(0, 0, CHUNK_WIDTH), AIR_ID);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut chunk = Chunk::empty();
        assert_eq!(chunk.set(CHUNK_WIDTH, 0, 0, STONE_ID), None);
        assert_eq!(chunk.set(0, -1, 0, STONE_ID), None);
        assert!(chunk.is_empty());
    }

    #[test]
    fn set_tracks_occupancy() {
        let mut chunk = Chunk::empty();
        assert_eq!(chunk.set(3, 40, 7, DIRT_ID), Some(AIR_ID));
        assert!(chunk.is_occupied(3, 40, 7));
        assert_eq!(chunk.occupied_count(), 1);
        assert_eq!(chunk.highest_block(3, 7), Some(40));

        assert_eq!(chunk.set(3, 40, 7, AIR_ID), Some(DIRT_ID));
        assert!(chunk.is_empty());
        assert_eq!(chunk.highest_block(3, 7), None);
    }

    #[test]
    fn index_and_position_agree() {
        for &(x, y, z) in &[(0, 0, 0), (15, 0, 0), (0, 0, 15), (4, 99, 11), (15, 127, 15)] {
            let index = Chunk::index_of(x, y, z).unwrap();
            assert_eq!(Chunk::position_of(index), (x, y, z));
        }
    }

    #[test]
    fn serialization_rebuilds_occupancy() {
        let mut chunk = Chunk::empty();
        chunk.set(1, 2, 3, STONE_ID);
        chunk.set(15, 127, 15, DIRT_ID);

        let json = serde_json::to_string(&chunk).unwrap();
        let restored: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, chunk);
        assert_eq!(restored.occupied_count(), 2);
    }

    #[test]
    fn truncated_data_is_rejected() {
        let result: Result<Chunk, _> = serde_json::from_str(r#"{"blocks":[1,2,3]}"#);
        assert!(result.is_err());
    }
}
