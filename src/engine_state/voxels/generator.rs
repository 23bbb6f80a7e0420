//! # Terrain Generator
//!
//! Fills chunks with a deterministic heightmap landscape. Stands in for the
//! chunk loading collaborator so the engine has something to mesh.
//!
//! Each column is sampled from 2D Perlin noise:
//!
//! * stone up to a few blocks below the surface
//! * dirt on top of the stone
//! * grass on the surface when it is above the water level, dirt otherwise
//! * water filling every column up to [`WATER_LEVEL`]
//!
//! Trees are scattered with a per-chunk seeded RNG and kept clear of the chunk
//! edges so that every tree lives entirely inside one chunk.

use noise::{NoiseFn, Perlin};

use super::block::{BlockId, AIR_ID, DIRT_ID, GRASS_ID, LEAVES_ID, STONE_ID, TRUNK_ID, WATER_ID};
use super::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH};
use super::world::chunk_key;

/// Height of the terrain where the noise is zero.
pub const BASE_HEIGHT: i32 = 48;
/// Maximum deviation of the terrain from [`BASE_HEIGHT`].
pub const HEIGHT_AMPLITUDE: f64 = 14.0;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const TERRAIN_SCALE_FACTOR: f64 = 0.025;
/// Columns whose surface is below this Y are flooded up to it.
pub const WATER_LEVEL: i32 = 46;
/// Thickness of the dirt layer above the stone.
const DIRT_DEPTH: i32 = 3;
/// How many tree spots are tried per chunk.
const TREE_ATTEMPTS: usize = 3;
/// Leaves reach this far from the trunk.
const LEAF_RADIUS: i32 = 2;

/// Deterministic terrain source: the same seed always builds the same chunks.
pub struct TerrainGenerator {
    seed: u64,
    perlin: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator for the given world seed.
    pub fn new(seed: u64) -> Self {
        TerrainGenerator {
            seed,
            perlin: Perlin::new(seed as u32),
        }
    }

    /// The Y of the surface block of the column at world (x, z).
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let sample = self.perlin.get([
            x as f64 * TERRAIN_SCALE_FACTOR,
            z as f64 * TERRAIN_SCALE_FACTOR,
        ]);
        let height = BASE_HEIGHT + (sample * HEIGHT_AMPLITUDE).round() as i32;
        height.clamp(1, CHUNK_HEIGHT - 1)
    }

    /// Builds the chunk at the given chunk coordinates.
    pub fn generate(&self, chunk_x: i32, chunk_z: i32) -> Chunk {
        let mut chunk = Chunk::empty();

        for rel_z in 0..CHUNK_WIDTH {
            for rel_x in 0..CHUNK_WIDTH {
                let height = self.height_at(
                    chunk_x * CHUNK_WIDTH + rel_x,
                    chunk_z * CHUNK_WIDTH + rel_z,
                );
                for y in 0..=height.max(WATER_LEVEL) {
                    chunk.set(rel_x, y, rel_z, Self::column_block(y, height));
                }
            }
        }

        self.plant_trees(&mut chunk, chunk_x, chunk_z);
        chunk
    }

    fn column_block(y: i32, height: i32) -> BlockId {
        if y > height {
            WATER_ID
        } else if y < height - DIRT_DEPTH {
            STONE_ID
        } else if y == height && height >= WATER_LEVEL {
            GRASS_ID
        } else {
            DIRT_ID
        }
    }

    fn plant_trees(&self, chunk: &mut Chunk, chunk_x: i32, chunk_z: i32) {
        let mut rng = fastrand::Rng::with_seed(self.seed ^ chunk_key(chunk_x, chunk_z));

        for _ in 0..TREE_ATTEMPTS {
            let rel_x = rng.i32(LEAF_RADIUS..CHUNK_WIDTH - LEAF_RADIUS);
            let rel_z = rng.i32(LEAF_RADIUS..CHUNK_WIDTH - LEAF_RADIUS);
            let trunk_height = rng.i32(4..=5);

            let Some(ground) = chunk.highest_block(rel_x, rel_z) else {
                continue;
            };
            let top = ground + trunk_height;
            if chunk.get(rel_x, ground, rel_z) != GRASS_ID || top + 1 >= CHUNK_HEIGHT {
                continue;
            }

            for y in ground + 1..=top {
                chunk.set(rel_x, y, rel_z, TRUNK_ID);
            }
            for y in top - 1..=top + 1 {
                let radius = if y > top { 1 } else { LEAF_RADIUS };
                for dz in -radius..=radius {
                    for dx in -radius..=radius {
                        if chunk.get(rel_x + dx, y, rel_z + dz) == AIR_ID {
                            chunk.set(rel_x + dx, y, rel_z + dz, LEAVES_ID);
                        }
                    }
                }
            }
            log::trace!(
                "Planted tree at ({}, {}, {}) in chunk ({}, {})",
                rel_x,
                ground + 1,
                rel_z,
                chunk_x,
                chunk_z
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_builds_same_chunks() {
        let a = TerrainGenerator::new(7);
        let b = TerrainGenerator::new(7);
        assert_eq!(a.generate(-2, 3), b.generate(-2, 3));
    }

    #[test]
    fn columns_are_layered() {
        let generator = TerrainGenerator::new(1);
        let chunk = generator.generate(0, 0);
        for rel_z in 0..CHUNK_WIDTH {
            for rel_x in 0..CHUNK_WIDTH {
                let height = generator.height_at(rel_x, rel_z);
                assert_eq!(chunk.get(rel_x, 0, rel_z), STONE_ID);
                let surface = chunk.get(rel_x, height, rel_z);
                if height >= WATER_LEVEL {
                    assert_eq!(surface, GRASS_ID);
                } else {
                    assert_eq!(surface, DIRT_ID);
                    assert_eq!(chunk.get(rel_x, WATER_LEVEL, rel_z), WATER_ID);
                    assert_eq!(chunk.get(rel_x, WATER_LEVEL + 1, rel_z), AIR_ID);
                }
            }
        }
    }

    #[test]
    fn trees_stay_inside_their_chunk() {
        let generator = TerrainGenerator::new(3);
        for chunk_x in -2..2 {
            for chunk_z in -2..2 {
                let chunk = generator.generate(chunk_x, chunk_z);
                for (position, id) in chunk.occupied_blocks() {
                    if id == TRUNK_ID {
                        assert!(position.x >= LEAF_RADIUS && position.x < CHUNK_WIDTH - LEAF_RADIUS);
                        assert!(position.z >= LEAF_RADIUS && position.z < CHUNK_WIDTH - LEAF_RADIUS);
                    }
                }
            }
        }
    }
}
