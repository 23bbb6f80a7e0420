//! # Voxel Engine Core
//!
//! This module contains the voxel data model and the spatial queries built on
//! top of it.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: The immutable registry of block prototypes, face ids and textures
//! * **Chunk**: Fixed-size columns of block ids, the unit of storage and meshing
//! * **World**: The sparse chunk map and the authority for "what block is at (x, y, z)"
//! * **Ray**: Exact voxel traversal used by raycasts
//! * **Collision**: Helpers for snapping bodies against the block grid
//! * **Generator**: Deterministic terrain used to populate the world
//!
//! ## Data Flow
//!
//! 1. The generator (or any other loader) hands chunks to the world
//! 2. Gameplay reads and writes blocks through the world
//! 3. Every change is queued as a `WorldEdit`
//! 4. The renderer drains the queue once per frame and re-meshes what changed

pub mod block;
pub mod chunk;
pub mod collision;
pub mod generator;
pub mod ray;
pub mod world;
