//! Rendering system for the voxel engine.
//!
//! This module turns chunk data into face lists and decides what gets drawn.
//! Actual drawing is delegated to a [`FaceRenderer`], so nothing here depends
//! on a graphics API.
//!
//! # Architecture
//! - `ChunkRenderer`: Render-distance window, LRU mesh cache and edit dispatch
//! - `RenderedChunk`: Cached visible faces of one chunk with partial updates
//! - `FaceRenderer`: The sink that owns buffers and draws them
//! - `ViewFrustum`: Chunk culling against the camera frustum

pub mod chunk_renderer;
pub mod face_renderer;
pub mod frustum;
pub mod rendered_chunk;

pub use chunk_renderer::{ChunkRenderer, MeshUpdate};
pub use face_renderer::{FaceBufferId, FaceData, FaceRenderer, MemoryFaceRenderer};
pub use frustum::ViewFrustum;
pub use rendered_chunk::RenderedChunk;
