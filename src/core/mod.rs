//! # Core Module
//!
//! Small, engine-agnostic building blocks shared by the voxel and rendering
//! modules.
//!
//! ## Key Components
//! - `SpiralIterator`: nearest-first square spiral over chunk coordinates

pub mod spiral_iterator;

pub use spiral_iterator::SpiralIterator;
