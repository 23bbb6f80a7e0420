//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Chunk-based position tracking for the render window
//! - Frustum extraction for chunk culling
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages the camera's projection matrix

use cgmath::{Matrix4, Point3, Vector3};

use super::rendering::frustum::ViewFrustum;
use super::voxels::ray::block_coord_at;
use super::voxels::world::split_coord;

pub mod camera;

/// The camera together with its projection and last known chunk.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// The projection used to build the frustum
    pub projection: camera::Projection,
    /// The chunk the camera was in at the last update
    chunk_position: (i32, i32),
}

impl CameraState {
    /// Creates a new `CameraState`.
    pub fn new(camera: camera::Camera, projection: camera::Projection) -> Self {
        let chunk_position = Self::chunk_of(camera.position);
        CameraState {
            camera,
            projection,
            chunk_position,
        }
    }

    /// The chunk containing a world position.
    pub fn chunk_of(position: Point3<f32>) -> (i32, i32) {
        let (chunk_x, _) = split_coord(block_coord_at(position.x));
        let (chunk_z, _) = split_coord(block_coord_at(position.z));
        (chunk_x, chunk_z)
    }

    /// The chunk the camera was in at the last update.
    pub fn chunk_position(&self) -> (i32, i32) {
        self.chunk_position
    }

    /// The camera position.
    pub fn eye(&self) -> Point3<f32> {
        self.camera.position
    }

    /// The direction the camera looks along.
    pub fn direction(&self) -> Vector3<f32> {
        self.camera.direction()
    }

    /// The combined projection * view matrix.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }

    /// The current view frustum.
    pub fn frustum(&self) -> ViewFrustum {
        ViewFrustum::from_matrix(self.view_projection())
    }

    /// Refreshes the tracked chunk position.
    ///
    /// # Returns
    /// - `Some(CameraUpdates)` if the camera moved into another chunk
    /// - `None` otherwise
    pub fn update(&mut self) -> Option<CameraUpdates> {
        let new_chunk_position = Self::chunk_of(self.camera.position);
        if new_chunk_position == self.chunk_position {
            return None;
        }
        log::debug!(
            "Camera moved from chunk {:?} to {:?}",
            self.chunk_position,
            new_chunk_position
        );
        self.chunk_position = new_chunk_position;
        Some(CameraUpdates { new_chunk_position })
    }
}

/// Returned by `CameraState::update()` when the camera changed chunk.
pub struct CameraUpdates {
    /// The chunk coordinates the camera is now in
    pub new_chunk_position: (i32, i32),
}
