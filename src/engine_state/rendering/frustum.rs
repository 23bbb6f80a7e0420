//! View-frustum culling for chunks.
//!
//! Planes are extracted from a combined projection * view matrix (Gribb and
//! Hartmann). Each plane `(a, b, c, d)` keeps points with
//! `a*x + b*y + c*z + d >= 0` on its inside. Clip space follows the OpenGL
//! convention, which is what `cgmath::perspective` produces.

use cgmath::{Matrix4, Point3};

use crate::engine_state::voxels::chunk::{CHUNK_HEIGHT, CHUNK_WIDTH};

/// The six clip planes of a camera.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewFrustum {
    planes: [[f32; 4]; 6],
}

impl ViewFrustum {
    /// Extracts the frustum of a projection * view matrix.
    pub fn from_matrix(view_proj: Matrix4<f32>) -> Self {
        let m: [[f32; 4]; 4] = view_proj.into();
        let combine = |row: usize, sign: f32| -> [f32; 4] {
            [
                m[0][3] + sign * m[0][row],
                m[1][3] + sign * m[1][row],
                m[2][3] + sign * m[2][row],
                m[3][3] + sign * m[3][row],
            ]
        };
        ViewFrustum {
            planes: [
                combine(0, 1.0),  // left
                combine(0, -1.0), // right
                combine(1, 1.0),  // bottom
                combine(1, -1.0), // top
                combine(2, 1.0),  // near
                combine(2, -1.0), // far
            ],
        }
    }

    /// Whether any part of the box `[min, max]` may be visible.
    ///
    /// Conservative: a box that straddles two planes outside a frustum corner
    /// can still be reported visible.
    pub fn intersects_box(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| {
            let px = if plane[0] >= 0.0 { max.x } else { min.x };
            let py = if plane[1] >= 0.0 { max.y } else { min.y };
            let pz = if plane[2] >= 0.0 { max.z } else { min.z };
            plane[0] * px + plane[1] * py + plane[2] * pz + plane[3] >= 0.0
        })
    }

    /// Whether any part of the chunk at the given chunk coordinates may be visible.
    pub fn intersects_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool {
        // Blocks are centred on integers, so chunk edges sit half a block off.
        let min = Point3::new(
            (chunk_x * CHUNK_WIDTH) as f32 - 0.5,
            -0.5,
            (chunk_z * CHUNK_WIDTH) as f32 - 0.5,
        );
        let max = Point3::new(
            min.x + CHUNK_WIDTH as f32,
            CHUNK_HEIGHT as f32 - 0.5,
            min.z + CHUNK_WIDTH as f32,
        );
        self.intersects_box(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{perspective, Deg, Vector3};

    fn looking_along_z() -> ViewFrustum {
        let projection = perspective(Deg(70.0), 1.0, 0.1, 200.0);
        let view = Matrix4::look_to_rh(
            Point3::new(8.0, 64.0, 8.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::unit_y(),
        );
        ViewFrustum::from_matrix(projection * view)
    }

    #[test]
    fn chunks_ahead_are_visible() {
        let frustum = looking_along_z();
        assert!(frustum.intersects_chunk(0, 0));
        assert!(frustum.intersects_chunk(0, 3));
    }

    #[test]
    fn chunks_behind_are_culled() {
        let frustum = looking_along_z();
        assert!(!frustum.intersects_chunk(0, -3));
    }

    #[test]
    fn chunks_past_the_far_plane_are_culled() {
        let frustum = looking_along_z();
        assert!(!frustum.intersects_chunk(0, 20));
    }
}
