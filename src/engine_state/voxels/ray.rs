//! # Ray Module
//!
//! Voxel traversal for ray casting, after Amanatides and Woo's "A Fast Voxel
//! Traversal Algorithm for Ray Tracing".
//!
//! A [`Ray`] visits, in order, every voxel a half-line passes through. Blocks
//! are centred on integer coordinates, so voxel `v` spans `[v - 0.5, v + 0.5]`
//! on each axis and the starting voxel is the origin rounded per axis.
//!
//! ## Degenerate Directions
//!
//! A zero direction component gives that axis an infinite `t_max`, so it never
//! drives traversal. No division by zero is relied on.

use cgmath::{Point3, Vector3};

use super::block::block_side::BlockSide;

/// The voxel coordinate containing a point.
pub fn block_coord_at(value: f32) -> i32 {
    value.round() as i32
}

fn step_of(component: f32) -> i32 {
    if component > 0.0 {
        1
    } else if component < 0.0 {
        -1
    } else {
        0
    }
}

/// A traversal cursor walking a half-line through the voxel grid.
///
/// Each call to [`Ray::next_face`] crosses exactly one voxel boundary.
#[derive(Clone, Debug)]
pub struct Ray {
    /// The voxel the ray is currently in.
    voxel: Point3<i32>,
    /// Direction of travel per axis (-1, 0 or +1).
    step: Vector3<i32>,
    /// Ray parameter at which the next boundary on each axis is crossed.
    t_max: Vector3<f32>,
    /// Ray parameter needed to cross one whole voxel on each axis.
    t_delta: Vector3<f32>,
    /// Ray parameter at the most recently crossed boundary.
    distance: f32,
    /// The face of the current voxel the ray entered through.
    last_face: BlockSide,
}

impl Ray {
    /// Starts a ray at `origin` heading along `direction`.
    ///
    /// `direction` is normally a unit vector, in which case distances are in
    /// blocks. It need not be; distances are then measured in multiples of
    /// its length.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let voxel = Point3::new(
            block_coord_at(origin.x),
            block_coord_at(origin.y),
            block_coord_at(origin.z),
        );
        let step = Vector3::new(
            step_of(direction.x),
            step_of(direction.y),
            step_of(direction.z),
        );

        let axis = |o: f32, d: f32, v: i32, s: i32| -> (f32, f32) {
            if s == 0 {
                return (f32::INFINITY, f32::INFINITY);
            }
            let boundary = v as f32 + 0.5 * s as f32;
            ((boundary - o) / d, 1.0 / d.abs())
        };
        let (t_max_x, t_delta_x) = axis(origin.x, direction.x, voxel.x, step.x);
        let (t_max_y, t_delta_y) = axis(origin.y, direction.y, voxel.y, step.y);
        let (t_max_z, t_delta_z) = axis(origin.z, direction.z, voxel.z, step.z);

        Ray {
            voxel,
            step,
            t_max: Vector3::new(t_max_x, t_max_y, t_max_z),
            t_delta: Vector3::new(t_delta_x, t_delta_y, t_delta_z),
            distance: 0.0,
            last_face: BlockSide::FRONT,
        }
    }

    /// The voxel the ray is currently in.
    pub fn voxel(&self) -> Point3<i32> {
        self.voxel
    }

    /// The ray parameter at which the current voxel was entered.
    ///
    /// Zero before the first call to [`next_face`](Self::next_face).
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// The face of the current voxel the ray entered through.
    ///
    /// Its side vector points back toward the previous voxel.
    pub fn last_face(&self) -> BlockSide {
        self.last_face
    }

    /// Crosses the nearest voxel boundary.
    ///
    /// The axis with the smallest `t_max` advances; ties go to X, then Y,
    /// then Z. Only one axis advances per call.
    pub fn next_face(&mut self) {
        let t = self.t_max;
        if t.x <= t.y && t.x <= t.z {
            self.distance = t.x;
            self.t_max.x += self.t_delta.x;
            self.voxel.x += self.step.x;
            self.last_face = if self.step.x > 0 {
                BlockSide::LEFT
            } else {
                BlockSide::RIGHT
            };
        } else if t.y <= t.z {
            self.distance = t.y;
            self.t_max.y += self.t_delta.y;
            self.voxel.y += self.step.y;
            self.last_face = if self.step.y > 0 {
                BlockSide::BOTTOM
            } else {
                BlockSide::TOP
            };
        } else {
            self.distance = t.z;
            self.t_max.z += self.t_delta.z;
            self.voxel.z += self.step.z;
            self.last_face = if self.step.z > 0 {
                BlockSide::BACK
            } else {
                BlockSide::FRONT
            };
        }
    }
}

impl Iterator for Ray {
    type Item = (Point3<i32>, BlockSide, f32);

    /// Advances one voxel and yields where the ray now is.
    ///
    /// Never returns `None`; bound it with `take_while` on the distance.
    fn next(&mut self) -> Option<Self::Item> {
        self.next_face();
        Some((self.voxel, self.last_face, self.distance))
    }
}
