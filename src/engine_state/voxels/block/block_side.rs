//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the side-vector table
//! that ties each face id to a unit offset in the world grid.
//!
//! Face ids are part of the face record handed to the renderer, so their
//! numbering is fixed: `+Z, +X, -Z, -X, -Y, +Y` for ids `0..6`.

use cgmath::Vector3;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Unit offsets for every face, indexed by face id.
///
/// `SIDE_VECTORS[face]` points from a block toward the neighbour that the face
/// looks at.
pub const SIDE_VECTORS: [[i32; 3]; 6] = [
    [0, 0, 1],
    [1, 0, 0],
    [0, 0, -1],
    [-1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
];

/// Represents the six possible faces of a voxel block.
///
/// Each variant carries its face id as discriminant. The order matches
/// [`SIDE_VECTORS`].
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The right face (facing positive X)
    RIGHT = 1,

    /// The back face (facing negative Z)
    BACK = 2,

    /// The left face (facing negative X)
    LEFT = 3,

    /// The bottom face (facing negative Y)
    BOTTOM = 4,

    /// The top face (facing positive Y)
    TOP = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in face id order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::RIGHT,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
        ]
    }

    /// Converts a raw face id into a `BlockSide`.
    ///
    /// # Returns
    /// `None` if `id` is not in `0..6`.
    pub fn from_id(id: u8) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The face id as stored in face records.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The unit offset toward the neighbour this face looks at.
    pub fn vector(self) -> Vector3<i32> {
        let [x, y, z] = SIDE_VECTORS[self as usize];
        Vector3::new(x, y, z)
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_id() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_id(side.id()), Some(side));
        }
        assert_eq!(BlockSide::from_id(6), None);
    }

    #[test]
    fn opposite_sides_have_opposite_vectors() {
        for side in BlockSide::all() {
            let flipped = SIDE_VECTORS[side.opposite() as usize].map(|c| -c);
            assert_eq!(SIDE_VECTORS[side as usize], flipped);
        }
    }
}
