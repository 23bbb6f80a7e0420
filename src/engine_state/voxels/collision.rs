//! Helpers for resolving collisions between axis-aligned bodies and the block
//! grid. Blocks are centred on integer coordinates, so block edges sit at
//! half-integers.

use cgmath::{Point3, Vector3};

use super::ray::block_coord_at;

/// Vertical half-extent used when snapping along Y.
const Y_RADIUS: f32 = 0.001;

/// The coordinates of the block containing `pos`.
pub fn block_coords_at(pos: Point3<f32>) -> Point3<i32> {
    Point3::new(
        block_coord_at(pos.x),
        block_coord_at(pos.y),
        block_coord_at(pos.z),
    )
}

/// Whether the open intervals `(x1, x2)` and `(y1, y2)` overlap.
pub fn intervals_intersect(x1: f32, x2: f32, y1: f32, y2: f32) -> bool {
    y1 < x2 && x1 < y2
}

/// Pushes a body of horizontal half-width `radius` flush against the block
/// edge it is colliding with.
///
/// `snap` holds one of -1, 0, +1 per axis: +1 snaps the body's low side onto
/// the next block edge above it, -1 snaps its high side onto the next edge
/// below, and 0 leaves the axis alone. The body is treated as a flat slab of
/// half-height [`Y_RADIUS`] on Y.
pub fn snap_to_edge(mut pos: Point3<f32>, radius: f32, snap: Vector3<i32>) -> Point3<f32> {
    pos.x = snap_axis(pos.x, radius, snap.x);
    pos.y = snap_axis(pos.y, Y_RADIUS, snap.y);
    pos.z = snap_axis(pos.z, radius, snap.z);
    pos
}

fn snap_axis(value: f32, radius: f32, snap: i32) -> f32 {
    match snap {
        1 => (value - radius + 0.5).ceil() + radius - 0.5,
        -1 => (value + radius + 0.5).floor() - radius - 0.5,
        _ => value,
    }
}

/// Merges the collision directions reported for one axis by several probes.
///
/// Each input is -1, 0 or +1. The result has a +1 component if any probe
/// reported +1 and a -1 component if any reported -1; both cancel out.
pub fn collate_collisions(a: i32, b: i32, c: i32) -> i32 {
    let any_positive = a == 1 || b == 1 || c == 1;
    let any_negative = a == -1 || b == -1 || c == -1;
    i32::from(any_positive) - i32::from(any_negative)
}
