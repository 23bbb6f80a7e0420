//! # Spiral Iterator
//!
//! Walks a square spiral outward from a centre cell:
//! `(0,0), (1,0), (1,1), (0,1), (-1,1), (-1,0), (-1,-1), (0,-1), (1,-1), (2,-1), ...`
//!
//! Each ring of Chebyshev radius `d` is completed before the first cell of
//! ring `d + 1` is produced, so the order is nearest-first. The chunk renderer
//! relies on this to mesh and draw the chunks closest to the camera first.

/// A square-spiral cursor over 2D cell coordinates.
///
/// The iterator holds only the current offset and heading. It cannot be reset;
/// build a new one to start over.
///
/// # Examples
///
/// ```
/// use voxel_world::core::spiral_iterator::SpiralIterator;
///
/// let cells: Vec<(i32, i32)> = SpiralIterator::new(10, 20).take(3).collect();
/// assert_eq!(cells, [(10, 20), (11, 20), (11, 21)]);
/// ```
#[derive(Clone, Debug)]
pub struct SpiralIterator {
    start_x: i32,
    start_z: i32,
    x: i32,
    z: i32,
    dx: i32,
    dz: i32,
}

impl SpiralIterator {
    /// Creates a spiral centred on `(start_x, start_z)`.
    pub fn new(start_x: i32, start_z: i32) -> Self {
        SpiralIterator {
            start_x,
            start_z,
            x: 0,
            z: 0,
            dx: 1,
            dz: 0,
        }
    }

    /// Absolute X of the current cell.
    pub fn x(&self) -> i32 {
        self.start_x + self.x
    }

    /// Absolute Z of the current cell.
    pub fn z(&self) -> i32 {
        self.start_z + self.z
    }

    /// Offset of the current cell from the centre.
    pub fn offset(&self) -> (i32, i32) {
        (self.x, self.z)
    }

    /// Whether the current cell is within `distance` of the centre on both axes.
    pub fn within_distance(&self, distance: i32) -> bool {
        self.x.abs() <= distance && self.z.abs() <= distance
    }

    /// Moves to the next cell, turning left at ring corners.
    pub fn advance(&mut self) {
        self.x += self.dx;
        self.z += self.dz;
        let x = self.x;
        let z = self.z;
        if x == z || (x < 0 && x == -z) || (x > 0 && x == 1 - z) {
            let dz = self.dz;
            self.dz = self.dx;
            self.dx = -dz;
        }
    }

    /// Every cell within `distance` of `(start_x, start_z)`, nearest ring first.
    ///
    /// A negative distance yields nothing.
    pub fn within(start_x: i32, start_z: i32, distance: i32) -> impl Iterator<Item = (i32, i32)> {
        let count = match usize::try_from(distance) {
            Ok(distance) => (2 * distance + 1) * (2 * distance + 1),
            Err(_) => 0,
        };
        SpiralIterator::new(start_x, start_z).take(count)
    }
}

impl Iterator for SpiralIterator {
    type Item = (i32, i32);

    /// Yields the current cell, then advances.
    fn next(&mut self) -> Option<Self::Item> {
        let cell = (self.x(), self.z());
        self.advance();
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn first_ring_order() {
        let cells: Vec<_> = SpiralIterator::new(0, 0).take(10).collect();
        assert_eq!(
            cells,
            [
                (0, 0),
                (1, 0),
                (1, 1),
                (0, 1),
                (-1, 1),
                (-1, 0),
                (-1, -1),
                (0, -1),
                (1, -1),
                (2, -1),
            ]
        );
    }

    #[test]
    fn rings_complete_before_the_next_starts() {
        let mut spiral = SpiralIterator::new(0, 0);
        for distance in 0..6 {
            let mut ring = HashSet::new();
            while spiral.within_distance(distance) {
                let (x, z) = spiral.offset();
                assert_eq!(x.abs().max(z.abs()), distance);
                assert!(ring.insert((x, z)));
                spiral.advance();
            }
            let expected = if distance == 0 { 1 } else { 8 * distance };
            assert_eq!(ring.len() as i32, expected);
        }
    }

    #[test]
    fn within_covers_the_square_exactly_once() {
        let cells: Vec<_> = SpiralIterator::within(-3, 4, 3).collect();
        assert_eq!(cells.len(), 49);
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), 49);
        assert!(cells
            .iter()
            .all(|&(x, z)| (x + 3).abs() <= 3 && (z - 4).abs() <= 3));
    }

    #[test]
    fn negative_distance_yields_nothing() {
        assert_eq!(SpiralIterator::within(5, 5, -1).count(), 0);
        assert!(!SpiralIterator::new(5, 5).within_distance(-1));
        assert_eq!(SpiralIterator::within(5, 5, 0).collect::<Vec<_>>(), [(5, 5)]);
    }
}
