//! Coordinate helpers for [`IVec2`] positions on a surface.
use bevy::math::IVec2;
use smallvec::SmallVec;

use crate::dir::*;

/// A cell position. `(0, 0)` is the bottom-left corner of a surface.
pub type Coord = IVec2;

/// Adjacency and movement queries on surface coordinates.
pub trait CoordExt: Copy {
    /// True when `other` is this coordinate or one of its four direct neighbors.
    /// Diagonal neighbors do not connect.
    fn connects_to(self, other: Self) -> bool;

    /// The neighboring coordinate one step in `dir`.
    fn coord_in_direction(self, dir: Dir) -> Self;

    /// Up to two directions that move closer to `to`, horizontal first.
    fn directions_to(self, to: Self) -> SmallVec<[Dir; 2]>;

    /// The neighbors reached by stepping along [`CoordExt::directions_to`].
    fn coords_to(self, to: Self) -> SmallVec<[Self; 2]>;

    /// The four direct neighbors, in `right, left, top, bottom` order.
    fn coords_around(self) -> [Self; 4];

    fn coord_at(self, x_offset: i32, y_offset: i32) -> Self;
}

impl CoordExt for IVec2 {
    fn connects_to(self, other: IVec2) -> bool {
        let diff = (self - other).abs();
        diff.x + diff.y <= 1
    }

    #[inline]
    fn coord_in_direction(self, dir: Dir) -> IVec2 {
        self + dir.vector()
    }

    fn directions_to(self, to: IVec2) -> SmallVec<[Dir; 2]> {
        let mut dirs = SmallVec::new();
        if to.x > self.x {
            dirs.push(RIGHT);
        } else if to.x < self.x {
            dirs.push(LEFT);
        }
        if to.y > self.y {
            dirs.push(TOP);
        } else if to.y < self.y {
            dirs.push(BOTTOM);
        }
        dirs
    }

    fn coords_to(self, to: IVec2) -> SmallVec<[IVec2; 2]> {
        self.directions_to(to)
            .into_iter()
            .map(|dir| self.coord_in_direction(dir))
            .collect()
    }

    fn coords_around(self) -> [IVec2; 4] {
        [
            self + IVec2::X,
            self - IVec2::X,
            self + IVec2::Y,
            self - IVec2::Y,
        ]
    }

    fn coord_at(self, x_offset: i32, y_offset: i32) -> IVec2 {
        self + IVec2::new(x_offset, y_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connects_to() {
        let c = IVec2::new(3, 3);

        assert!(c.connects_to(c));
        assert!(c.connects_to(IVec2::new(3, 4)));
        assert!(c.connects_to(IVec2::new(2, 3)));
        assert!(!c.connects_to(IVec2::new(4, 4)));
        assert!(!c.connects_to(IVec2::new(2, 2)));
        assert!(!c.connects_to(IVec2::new(5, 3)));
        assert!(!c.connects_to(IVec2::new(3, 1)));
    }

    #[test]
    fn test_coord_in_direction() {
        let c = IVec2::new(0, 0);

        assert_eq!(c.coord_in_direction(TOP), IVec2::new(0, 1));
        assert_eq!(c.coord_in_direction(BOTTOM), IVec2::new(0, -1));
        assert_eq!(c.coord_in_direction(RIGHT), IVec2::new(1, 0));
        assert_eq!(c.coord_in_direction(LEFT), IVec2::new(-1, 0));
    }

    #[test]
    fn test_directions_to() {
        let c = IVec2::new(2, 2);

        assert!(c.directions_to(c).is_empty());
        assert_eq!(c.directions_to(IVec2::new(5, 2)).as_slice(), &[RIGHT]);
        assert_eq!(c.directions_to(IVec2::new(2, 0)).as_slice(), &[BOTTOM]);
        assert_eq!(c.directions_to(IVec2::new(0, 4)).as_slice(), &[LEFT, TOP]);
        assert_eq!(c.directions_to(IVec2::new(4, 1)).as_slice(), &[RIGHT, BOTTOM]);
    }

    #[test]
    fn test_coords_to() {
        let c = IVec2::new(2, 2);

        assert_eq!(
            c.coords_to(IVec2::new(0, 4)).as_slice(),
            &[IVec2::new(1, 2), IVec2::new(2, 3)]
        );
        assert!(c.coords_to(c).is_empty());
    }

    #[test]
    fn test_coords_around() {
        let around = IVec2::new(0, 0).coords_around();

        assert_eq!(around.len(), 4);
        for neighbor in around {
            assert!(neighbor.connects_to(IVec2::ZERO));
            assert_ne!(neighbor, IVec2::ZERO);
        }
        assert_eq!(IVec2::new(1, 1).coord_at(-2, 3), IVec2::new(-1, 4));
    }
}
