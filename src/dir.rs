//! Cardinal directions on the surface plane.
use bevy::math::IVec2;
use strum::{Display, EnumIter, IntoEnumIterator};

/// One of the four cardinal directions. `TOP` points towards increasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Dir {
    TOP = 0,
    RIGHT = 1,
    BOTTOM = 2,
    LEFT = 3,
}

pub use self::Dir::*;

impl Dir {
    /// Every direction in the fixed exploration order.
    pub const ALL: [Dir; 4] = [TOP, RIGHT, BOTTOM, LEFT];

    /// Iterates [`Dir::ALL`] in order.
    pub fn all() -> DirIter {
        Dir::iter()
    }

    /// Unit offset of a single step in this direction.
    pub fn vector(self) -> IVec2 {
        match self {
            TOP => IVec2::new(0, 1),
            RIGHT => IVec2::new(1, 0),
            BOTTOM => IVec2::new(0, -1),
            LEFT => IVec2::new(-1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            TOP => BOTTOM,
            RIGHT => LEFT,
            BOTTOM => TOP,
            LEFT => RIGHT,
        }
    }

    pub fn clockwise(self) -> Dir {
        match self {
            TOP => RIGHT,
            RIGHT => BOTTOM,
            BOTTOM => LEFT,
            LEFT => TOP,
        }
    }

    pub fn counter_clockwise(self) -> Dir {
        match self {
            TOP => LEFT,
            LEFT => BOTTOM,
            BOTTOM => RIGHT,
            RIGHT => TOP,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, TOP | BOTTOM)
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, LEFT | RIGHT)
    }

    /// The direction of the single step leading from `from` to `to`,
    /// or `None` when the two are not 4-adjacent.
    pub fn between(from: IVec2, to: IVec2) -> Option<Dir> {
        let delta = to - from;
        Dir::all().find(|dir| dir.vector() == delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Dir::all() {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.vector() + dir.opposite().vector(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_rotations() {
        assert_eq!(TOP.clockwise(), RIGHT);
        assert_eq!(LEFT.clockwise(), TOP);
        assert_eq!(TOP.counter_clockwise(), LEFT);
        assert_eq!(RIGHT.counter_clockwise(), TOP);

        for dir in Dir::all() {
            assert_eq!(dir.clockwise().counter_clockwise(), dir);
            assert_eq!(dir.clockwise().clockwise(), dir.opposite());
        }
    }

    #[test]
    fn test_axes() {
        assert!(TOP.is_vertical() && BOTTOM.is_vertical());
        assert!(LEFT.is_horizontal() && RIGHT.is_horizontal());
        assert!(!TOP.is_horizontal());
        assert!(!RIGHT.is_vertical());
    }

    #[test]
    fn test_all_order() {
        assert_eq!(Dir::all().collect::<Vec<_>>(), Dir::ALL.to_vec());
        assert_eq!(TOP.to_string(), "top");
        assert_eq!(BOTTOM.to_string(), "bottom");
    }

    #[test]
    fn test_between() {
        let origin = IVec2::new(2, 2);
        assert_eq!(Dir::between(origin, IVec2::new(2, 3)), Some(TOP));
        assert_eq!(Dir::between(origin, IVec2::new(1, 2)), Some(LEFT));
        assert_eq!(Dir::between(origin, IVec2::new(3, 3)), None);
        assert_eq!(Dir::between(origin, origin), None);
    }
}
