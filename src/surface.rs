//! This module contains the [`Surface`], the shared occupancy grid every flood runs over.
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bevy::{log::warn, math::IVec2, prelude::Component};
use ndarray::Array2;
#[cfg(feature = "parallel")]
use ndarray::parallel::prelude::*;
use smallvec::SmallVec;

use crate::{coord::CoordExt, error::SurfaceError};

/// State stored for one cell of a [`Surface`].
///
/// A cell can be filled without a distance, or carry a distance without being filled.
/// Floods use the filled flag to avoid visiting a cell twice, step counting uses the
/// distance and may revisit a cell when a shorter route reaches it later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) filled: bool,
    pub(crate) distance: Option<u32>,
}

/// Outcome of offering a step count to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Relaxation {
    /// The cell is outside the surface.
    OutOfBounds,
    /// The cell already holds an equal or shorter distance.
    Stale,
    /// The distance was recorded but the cell is filled and blocks further travel.
    Obstacle,
    /// The distance was recorded and the cell can be traveled through.
    Improved,
}

/// A `width` x `height` grid of cells that are either filled or empty.
///
/// Coordinates range from `(0, 0)` in the bottom-left corner to `(width - 1, height - 1)`.
/// Everything outside that range counts as filled, so floods stop at the border.
///
/// All methods take `&self`; the cells sit behind a single reader/writer lock so
/// concurrent flood branches can share one surface.
///
/// # Example
/// ```
/// use bevy::math::IVec2;
/// use bevy_flood_plane::prelude::*;
///
/// let surface = Surface::new(4, 4);
/// surface.fill([IVec2::new(1, 1), IVec2::new(9, 9)]);
///
/// assert!(surface.is_filled(IVec2::new(1, 1)));
/// assert!(surface.is_filled(IVec2::new(-1, 0)));
/// assert_eq!(surface.count_filled(), 1);
/// ```
#[derive(Component, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    cells: RwLock<Array2<Cell>>,
}

impl Surface {
    /// Creates an empty surface.
    pub fn new(width: u32, height: u32) -> Self {
        Surface {
            width,
            height,
            cells: RwLock::new(Array2::from_elem(
                (width as usize, height as usize),
                Cell::default(),
            )),
        }
    }

    /// Builds a surface from rows of cells, top row first. Any non-zero cell is filled.
    ///
    /// ```
    /// use bevy::math::IVec2;
    /// use bevy_flood_plane::prelude::*;
    ///
    /// let surface = Surface::from_rows(&[
    ///     [0, 0, 0],
    ///     [0, 0, 0],
    ///     [0, 1, 0],
    /// ]).unwrap();
    ///
    /// assert!(surface.is_filled(IVec2::new(1, 0)));
    /// ```
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, SurfaceError> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let height = rows.len();

        let surface = Surface::new(width as u32, height as u32);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != width {
                return Err(SurfaceError::RaggedRows {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }

            let y = (height - row - 1) as i32;
            surface.fill(
                cells
                    .iter()
                    .enumerate()
                    .filter(|&(_, &value)| value != 0)
                    .map(|(x, _)| IVec2::new(x as i32, y)),
            );
        }

        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The center of the surface, rounded down on both axes.
    pub fn center(&self) -> IVec2 {
        IVec2::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Checks if a coordinate lies within the bounds of the surface.
    pub fn fits(&self, coord: IVec2) -> bool {
        self.index(coord).is_some()
    }

    /// Marks every given coordinate as filled.
    /// Out-of-bounds coordinates are ignored and recorded distances are kept.
    pub fn fill(&self, coords: impl IntoIterator<Item = IVec2>) {
        let coords: SmallVec<[IVec2; 8]> = coords.into_iter().collect();
        let mut cells = self.write();
        for coord in coords {
            if let Some(index) = self.index(coord) {
                cells[index].filled = true;
            }
        }
    }

    /// Resets every given coordinate to empty, clearing its distance as well.
    pub fn remove(&self, coords: impl IntoIterator<Item = IVec2>) {
        let coords: SmallVec<[IVec2; 8]> = coords.into_iter().collect();
        let mut cells = self.write();
        for coord in coords {
            if let Some(index) = self.index(coord) {
                cells[index] = Cell::default();
            }
        }
    }

    /// Test if a coordinate is filled. Coordinates off the surface are always filled.
    pub fn is_filled(&self, coord: IVec2) -> bool {
        match self.index(coord) {
            Some(index) => self.read()[index].filled,
            None => true,
        }
    }

    /// Number of filled 4-neighbors of `coord`, counting off-surface neighbors as filled.
    pub fn filled_around(&self, coord: IVec2) -> usize {
        coord
            .coords_around()
            .into_iter()
            .filter(|&neighbor| self.is_filled(neighbor))
            .count()
    }

    pub fn total_surface(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn count_filled(&self) -> usize {
        let cells = self.read();

        #[cfg(feature = "parallel")]
        {
            cells.par_iter().filter(|cell| cell.filled).count()
        }

        #[cfg(not(feature = "parallel"))]
        {
            cells.iter().filter(|cell| cell.filled).count()
        }
    }

    pub fn count_unfilled(&self) -> usize {
        self.total_surface() - self.count_filled()
    }

    /// All filled coordinates, ordered by `x` and then by `y`.
    pub fn filled(&self) -> Vec<IVec2> {
        self.iter_filled().collect()
    }

    /// Lazily walks the filled coordinates in the same order as [`Surface::filled`].
    ///
    /// The lock is only held while looking for the next filled cell, so the surface
    /// may be modified between steps; cells ahead of the cursor reflect those changes.
    pub fn iter_filled(&self) -> FilledIter<'_> {
        FilledIter {
            surface: self,
            cursor: 0,
        }
    }

    /// The step count recorded at `coord` by the last distance flood, if any.
    pub(crate) fn distance(&self, coord: IVec2) -> Option<u32> {
        self.cell(coord).and_then(|cell| cell.distance)
    }

    pub(crate) fn has_distance(&self, coord: IVec2) -> bool {
        self.distance(coord).is_some()
    }

    /// Records or forgets a distance without touching the filled flag. Ignored off the surface.
    pub(crate) fn set_distance(&self, coord: IVec2, distance: Option<u32>) {
        if let Some(index) = self.index(coord) {
            self.write()[index].distance = distance;
        }
    }

    /// Forgets every recorded distance, leaving filled flags untouched.
    pub(crate) fn clear_distances(&self) {
        let mut cells = self.write();

        #[cfg(feature = "parallel")]
        cells.par_map_inplace(|cell| cell.distance = None);

        #[cfg(not(feature = "parallel"))]
        cells.map_inplace(|cell| cell.distance = None);
    }

    pub(crate) fn cell(&self, coord: IVec2) -> Option<Cell> {
        let index = self.index(coord)?;
        Some(self.read()[index])
    }

    /// Fills `coord` if it is on the surface and still empty.
    /// Returns `true` only for the caller that actually filled it.
    pub(crate) fn claim(&self, coord: IVec2) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };

        let mut cells = self.write();
        let cell = &mut cells[index];
        if cell.filled {
            return false;
        }
        cell.filled = true;
        true
    }

    /// Offers `steps` as the distance of `coord`, keeping the smaller of the two.
    pub(crate) fn relax(&self, coord: IVec2, steps: u32) -> Relaxation {
        let Some(index) = self.index(coord) else {
            return Relaxation::OutOfBounds;
        };

        let mut cells = self.write();
        let cell = &mut cells[index];
        if cell.distance.is_some_and(|distance| distance <= steps) {
            return Relaxation::Stale;
        }

        cell.distance = Some(steps);
        if cell.filled {
            Relaxation::Obstacle
        } else {
            Relaxation::Improved
        }
    }

    #[inline]
    fn index(&self, coord: IVec2) -> Option<[usize; 2]> {
        if coord.x < 0
            || coord.y < 0
            || coord.x as u32 >= self.width
            || coord.y as u32 >= self.height
        {
            return None;
        }

        Some([coord.x as usize, coord.y as usize])
    }

    fn read(&self) -> RwLockReadGuard<'_, Array2<Cell>> {
        self.cells.read().unwrap_or_else(|poisoned| {
            warn!("Surface lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Array2<Cell>> {
        self.cells.write().unwrap_or_else(|poisoned| {
            warn!("Surface lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// Copies the filled cells into an independent surface. Distances are not copied.
impl Clone for Surface {
    fn clone(&self) -> Self {
        let cells = self.read().map(|cell| Cell {
            filled: cell.filled,
            distance: None,
        });

        Surface {
            width: self.width,
            height: self.height,
            cells: RwLock::new(cells),
        }
    }
}

/// Iterator over the filled coordinates of a [`Surface`]. See [`Surface::iter_filled`].
pub struct FilledIter<'a> {
    surface: &'a Surface,
    cursor: usize,
}

impl Iterator for FilledIter<'_> {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        let height = self.surface.height as usize;
        let total = self.surface.total_surface();
        let cells = self.surface.read();

        while self.cursor < total {
            let (x, y) = (self.cursor / height, self.cursor % height);
            self.cursor += 1;

            if cells[[x, y]].filled {
                return Some(IVec2::new(x as i32, y as i32));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        for (width, height) in [(1, 1), (3, 3), (7, 2), (16, 9)] {
            let surface = Surface::new(width, height);

            assert_eq!(surface.count_filled(), 0);
            assert_eq!(surface.total_surface(), (width * height) as usize);
            assert_eq!(surface.count_unfilled(), surface.total_surface());
        }

        let empty = Surface::new(0, 0);
        assert_eq!(empty.total_surface(), 0);
        assert!(empty.filled().is_empty());
        assert!(empty.is_filled(IVec2::ZERO));
    }

    #[test]
    fn test_fill_corners() {
        let surface = Surface::new(3, 3);
        let corners = [
            IVec2::new(0, 0),
            IVec2::new(0, 2),
            IVec2::new(2, 2),
            IVec2::new(2, 0),
        ];
        surface.fill(corners);

        for corner in corners {
            assert!(surface.is_filled(corner));
        }
        assert!(!surface.is_filled(IVec2::new(1, 1)));
        assert_eq!(surface.count_filled(), 4);
        assert_eq!(surface.count_unfilled(), 5);
    }

    #[test]
    fn test_fill_ignores_out_of_bounds() {
        let surface = Surface::new(3, 3);
        surface.fill([IVec2::new(-1, 0), IVec2::new(3, 1), IVec2::new(1, 7)]);

        assert_eq!(surface.count_filled(), 0);
    }

    #[test]
    fn test_out_of_bounds_is_filled() {
        let surface = Surface::new(4, 3);

        for coord in [
            IVec2::new(-1, 0),
            IVec2::new(0, -1),
            IVec2::new(4, 0),
            IVec2::new(0, 3),
            IVec2::new(i32::MIN, i32::MAX),
        ] {
            assert!(surface.is_filled(coord), "{coord} should be filled");
            assert!(!surface.fits(coord));
        }
        assert!(surface.fits(IVec2::new(3, 2)));
    }

    #[test]
    fn test_fill_then_remove() {
        let surface = Surface::new(3, 3);
        let coord = IVec2::new(1, 2);

        surface.fill([coord]);
        surface.set_distance(coord, Some(4));
        surface.remove([coord]);

        assert!(!surface.is_filled(coord));
        assert_eq!(surface.distance(coord), None);
        assert_eq!(surface.cell(coord), Some(Cell::default()));

        // Removing an empty cell is a no-op.
        surface.remove([coord, IVec2::new(-5, 0)]);
        assert_eq!(surface.count_filled(), 0);
    }

    #[test]
    fn test_fill_keeps_distance() {
        let surface = Surface::new(3, 3);
        let coord = IVec2::new(2, 1);

        surface.set_distance(coord, Some(3));
        assert!(!surface.is_filled(coord));

        surface.fill([coord]);
        surface.fill([coord]);

        assert!(surface.is_filled(coord));
        assert_eq!(surface.distance(coord), Some(3));
    }

    #[test]
    fn test_distance_independent_of_fill() {
        let surface = Surface::new(2, 2);
        let coord = IVec2::new(0, 1);

        assert!(!surface.has_distance(coord));
        surface.set_distance(coord, Some(2));
        assert!(surface.has_distance(coord));
        assert_eq!(surface.count_filled(), 0);

        surface.set_distance(IVec2::new(5, 5), Some(1));
        assert_eq!(surface.distance(IVec2::new(5, 5)), None);

        surface.set_distance(coord, None);
        assert!(!surface.has_distance(coord));

        surface.set_distance(coord, Some(5));
        surface.clear_distances();
        assert!(!surface.has_distance(coord));
    }

    #[test]
    fn test_filled_order() {
        let surface = Surface::new(3, 3);
        surface.fill([
            IVec2::new(2, 0),
            IVec2::new(0, 2),
            IVec2::new(1, 1),
            IVec2::new(0, 0),
        ]);

        let expected = vec![
            IVec2::new(0, 0),
            IVec2::new(0, 2),
            IVec2::new(1, 1),
            IVec2::new(2, 0),
        ];
        assert_eq!(surface.filled(), expected);

        // Restartable.
        assert_eq!(surface.iter_filled().collect::<Vec<_>>(), expected);
        assert_eq!(surface.iter_filled().count(), 4);
    }

    #[test]
    fn test_iter_filled_sees_later_changes() {
        let surface = Surface::new(2, 2);
        surface.fill([IVec2::new(0, 0)]);

        let mut iter = surface.iter_filled();
        assert_eq!(iter.next(), Some(IVec2::new(0, 0)));

        surface.fill([IVec2::new(1, 1)]);
        assert_eq!(iter.next(), Some(IVec2::new(1, 1)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let surface = Surface::new(3, 3);
        surface.fill([IVec2::new(1, 1)]);
        surface.set_distance(IVec2::new(0, 0), Some(2));

        let clone = surface.clone();
        assert_eq!(clone.filled(), surface.filled());
        assert_eq!(clone.distance(IVec2::new(0, 0)), None);

        clone.fill([IVec2::new(2, 2)]);
        surface.remove([IVec2::new(1, 1)]);

        assert_eq!(clone.filled(), vec![IVec2::new(1, 1), IVec2::new(2, 2)]);
        assert!(surface.filled().is_empty());
    }

    #[test]
    fn test_center() {
        assert_eq!(Surface::new(5, 5).center(), IVec2::new(2, 2));
        assert_eq!(Surface::new(4, 7).center(), IVec2::new(2, 3));
        assert_eq!(Surface::new(1, 1).center(), IVec2::new(0, 0));
    }

    #[test]
    fn test_filled_around() {
        let surface = Surface::new(3, 3);

        assert_eq!(surface.filled_around(IVec2::new(1, 1)), 0);
        assert_eq!(surface.filled_around(IVec2::new(0, 0)), 2);

        surface.fill([IVec2::new(1, 0)]);
        assert_eq!(surface.filled_around(IVec2::new(0, 0)), 3);
        assert_eq!(surface.filled_around(IVec2::new(1, 1)), 1);
    }

    #[test]
    fn test_from_rows() {
        let surface = Surface::from_rows(&[[0, 0, 0], [0, 0, 0], [0, 1, 0]]).unwrap();

        assert_eq!(surface.width(), 3);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.filled(), vec![IVec2::new(1, 0)]);

        let surface = Surface::from_rows(&[[1, 0], [0, 0], [0, 1]]).unwrap();
        assert_eq!(surface.width(), 2);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.filled(), vec![IVec2::new(0, 2), IVec2::new(1, 0)]);
    }

    #[test]
    fn test_from_ragged_rows() {
        let rows: [&[u8]; 2] = [&[0, 0, 0], &[0, 1]];

        assert_eq!(
            Surface::from_rows(&rows).unwrap_err(),
            SurfaceError::RaggedRows {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_claim() {
        let surface = Surface::new(2, 2);
        let coord = IVec2::new(1, 0);

        assert!(surface.claim(coord));
        assert!(!surface.claim(coord));
        assert!(!surface.claim(IVec2::new(2, 0)));
        assert!(surface.is_filled(coord));
    }

    #[test]
    fn test_relax() {
        let surface = Surface::new(3, 1);
        let coord = IVec2::new(1, 0);

        assert_eq!(surface.relax(coord, 5), Relaxation::Improved);
        assert_eq!(surface.relax(coord, 5), Relaxation::Stale);
        assert_eq!(surface.relax(coord, 7), Relaxation::Stale);
        assert_eq!(surface.relax(coord, 2), Relaxation::Improved);
        assert_eq!(surface.distance(coord), Some(2));

        surface.fill([IVec2::new(2, 0)]);
        assert_eq!(surface.relax(IVec2::new(2, 0), 3), Relaxation::Obstacle);
        assert_eq!(surface.distance(IVec2::new(2, 0)), Some(3));
        assert_eq!(surface.relax(IVec2::new(3, 0), 1), Relaxation::OutOfBounds);
    }
}
