//! This module contains the [`FloodFiller`], which runs fills, reachability checks and
//! step counts over a [`Surface`].
use bevy::{log::debug, math::IVec2};

use crate::{
    coord::CoordExt,
    dir::Dir,
    error::FloodError,
    slots::SlotPool,
    surface::Surface,
    wavefront::{sweep, DistanceExplorer, Explorer, FillExplorer, Step, Sweep},
};

/// Default number of flood branches allowed to run at the same time.
pub const DEFAULT_WORKERS: usize = 8;

/// Settings for a [`FloodFiller`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FloodSettings {
    /// Maximum number of flood branches running concurrently besides the calling thread.
    pub workers: usize,
}

impl Default for FloodSettings {
    fn default() -> Self {
        FloodSettings {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Builder for [`FloodSettings`].
///
/// ```
/// use bevy_flood_plane::prelude::*;
///
/// let settings = FloodSettingsBuilder::new().workers(4).build().unwrap();
/// assert_eq!(settings.workers, 4);
///
/// assert!(FloodSettingsBuilder::new().workers(0).build().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FloodSettingsBuilder {
    settings: FloodSettings,
}

impl FloodSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of concurrency slots. Must be at least 1.
    pub fn workers(mut self, workers: usize) -> Self {
        self.settings.workers = workers;
        self
    }

    pub fn build(self) -> Result<FloodSettings, FloodError> {
        if self.settings.workers == 0 {
            return Err(FloodError::NoWorkers);
        }
        Ok(self.settings)
    }
}

/// How `reach` decides whether the target was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReachMode {
    /// Fill the region and watch the target's neighbors fill up.
    Fill,
    /// Record step counts and check whether the target got one.
    Distance,
}

/// Flood fill engine bound to one [`Surface`].
///
/// Every operation walls off `base` for its duration so the flood cannot leak back
/// through it, and restores it before returning.
///
/// The filler borrows its surface mutably, so operations on one surface are always
/// serialized. Use [`FloodFiller::surface`] to read or edit the surface in between.
///
/// # Example
/// ```
/// use bevy::math::IVec2;
/// use bevy_flood_plane::prelude::*;
///
/// let mut surface = Surface::new(9, 9);
/// let mut filler = FloodFiller::new(&mut surface);
///
/// assert_eq!(filler.fill(IVec2::new(0, 0), IVec2::new(0, 1)), 80);
///
/// let mut surface = Surface::new(5, 5);
/// let mut filler = FloodFiller::new(&mut surface);
/// assert_eq!(filler.count_steps(IVec2::new(0, 0), IVec2::new(4, 4)), Some(8));
/// ```
#[derive(Debug)]
pub struct FloodFiller<'s> {
    surface: &'s mut Surface,
    slots: SlotPool,
}

impl<'s> FloodFiller<'s> {
    /// Creates a filler over `surface` with [`DEFAULT_WORKERS`] concurrency slots.
    pub fn new(surface: &'s mut Surface) -> Self {
        Self::with_settings(surface, FloodSettings::default())
    }

    /// Creates a filler with the given [`FloodSettings`].
    pub fn with_settings(surface: &'s mut Surface, settings: FloodSettings) -> Self {
        FloodFiller {
            surface,
            slots: SlotPool::new(settings.workers.max(1)),
        }
    }

    /// Returns the surface this filler works on.
    pub fn surface(&self) -> &Surface {
        &*self.surface
    }

    /// Fills the region reachable from `start_at`, treating `base` as a wall.
    ///
    /// Returns the number of cells filled, `base` excluded. Returns 0 without touching
    /// the surface when `start_at` is not a direct neighbor of `base`.
    pub fn fill(&mut self, base: IVec2, start_at: IVec2) -> usize {
        let surface: &Surface = self.surface;
        let slots = &self.slots;

        walled(surface, base, start_at, |seed| {
            let before = surface.count_filled();
            run(surface, slots, &FillExplorer, seed);
            surface.count_filled() - before
        })
        .unwrap_or(0)
    }

    /// Like [`FloodFiller::fill`] but returns the cells that were filled, ordered by `x`
    /// and then by `y`.
    pub fn flood(&mut self, base: IVec2, start_at: IVec2) -> Vec<IVec2> {
        let surface: &Surface = self.surface;
        let slots = &self.slots;

        let Some(result) = walled(surface, base, start_at, |seed| {
            run(surface, slots, &FillExplorer, seed)
        }) else {
            return Vec::new();
        };

        let mut cells: Vec<IVec2> = result.trails.into_iter().flatten().collect();
        cells.sort_unstable_by_key(|cell| (cell.x, cell.y));
        cells
    }

    /// Returns true if a path through empty cells leads from `base` to `target`.
    ///
    /// Floods from every neighbor of `base`, so the reachable region is left filled.
    pub fn can_reach(&mut self, base: IVec2, target: IVec2) -> bool {
        self.reach(base, target, ReachMode::Fill, &[])
    }

    /// Returns true if a path through empty cells leads from `base` to `target`
    /// when the first step must be onto `start_at`.
    pub fn can_reach_when_starting_fill_at(
        &mut self,
        base: IVec2,
        target: IVec2,
        start_at: IVec2,
    ) -> bool {
        self.reach(base, target, ReachMode::Fill, &[start_at])
    }

    /// Returns the smallest number of 4-connected steps from `base` to `target`,
    /// or `None` if `target` cannot be reached.
    ///
    /// Distances from earlier calls are cleared first. Filled cells are never filled or
    /// unfilled by this call, but a filled `target` still gets the distance of the step
    /// onto it.
    pub fn count_steps(&mut self, base: IVec2, target: IVec2) -> Option<u32> {
        if !self.reach(base, target, ReachMode::Distance, &[]) {
            return None;
        }
        self.surface.distance(target)
    }

    /// [`FloodFiller::count_steps`] with `-1` standing in for an unreachable target.
    pub fn count_steps_or_negative(&mut self, base: IVec2, target: IVec2) -> i64 {
        self.count_steps(base, target).map_or(-1, i64::from)
    }

    fn reach(
        &mut self,
        base: IVec2,
        target: IVec2,
        mode: ReachMode,
        allowed_starts: &[IVec2],
    ) -> bool {
        let surface: &Surface = self.surface;
        let slots = &self.slots;

        let filled_before = surface.filled_around(target);
        if mode == ReachMode::Distance {
            surface.clear_distances();
        }

        for start_at in Dir::all().map(|dir| base.coord_in_direction(dir)) {
            if !allowed_starts.is_empty() && !allowed_starts.contains(&start_at) {
                continue;
            }

            walled(surface, base, start_at, |seed| match mode {
                ReachMode::Fill => {
                    run(surface, slots, &FillExplorer, seed);
                }
                ReachMode::Distance => {
                    run(surface, slots, &DistanceExplorer, seed);
                }
            });
        }

        match mode {
            ReachMode::Fill => surface.filled_around(target) > filled_before,
            ReachMode::Distance => {
                // The base is never a destination, filled or not.
                surface.set_distance(base, None);
                surface.has_distance(target)
            }
        }
    }
}

/// Walls off `base`, runs `flood` from `start_at`, and restores `base`.
///
/// Returns `None` without running anything when the two are not direct neighbors.
/// A `base` that was already filled stays filled afterwards.
fn walled<R>(
    surface: &Surface,
    base: IVec2,
    start_at: IVec2,
    flood: impl FnOnce(Step) -> R,
) -> Option<R> {
    let from = Dir::between(start_at, base)?;

    let placed = surface.claim(base);
    let result = flood(Step::seed(start_at, from));
    if placed {
        surface.remove([base]);
    }

    Some(result)
}

fn run<E: Explorer>(
    surface: &Surface,
    slots: &SlotPool,
    explorer: &E,
    seed: Step,
) -> Sweep<E::Trail> {
    let result = timed!("Flood sweep", { sweep(surface, slots, explorer, seed) });
    debug!(
        "Flood from {} finished using {} branches",
        seed.coord, result.branches
    );
    result
}
