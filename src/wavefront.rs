//! Bounded-concurrency wavefront expansion shared by every flood operation.
//!
//! A sweep starts as one branch working through its own FIFO worklist. Whenever a visited
//! cell opens up a turn, the turn is offered to the [`SlotPool`]; with a free slot it becomes
//! a new branch on the rayon pool, otherwise it stays on the current worklist. Moving straight
//! ahead always stays on the current worklist. All branches are joined before `sweep` returns.
use std::collections::VecDeque;
#[cfg(feature = "parallel")]
use std::sync::atomic::Ordering;
use std::sync::{atomic::AtomicUsize, Mutex, PoisonError};

#[cfg(feature = "parallel")]
use bevy::log::trace;
use bevy::math::IVec2;

use crate::{
    coord::CoordExt,
    dir::Dir,
    slots::SlotPool,
    surface::{Relaxation, Surface},
};

/// A pending visit to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) coord: IVec2,
    /// Points back at the cell this step came from.
    pub(crate) from: Dir,
    /// Cells traveled so far, this one included.
    pub(crate) steps: u32,
}

impl Step {
    pub(crate) fn seed(coord: IVec2, from: Dir) -> Self {
        Step {
            coord,
            from,
            steps: 1,
        }
    }

    fn advance(self, dir: Dir) -> Step {
        Step {
            coord: self.coord.coord_in_direction(dir),
            from: dir.opposite(),
            steps: self.steps + 1,
        }
    }
}

/// Decides what a wavefront does with each cell it reaches.
pub(crate) trait Explorer: Sync {
    /// Per-branch output, collected when the branch finishes.
    type Trail: Default + Send;

    /// Cheap pre-check before a step is queued or handed to another branch.
    /// Returning `false` must mean `visit` could never return `true` for this step.
    fn worth_visiting(&self, surface: &Surface, step: Step) -> bool;

    /// Visits the cell. Returns `true` when the wavefront should expand past it.
    fn visit(&self, surface: &Surface, step: Step, trail: &mut Self::Trail) -> bool;
}

/// Fills every empty cell it reaches. Trails hold the cells each branch filled.
pub(crate) struct FillExplorer;

impl Explorer for FillExplorer {
    type Trail = Vec<IVec2>;

    fn worth_visiting(&self, surface: &Surface, step: Step) -> bool {
        !surface.is_filled(step.coord)
    }

    fn visit(&self, surface: &Surface, step: Step, trail: &mut Vec<IVec2>) -> bool {
        if !surface.claim(step.coord) {
            return false;
        }
        trail.push(step.coord);
        true
    }
}

/// Records the shortest step count at every cell it reaches, without filling anything.
///
/// Filled cells get a distance but are never expanded. A cell is reopened whenever a
/// branch arrives with a strictly smaller count than the one recorded.
pub(crate) struct DistanceExplorer;

impl Explorer for DistanceExplorer {
    type Trail = ();

    fn worth_visiting(&self, surface: &Surface, step: Step) -> bool {
        surface.fits(step.coord)
            && surface
                .distance(step.coord)
                .is_none_or(|distance| distance > step.steps)
    }

    fn visit(&self, surface: &Surface, step: Step, _: &mut ()) -> bool {
        surface.relax(step.coord, step.steps) == Relaxation::Improved
    }
}

/// Result of a finished sweep.
#[derive(Debug)]
pub(crate) struct Sweep<T> {
    pub(crate) trails: Vec<T>,
    /// Branches that took part, the calling thread's own branch included.
    pub(crate) branches: usize,
}

struct Context<'a, E: Explorer> {
    surface: &'a Surface,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    slots: &'a SlotPool,
    explorer: &'a E,
    trails: Mutex<Vec<E::Trail>>,
    branches: AtomicUsize,
}

/// Expands from `seed` until the wavefront dies out. Blocks until every branch is done.
pub(crate) fn sweep<E: Explorer>(
    surface: &Surface,
    slots: &SlotPool,
    explorer: &E,
    seed: Step,
) -> Sweep<E::Trail> {
    let context = Context {
        surface,
        slots,
        explorer,
        trails: Mutex::new(Vec::new()),
        branches: AtomicUsize::new(1),
    };

    #[cfg(feature = "parallel")]
    rayon::scope(|scope| branch(scope, &context, seed));

    #[cfg(not(feature = "parallel"))]
    drain(&context, seed, Some);

    Sweep {
        trails: context
            .trails
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner),
        branches: context.branches.into_inner(),
    }
}

#[cfg(feature = "parallel")]
fn branch<'a, E: Explorer>(scope: &rayon::Scope<'a>, context: &'a Context<'a, E>, seed: Step) {
    drain(context, seed, |step| {
        let Some(permit) = context.slots.try_acquire() else {
            return Some(step);
        };

        context.branches.fetch_add(1, Ordering::Relaxed);
        trace!(
            "Branching flood at {} ({} slots in use)",
            step.coord,
            context.slots.in_use()
        );

        scope.spawn(move |scope| {
            let _permit = permit;
            branch(scope, context, step);
        });
        None
    });
}

/// Works through one branch's worklist. `offload` either takes a turning step off this
/// branch or hands it back to be handled here.
fn drain<E: Explorer>(
    context: &Context<'_, E>,
    seed: Step,
    mut offload: impl FnMut(Step) -> Option<Step>,
) {
    let Context {
        surface, explorer, ..
    } = *context;

    let mut trail = E::Trail::default();
    let mut frontier = VecDeque::from([seed]);

    while let Some(step) = frontier.pop_front() {
        if !explorer.visit(surface, step, &mut trail) {
            continue;
        }

        let heading = step.from.opposite();
        for dir in Dir::ALL {
            if dir == step.from {
                continue;
            }

            let next = step.advance(dir);
            if !explorer.worth_visiting(surface, next) {
                continue;
            }

            if dir == heading {
                frontier.push_back(next);
            } else if let Some(next) = offload(next) {
                frontier.push_back(next);
            }
        }
    }

    context
        .trails
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(trail);
}
