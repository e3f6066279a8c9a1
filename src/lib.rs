//! Flood fill, reachability and step counting over bounded 2D occupancy grids.
//!
//! A [`surface::Surface`] tracks which cells of a `width` x `height` grid are filled.
//! A [`flood::FloodFiller`] bound to a surface explores it from a base cell with a
//! bounded number of concurrent branches:
//!
//! - [`flood::FloodFiller::fill`] fills the region behind one neighbor of the base.
//! - [`flood::FloodFiller::can_reach`] tells whether a target can be reached at all.
//! - [`flood::FloodFiller::count_steps`] returns the shortest 4-connected step count.
//!
//! ```
//! use bevy::math::IVec2;
//! use bevy_flood_plane::prelude::*;
//!
//! let mut surface = Surface::new(5, 5);
//! surface.fill((0..5).map(|x| IVec2::new(x, 2)));
//!
//! let mut filler = FloodFiller::new(&mut surface);
//! assert_eq!(filler.count_steps(IVec2::new(0, 0), IVec2::new(4, 4)), None);
//! assert_eq!(filler.fill(IVec2::new(0, 0), IVec2::new(1, 0)), 9);
//! ```
#[macro_use]
mod macros;

pub mod coord;
pub mod dir;
pub mod error;
pub mod flood;
pub mod render;
mod slots;
pub mod surface;
mod wavefront;

pub mod prelude {
    pub use crate::coord::{Coord, CoordExt};
    pub use crate::dir::Dir;
    pub use crate::error::{FloodError, SurfaceError};
    pub use crate::flood::{FloodFiller, FloodSettings, FloodSettingsBuilder, DEFAULT_WORKERS};
    pub use crate::render::{render, render_distances};
    pub use crate::surface::Surface;
}
