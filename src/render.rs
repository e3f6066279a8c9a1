//! Text rendering of a [`Surface`], mostly for debugging and test failure output.
use std::fmt::{self, Write};

use bevy::math::IVec2;

use crate::surface::Surface;

/// Renders filled cells as `x` and empty cells as `.`, top row first, with axis labels.
///
/// ```
/// use bevy::math::IVec2;
/// use bevy_flood_plane::prelude::*;
///
/// let surface = Surface::new(3, 2);
/// surface.fill([IVec2::new(1, 0)]);
///
/// assert_eq!(render(&surface), " 1 | . . .\n 0 | . x .\n     -----\n     0 1 2\n");
/// ```
pub fn render(surface: &Surface) -> String {
    render_with(surface, 1, |coord| {
        let label = if surface.is_filled(coord) { "x" } else { "." };
        label.to_string()
    })
}

/// Renders the step counts recorded by the last distance flood.
/// Cells without a distance show `x` when filled and `.` when empty.
pub fn render_distances(surface: &Surface) -> String {
    let widest = all_coords(surface)
        .filter_map(|coord| surface.distance(coord))
        .max()
        .map_or(1, |distance| distance.to_string().len());

    render_with(surface, widest, |coord| match surface.cell(coord) {
        Some(cell) => match cell.distance {
            Some(distance) => distance.to_string(),
            None if cell.filled => "x".to_string(),
            None => ".".to_string(),
        },
        None => "x".to_string(),
    })
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

fn all_coords(surface: &Surface) -> impl Iterator<Item = IVec2> {
    let (width, height) = (surface.width() as i32, surface.height() as i32);
    (0..width).flat_map(move |x| (0..height).map(move |y| IVec2::new(x, y)))
}

fn render_with(surface: &Surface, cell_width: usize, label: impl Fn(IVec2) -> String) -> String {
    let (width, height) = (surface.width() as i32, surface.height() as i32);
    let label_width = (height.max(1) - 1).to_string().len().max(2);

    let mut out = String::new();
    for y in (0..height).rev() {
        let cells: Vec<String> = (0..width)
            .map(|x| format!("{:>cell_width$}", label(IVec2::new(x, y))))
            .collect();
        let _ = writeln!(out, "{y:>label_width$} | {}", cells.join(" "));
    }

    let margin = " ".repeat(label_width + 3);
    let rule_len = (width as usize * (cell_width + 1)).saturating_sub(1);
    let _ = writeln!(out, "{margin}{}", "-".repeat(rule_len));

    let legend: Vec<String> = (0..width).map(|x| format!("{x:>cell_width$}")).collect();
    let _ = writeln!(out, "{margin}{}", legend.join(" "));

    out
}
