// Walks through the surface operations on a small board.
// Nothing is displayed on run, results are logged.

use bevy::{log::LogPlugin, prelude::*};
use bevy_flood_plane::prelude::*;

fn main() {
    App::new()
        .add_plugins(LogPlugin::default())
        .add_systems(Startup, (startup, inspect_surface.after(startup)))
        .run();
}

fn startup(mut commands: Commands) {
    // Both x and y range over 0..5.
    let surface = Surface::new(5, 5);

    // 4 | . . . . .
    // 3 | . . . . .
    // 2 | . . . . .
    // 1 | x . . . .
    // 0 | x x . . .
    surface.fill([IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(0, 1)]);

    commands.spawn(surface);
}

fn inspect_surface(surface: Single<&Surface>) {
    let surface = surface.into_inner();

    info!("Starting surface:\n{}", surface);
    info!("(0, 0) filled: {}", surface.is_filled(IVec2::new(0, 0)));

    surface.remove([IVec2::new(0, 0)]);
    info!("(0, 0) filled after remove: {}", surface.is_filled(IVec2::new(0, 0)));

    for coord in surface.iter_filled() {
        info!("Filled: {}", coord);
    }

    info!("All filled: {:?}", surface.filled());
    info!(
        "{} filled, {} empty, {} total",
        surface.count_filled(),
        surface.count_unfilled(),
        surface.total_surface()
    );
    info!("Center: {}", surface.center());
    info!(
        "(-1, -1) fits: {}, (0, 0) fits: {}",
        surface.fits(IVec2::new(-1, -1)),
        surface.fits(IVec2::new(0, 0))
    );

    // Floods fill the surface they run on, so hand them a clone to keep this one intact.
    let copy = surface.clone();
    info!("Clone has {} filled cells", copy.count_filled());
}
