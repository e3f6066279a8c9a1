// Runs each flood operation against a surface stored on an entity.
// Nothing is displayed on run, results are logged.

use bevy::{log::LogPlugin, prelude::*};
use bevy_flood_plane::prelude::*;

fn main() {
    App::new()
        .add_plugins(LogPlugin::default())
        .add_systems(Startup, (startup, run_floods.after(startup)))
        .run();
}

fn startup(mut commands: Commands) {
    let surface = Surface::from_rows(&[
        [0, 0, 0, 0, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 1, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 0, 0, 0],
    ]);

    match surface {
        Ok(surface) => {
            commands.spawn(surface);
        }
        Err(err) => error!("Invalid layout: {}", err),
    }
}

fn run_floods(surface: Single<&Surface>) {
    let surface = surface.into_inner();
    let base = IVec2::new(0, 0);
    let target = IVec2::new(4, 4);

    info!("Layout:\n{}", surface);

    // Every operation fills or tags the surface it runs on, so each one gets a clone
    // and the surface on the entity keeps its layout.
    let mut copy = surface.clone();
    let mut filler = FloodFiller::new(&mut copy);
    let filled = filler.flood(base, IVec2::new(0, 1));
    info!("Flood from (0, 1) filled {} cells", filled.len());
    info!("After flood:\n{}", filler.surface());

    let mut copy = surface.clone();
    let mut filler = FloodFiller::new(&mut copy);
    match filler.count_steps(base, target) {
        Some(steps) => info!("{} steps from {} to {}", steps, base, target),
        None => info!("{} cannot be reached from {}", target, base),
    }
    info!("Distances:\n{}", render_distances(filler.surface()));

    let mut copy = surface.clone();
    let mut filler = FloodFiller::new(&mut copy);
    info!("Can reach {}: {}", target, filler.can_reach(base, target));

    // Only the first step onto (1, 0) is allowed.
    let mut copy = surface.clone();
    let settings = FloodSettingsBuilder::new().workers(2).build();
    match settings {
        Ok(settings) => {
            let mut filler = FloodFiller::with_settings(&mut copy, settings);
            info!(
                "Can reach {} starting at (1, 0): {}",
                target,
                filler.can_reach_when_starting_fill_at(base, target, IVec2::new(1, 0))
            );
        }
        Err(err) => error!("Invalid settings: {}", err),
    }

    info!("Entity surface still has {} filled cells", surface.count_filled());
}
