use bevy::math::IVec2;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use bevy_flood_plane::prelude::*;

fn scattered(size: u32, density: f64) -> Surface {
    let mut rng = StdRng::seed_from_u64(7);
    let surface = Surface::new(size, size);
    surface.fill(
        (0..size as i32)
            .flat_map(|x| (0..size as i32).map(move |y| IVec2::new(x, y)))
            .filter(|_| rng.random_bool(density)),
    );
    surface.remove([IVec2::new(0, 0), IVec2::new(0, 1), IVec2::new(1, 0)]);
    surface
}

fn benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood");

    group.sample_size(10);

    group.bench_function("fill_11x11", |b| {
        b.iter_batched(
            || Surface::new(11, 11),
            |mut surface| {
                let mut filler = FloodFiller::new(&mut surface);
                filler.fill(IVec2::new(0, 0), IVec2::new(0, 1))
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("count_steps_11x11", |b| {
        let mut surface = Surface::new(11, 11);
        let mut filler = FloodFiller::new(&mut surface);
        b.iter(|| filler.count_steps(IVec2::new(0, 0), IVec2::new(10, 10)))
    });

    let layout = scattered(256, 0.25);

    for workers in [1, 8] {
        let settings = FloodSettingsBuilder::new().workers(workers).build().unwrap();

        group.bench_function(format!("fill_256x256_{workers}_workers"), |b| {
            b.iter_batched(
                || layout.clone(),
                |mut surface| {
                    let mut filler = FloodFiller::with_settings(&mut surface, settings);
                    filler.fill(IVec2::new(0, 0), IVec2::new(1, 0))
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("count_steps_256x256_{workers}_workers"), |b| {
            let mut surface = layout.clone();
            let mut filler = FloodFiller::with_settings(&mut surface, settings);
            b.iter(|| filler.count_steps(IVec2::new(0, 0), IVec2::new(255, 255)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
