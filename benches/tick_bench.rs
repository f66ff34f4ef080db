use criterion::{black_box, criterion_group, criterion_main, Criterion};

use deepkeep::core::config::SimulationConfig;
use deepkeep::core::types::{TileCoord, Vec3};
use deepkeep::entity::class::ClassCatalog;
use deepkeep::mailbox::Outbox;
use deepkeep::simulation::Simulation;
use deepkeep::spatial::{GridPlanner, PathPlanner};
use deepkeep::world::map::TileMap;
use deepkeep::world::tile::Passability;

/// Open cavern ringed by walls with a marked seam every fifth column
fn cavern(size: usize) -> String {
    let mut rows = Vec::with_capacity(size);
    for y in 0..size {
        let row: String = (0..size)
            .map(|x| {
                if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                    '#'
                } else if x % 5 == 0 && y % 3 != 0 {
                    '*'
                } else {
                    '.'
                }
            })
            .collect();
        rows.push(row);
    }
    rows.join("\n")
}

fn bench_tick(c: &mut Criterion) {
    let map = TileMap::from_ascii(&cavern(40)).expect("cavern parses");
    let (outbox, render_rx) = Outbox::offline();
    let mut sim = Simulation::new(
        SimulationConfig::default(),
        map,
        ClassCatalog::with_defaults(),
        outbox,
    )
    .expect("default config is valid");

    for i in 0..20 {
        let x = 1.0 + (i % 4) as f64;
        let y = 1.0 + (i / 4) as f64 * 2.0;
        sim.spawn("Kobold", None, Vec3::new(x, y, 0.0))
            .expect("kobold class exists");
    }

    c.bench_function("simulation/tick(kobolds=20)", |b| {
        b.iter(|| {
            sim.tick(0.1).expect("tick succeeds");
            black_box(render_rx.drain_all().len());
        })
    });
}

fn bench_path(c: &mut Criterion) {
    let map = TileMap::from_ascii(&cavern(64)).expect("cavern parses");
    let planner = GridPlanner::default();

    c.bench_function("pathfinding/grid(64x64)", |b| {
        b.iter(|| {
            let path = planner.path(
                &map,
                TileCoord::new(1, 1),
                TileCoord::new(62, 62),
                Passability::WALKABLE,
            );
            black_box(path.len());
        })
    });
}

criterion_group!(benches, bench_tick, bench_path);
criterion_main!(benches);
