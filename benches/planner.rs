use criterion::{criterion_group, criterion_main, Criterion, black_box};

use agrodrone::costmap::{GridCoord, VoxelCostmap};
use agrodrone::flight::{Autopilot, DroneParams, DroneState, FlightDynamics};
use agrodrone::planner::PathPlanner;
use agrodrone::terrain::TerrainField;

use glam::Vec3;

fn bench_plan_farm_route(c: &mut Criterion) {
    let grid = VoxelCostmap::default_farm(4.0).expect("farm");
    let planner = PathPlanner::default();
    let start = grid.grid_to_world(GridCoord::new(1, 1, 0));
    let goal = grid.grid_to_world(GridCoord::new(10, 6, 0));

    c.bench_function("plan_farm_route", |b| {
        b.iter(|| planner.find_path(black_box(&grid), black_box(start), black_box(goal)));
    });
}

fn bench_plan_large_grid(c: &mut Criterion) {
    let grid = VoxelCostmap::procedural_farm(64, 64, 8, 4.0).expect("farm");
    let planner = PathPlanner::default();
    let start = grid.grid_to_world(GridCoord::new(1, 1, 0));
    let goal = grid.grid_to_world(GridCoord::new(62, 62, 0));

    c.bench_function("plan_64x64x8", |b| {
        b.iter(|| planner.find_path(black_box(&grid), black_box(start), black_box(goal)));
    });
}

fn bench_terrain_build(c: &mut Criterion) {
    c.bench_function("terrain_build", |b| {
        b.iter(|| TerrainField::new(black_box(12345)));
    });
}

fn bench_terrain_queries(c: &mut Criterion) {
    let terrain = TerrainField::new(12345);

    c.bench_function("terrain_height_and_feature_1k", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for i in 0..1000 {
                let x = (i % 40) as f32 * 8.0 + 0.5;
                let z = (i / 40) as f32 * 12.0 + 0.25;
                sum += terrain.height_at(x, z);
                sum += terrain.feature_code_at(x, z) as f32;
            }
            black_box(sum)
        });
    });
}

fn bench_flight_600_ticks(c: &mut Criterion) {
    let dynamics = FlightDynamics::default();

    c.bench_function("flight_600_ticks", |b| {
        b.iter(|| {
            let mut autopilot = Autopilot::default();
            autopilot.set_route(vec![Vec3::new(0.0, 8.0, 0.0), Vec3::new(30.0, 8.0, 20.0)]);
            let mut state = DroneState::landed(Vec3::new(0.0, 0.5, 0.0), DroneParams::default());
            for _ in 0..600 {
                let input = autopilot.control(&state, dynamics.params());
                state = dynamics.update(&state, 1.0 / 60.0, &input, 0.0);
            }
            black_box(state)
        });
    });
}

criterion_group!(
    benches,
    bench_plan_farm_route,
    bench_plan_large_grid,
    bench_terrain_build,
    bench_terrain_queries,
    bench_flight_600_ticks,
);
criterion_main!(benches);
