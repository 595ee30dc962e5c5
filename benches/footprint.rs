use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::DVec2;

use traversability::query::{FootprintParams, InclinationParams};
use traversability::types::{LAYER_ELEVATION, LAYER_TRAVERSABILITY, MapInfo};
use traversability::{
    FootprintPath, FootprintShape, Grid2d, LayeredGrid, Polygon, Pose2, check_footprint_path,
    check_inclination, query_footprint,
};

fn snapshot(size: u32, resolution: f64) -> LayeredGrid {
    let info = MapInfo::square(size, resolution);
    let trav = Grid2d::from_fn(info.clone(), |cell| {
        ((cell.x * 7 + cell.y * 13) % 10) as f64 / 10.0
    })
    .unwrap();
    let elevation = Grid2d::from_fn(info, |cell| cell.x as f64 * resolution * 0.1).unwrap();
    let mut grid = LayeredGrid::with_layer(LAYER_TRAVERSABILITY, trav).unwrap();
    grid.add_layer(LAYER_ELEVATION, elevation).unwrap();
    grid
}

fn bench_queries(c: &mut Criterion) {
    let grid = snapshot(256, 0.04);
    let footprint = FootprintParams::default();
    let inclination = InclinationParams::default();

    let robot = Polygon::rectangle(0.8, 0.6).transform(Pose2::new(DVec2::new(5.0, 5.0), 0.3));
    c.bench_function("query_footprint_0.8x0.6", |b| {
        b.iter(|| black_box(query_footprint(&robot, &grid, &footprint)));
    });

    c.bench_function("check_inclination", |b| {
        b.iter(|| {
            black_box(check_inclination(
                DVec2::new(1.0, 1.0),
                DVec2::new(9.0, 6.0),
                &grid,
                &inclination,
            ))
        });
    });

    let path = FootprintPath {
        poses: (0..20)
            .map(|i| Pose2::new(DVec2::new(1.0 + i as f64 * 0.4, 5.0), 0.0))
            .collect(),
        footprint: FootprintShape::Radius(0.35),
    };
    c.bench_function("check_footprint_path_20_poses", |b| {
        b.iter(|| black_box(check_footprint_path(&path, &grid, &footprint, &inclination, 16)));
    });
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
