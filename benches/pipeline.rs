use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use traversability::types::{LAYER_ELEVATION, MapInfo};
use traversability::{FilterPipeline, Grid2d, LayeredGrid, PipelineConfig};

/// Rolling terrain with a curb across the middle.
fn terrain(size: u32, resolution: f64) -> LayeredGrid {
    let info = MapInfo::square(size, resolution);
    let elevation = Grid2d::from_fn(info, |cell| {
        let x = cell.x as f64 * resolution;
        let y = cell.y as f64 * resolution;
        let curb = if cell.x > size / 2 { 0.15 } else { 0.0 };
        0.2 * (x * 0.7).sin() * (y * 0.4).cos() + curb
    })
    .unwrap();
    LayeredGrid::with_layer(LAYER_ELEVATION, elevation).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = FilterPipeline::from_config(&PipelineConfig::default(), 0.5).unwrap();

    let mut group = c.benchmark_group("default_pipeline");
    group.sample_size(10);
    for size in [64_u32, 128, 256] {
        let grid = terrain(size, 0.04);
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| black_box(pipeline.run(grid).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
