use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo::{coord, Rect};

use bjerknes::charts::FieldChart;
use bjerknes::colortables::get_color_table;
use bjerknes::grid::Grid;
use bjerknes::mask::{grid_mask, MaskRegion};

fn quarter_degree_grid() -> Grid {
    let lons: Vec<f64> = (0..=280).map(|i| 70.0 + 0.25 * i as f64).collect();
    let lats: Vec<f64> = (0..=200).map(|i| 10.0 + 0.25 * i as f64).collect();
    Grid::from_fn(lons, lats, |lon, lat| (30.0 - 0.8 * (lat - 10.0) + 0.05 * (lon - 70.0)) as f32)
        .unwrap()
}

fn bench_grid_mask(c: &mut Criterion) {
    let grid = quarter_degree_grid();
    let region = MaskRegion::from_rect(
        "box",
        Rect::new(coord! { x: 100.0, y: 25.0 }, coord! { x: 120.0, y: 40.0 }),
    );
    c.bench_function("grid_mask_quarter_degree", |b| {
        b.iter(|| grid_mask(black_box(&region), &grid.lons, &grid.lats))
    });
}

fn bench_field_chart(c: &mut Criterion) {
    let grid = quarter_degree_grid();
    let table = get_color_table("temperature_nws").unwrap();
    let chart = FieldChart::new(table, 800, 600).unwrap();
    c.bench_function("field_chart_800x600", |b| {
        b.iter(|| chart.render(black_box(&grid)).unwrap())
    });
}

criterion_group!(benches, bench_grid_mask, bench_field_chart);
criterion_main!(benches);
