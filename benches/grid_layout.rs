use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use widget_dashboard::dashboard::grid::{self, DashboardGrid};
use widget_dashboard::dashboard::model::{DashboardLayout, WidgetConfig, WidgetSize, WidgetType};

fn big_layout() -> DashboardLayout {
    let sizes = [
        WidgetSize::Small,
        WidgetSize::Medium,
        WidgetSize::Wide,
        WidgetSize::Large,
        WidgetSize::ExtraLarge,
    ];
    (0..500).fold(DashboardLayout::new("bench", "Bench"), |layout, i| {
        let mut widget = WidgetConfig::new(format!("w{i}"), WidgetType::Stats, format!("Widget {i}"));
        widget.size = sizes[i % sizes.len()].clone();
        layout.with_widget(widget)
    })
}

fn bench_grid(c: &mut Criterion) {
    let layout = big_layout();
    let states = HashMap::new();
    c.bench_function("grid_cells_500", |b| {
        b.iter(|| DashboardGrid::new(&layout, &states).cells().len())
    });
    c.bench_function("grid_reorder_500", |b| {
        b.iter(|| grid::reorder(&layout, 499, 0))
    });
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
