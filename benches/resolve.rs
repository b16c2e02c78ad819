//! Benchmarks for style resolution and injection.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

use chartstyle::{
    ApplyOptions, ChartData, ChartType, ExtractedStyles, MemoryNode, StyleOverrides, apply_chart,
    apply_styles, extract_styles, resolve_styles,
};

fn sample_overrides() -> StyleOverrides {
    StyleOverrides::from_raw(&json!({
        "cellFill": "#F5F5F5",
        "cellTop": { "color": "#E0E0E0", "thickness": 1 },
        "gridContainer": { "thickness": 2, "sides": { "left": false } },
        "marks": ["#3B82F6", "#F97316", { "fill": "#10B981", "thickness": 3 }],
    }))
}

/// A chart with `columns` bars of `series` segments each, plus cells and tabs.
fn sample_scene(columns: usize, series: usize) -> MemoryNode {
    let bars = (1..=columns)
        .map(|c| {
            let segments = (1..=series)
                .map(|s| MemoryNode::frame(format!("bar_{c}_{s}"), 0.0))
                .collect();
            MemoryNode::frame(format!("bar_{c}"), 200.0).with_children(segments)
        })
        .collect();
    let cells = (1..=columns)
        .map(|c| MemoryNode::frame(format!("cell_{c}"), 20.0))
        .collect();
    MemoryNode::frame("chart", 240.0).with_children(vec![
        MemoryNode::frame("grid", 200.0).with_children(bars),
        MemoryNode::frame("body", 20.0).with_children(cells),
        MemoryNode::frame("tab_1", 20.0),
    ])
}

fn stacked_data(columns: usize, series: usize) -> ChartData {
    let rows: Vec<Vec<f64>> = (0..=series)
        .map(|s| (0..columns).map(|c| ((c + s) % 7) as f64 * 10.0).collect())
        .collect();
    serde_json::from_value(json!({ "type": "stackedBar", "values": rows })).unwrap()
}

// ============================================================================
// Resolver Benchmarks
// ============================================================================

fn bench_resolve_defaults(c: &mut Criterion) {
    let explicit = StyleOverrides::default();
    let extracted = ExtractedStyles::default();

    c.bench_function("resolve_defaults", |b| {
        b.iter(|| resolve_styles(&explicit, &extracted, 3));
    });
}

fn bench_resolve_mixed(c: &mut Criterion) {
    let explicit = sample_overrides();
    let extracted = extract_styles(&sample_scene(12, 4), ChartType::StackedBar);

    c.bench_function("resolve_mixed", |b| {
        b.iter(|| resolve_styles(&explicit, &extracted, 12));
    });
}

fn bench_normalize_overrides(c: &mut Criterion) {
    let raw = json!({
        "cellTop": { "color": " #e0e0e0 ", "thickness": "1.6" },
        "tabRight": { "visible": false, "thickness": 99 },
        "marks": ["#3b82f6", { "color": "#F97316", "strokeStyle": "dash" }],
    });

    c.bench_function("normalize_overrides", |b| {
        b.iter(|| StyleOverrides::from_raw(&raw));
    });
}

// ============================================================================
// Apply Benchmarks
// ============================================================================

fn bench_apply_stacked(c: &mut Criterion) {
    let layout = stacked_data(12, 4).layout().unwrap();
    let styles = resolve_styles(&sample_overrides(), &ExtractedStyles::default(), 4);
    let scene = sample_scene(12, 4);

    c.bench_function("apply_stacked", |b| {
        b.iter(|| {
            let mut scene = scene.clone();
            apply_chart(&mut scene, &layout, ApplyOptions::default());
            apply_styles(&mut scene, &styles, ChartType::StackedBar)
        });
    });
}

criterion_group!(
    benches,
    // Resolver
    bench_resolve_defaults,
    bench_resolve_mixed,
    bench_normalize_overrides,
    // Apply
    bench_apply_stacked,
);
criterion_main!(benches);
