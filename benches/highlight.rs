//! Benchmarks for highlight indexing and frame computation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sxsview::config::ViewerConfig;
use sxsview::diff_index::HighlightMap;
use sxsview::layout::{RowFilter, ScrollOffset, Viewport};
use sxsview::render::{GridRenderer, GridView};
use sxsview::{ChangeRecord, ChangeType, GridSnapshot, SelectionCursor};

/// Changes spread over a sheet, with every tenth record repeating an earlier
/// coordinate.
fn changes(count: usize) -> Vec<ChangeRecord> {
    (0..count)
        .map(|i| {
            let i = if i % 10 == 9 { i / 2 } else { i };
            let change_type = match i % 3 {
                0 => ChangeType::Modified,
                1 => ChangeType::Added,
                _ => ChangeType::Removed,
            };
            ChangeRecord::new((i / 20) as u32, (i % 20) as u32, change_type)
        })
        .collect()
}

fn snapshot(rows: u32, cols: u32) -> GridSnapshot {
    GridSnapshot::from_rows(
        (0..rows)
            .map(|r| (0..cols).map(|c| format!("R{r}C{c}")).collect())
            .collect(),
    )
}

fn bench_highlight_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight_build");
    for count in [1_000usize, 10_000, 100_000] {
        let input = changes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| HighlightMap::build(black_box(input)));
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let snap = snapshot(5_000, 20);
    let map = HighlightMap::build(&changes(20_000));
    let config = ViewerConfig::default();
    let layout = GridRenderer::layout_for(&snap, &config, RowFilter::All);
    let mut viewport = Viewport::new(1600.0, 900.0);
    viewport.offset = ScrollOffset::new(48_000.0, 0.0);
    let mut cursor = SelectionCursor::new();
    cursor.select(2_010, 3);

    c.bench_function("frame_5000x20", |b| {
        b.iter(|| {
            GridRenderer::frame(black_box(&GridView {
                snapshot: &snap,
                layout: &layout,
                viewport: &viewport,
                highlights: Some(&map),
                cursor: &cursor,
            }))
        });
    });

    let changed = map.changed_rows();
    let filtered = GridRenderer::layout_for(&snap, &config, RowFilter::Only(&changed));
    viewport.offset = ScrollOffset::default();
    c.bench_function("frame_5000x20_only_changes", |b| {
        b.iter(|| {
            GridRenderer::frame(black_box(&GridView {
                snapshot: &snap,
                layout: &filtered,
                viewport: &viewport,
                highlights: Some(&map),
                cursor: &cursor,
            }))
        });
    });
}

criterion_group!(benches, bench_highlight_build, bench_frame);
criterion_main!(benches);
