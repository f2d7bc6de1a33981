//! Shared fixtures for the integration tests.
//!
//! Builds comparison inputs, cell matrices, and viewers that have already
//! been fed their catalog and grid completions.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use proptest::test_runner::Config as ProptestConfig;
use sxsview::config::ViewerConfig;
use sxsview::viewer::{SidePaint, SxsViewer};
use sxsview::{
    ChangeRecord, ChangeType, CompareData, CompareFiles, CompareInput, CompareSummary, FileRef,
    GridSnapshot, Side,
};

pub const LEFT_FILE: &str = "file-a";
pub const RIGHT_FILE: &str = "file-b";

/// Case count from `PROPTEST_CASES`, falling back to `default`.
pub fn proptest_config(default: u32) -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

pub fn compare(changes: Vec<ChangeRecord>) -> CompareInput {
    CompareInput {
        files: CompareFiles {
            file1: FileRef::new(LEFT_FILE),
            file2: FileRef::new(RIGHT_FILE),
        },
        data: CompareData {
            summary: CompareSummary::default(),
            changes,
        },
    }
}

pub fn change(row: u32, col: u32, change_type: ChangeType) -> ChangeRecord {
    ChangeRecord::new(row, col, change_type)
}

/// A `rows x cols` grid whose cells read `"r:c"`.
pub fn grid(rows: u32, cols: u32) -> GridSnapshot {
    GridSnapshot::from_rows(
        (0..rows)
            .map(|r| (0..cols).map(|c| format!("{r}:{c}")).collect())
            .collect(),
    )
}

pub fn viewer(changes: Vec<ChangeRecord>) -> SxsViewer {
    SxsViewer::new(compare(changes), ViewerConfig::default())
}

/// A viewer with one sheet per side, both loaded.
pub fn loaded_viewer(changes: Vec<ChangeRecord>, left: GridSnapshot, right: GridSnapshot) -> SxsViewer {
    let mut v = viewer(changes);
    let mut grids = [Some(left), Some(right)];
    for request in v.start() {
        let load = v
            .on_catalog(&request, Ok(vec!["Sheet1".to_string()]))
            .expect("first sheet is auto-selected");
        let snapshot = grids[load.side.index()].take().unwrap();
        v.on_sheet_loaded(&load, Ok(snapshot));
    }
    v
}

/// Paint a side and insist it produced a grid.
pub fn frame_of(v: &SxsViewer, side: Side) -> sxsview::render::GridFrame<'_> {
    match v.paint(side) {
        SidePaint::Grid(frame) => frame,
        SidePaint::Message(m) => panic!("{side:?} shows a message: {m}"),
    }
}

/// Paint a side and insist it produced a message.
pub fn message_of(v: &SxsViewer, side: Side) -> String {
    match v.paint(side) {
        SidePaint::Message(m) => m,
        SidePaint::Grid(_) => panic!("{side:?} shows a grid"),
    }
}
