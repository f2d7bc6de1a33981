//! The side-by-side viewer.
//!
//! [`SxsViewer`] is the orchestrator: it owns both sides, the shared
//! highlight map, the shared selection cursor and the scroll coordinator. It
//! performs no I/O. Operations that need the network return request values;
//! the driver runs them and feeds the completions back in, in whatever order
//! they arrive. Every grid load carries the `(file, sheet)` key it was issued
//! for, and a completion whose key no longer matches the side's selection is
//! dropped.
//!
//! In the browser build [`SxsView`] wraps the viewer with DOM panes, Canvas
//! painting, scroll/click wiring and `fetch`.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
pub mod scroll;
pub mod side;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::ViewerConfig;
use crate::diff_index::{ChangeCounts, HighlightMap};
use crate::error::{Result, SxsError};
use crate::layout::{RowFilter, ScrollOffset};
use crate::render::{GridFrame, GridRenderer, GridView};
use crate::search::{self, SearchHit, SearchOptions};
use crate::types::{
    CellCoord, CompareInput, CompareSummary, GridSnapshot, PerSide, SelectionCursor, SheetName,
    Side,
};

#[cfg(target_arch = "wasm32")]
pub use dom::SxsView;
pub use scroll::{MirrorWrite, ScrollCoordinator, ScrollOutcome, SyncState};
pub use side::{
    CatalogRequest, CatalogState, LoadOutcome, LoadState, SheetKey, SheetRequest, SideState,
};

/// What one side should show right now.
#[derive(Debug)]
pub enum SidePaint<'a> {
    Grid(GridFrame<'a>),
    Message(String),
}

/// Per-side part of [`ViewerSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct SideSummary {
    pub side: Side,
    pub label: &'static str,
    pub file: String,
    pub sheets: Vec<SheetName>,
    pub selected: Option<SheetName>,
    pub rows: u32,
    pub cols: u32,
    pub status: Option<String>,
    pub error_kind: Option<&'static str>,
}

/// Counts and state exposed to the host page.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerSummary {
    pub compare: CompareSummary,
    pub counts: ChangeCounts,
    pub changed_rows: usize,
    pub scroll_sync: bool,
    pub show_differences: bool,
    pub only_changes: bool,
    pub selected: Option<CellCoord>,
    pub sides: [SideSummary; 2],
}

pub struct SxsViewer {
    config: ViewerConfig,
    compare: CompareSummary,
    highlights: HighlightMap,
    changed_rows: BTreeSet<u32>,
    cursor: SelectionCursor,
    sides: PerSide<SideState>,
    scroll: ScrollCoordinator,
    show_differences: bool,
    only_changes: bool,
}

impl SxsViewer {
    /// Build the viewer for one comparison result. The highlight map is
    /// computed here and never again.
    pub fn new(input: CompareInput, config: ViewerConfig) -> Self {
        let config = config.normalized();
        let highlights = HighlightMap::build(&input.data.changes);
        let changed_rows = highlights.changed_rows();
        log::info!(
            "comparison {} vs {}: {} highlighted cells in {} rows",
            input.files.file1,
            input.files.file2,
            highlights.len(),
            changed_rows.len()
        );
        Self {
            scroll: ScrollCoordinator::new(config.scroll_sync, config.sync_quiescence_ms),
            show_differences: config.show_differences,
            only_changes: false,
            compare: input.data.summary,
            highlights,
            changed_rows,
            cursor: SelectionCursor::new(),
            sides: PerSide::new(
                SideState::new(Side::Left, input.files.file1),
                SideState::new(Side::Right, input.files.file2),
            ),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn side(&self, side: Side) -> &SideState {
        self.sides.get(side)
    }

    pub fn highlights(&self) -> &HighlightMap {
        &self.highlights
    }

    pub fn cursor(&self) -> &SelectionCursor {
        &self.cursor
    }

    pub fn scroll(&self) -> &ScrollCoordinator {
        &self.scroll
    }

    pub fn show_differences(&self) -> bool {
        self.show_differences
    }

    pub fn only_changes(&self) -> bool {
        self.only_changes
    }

    // --- loading -------------------------------------------------------

    /// Catalog requests for both files. Issued once, when the viewer starts.
    pub fn start(&self) -> [CatalogRequest; 2] {
        Side::BOTH.map(|side| CatalogRequest {
            side,
            file: self.sides.get(side).file.clone(),
        })
    }

    /// A catalog call finished. Returns the grid load for the auto-selected
    /// first sheet, if one was selected.
    pub fn on_catalog(
        &mut self,
        request: &CatalogRequest,
        result: Result<Vec<SheetName>>,
    ) -> Option<SheetRequest> {
        let state = self.sides.get_mut(request.side);
        if state.file != request.file {
            log::debug!("dropping catalog for {} on {:?}", request.file, request.side);
            return None;
        }
        match result {
            Ok(sheets) => {
                log::info!("{:?} catalog: {} sheets in {}", request.side, sheets.len(), state.file);
                let first = sheets.first().cloned();
                state.catalog = CatalogState::Ready(sheets);
                match (state.selected.is_none(), first) {
                    (true, Some(first)) => self.select_sheet(request.side, &first),
                    _ => None,
                }
            }
            Err(e) => {
                log::warn!("{:?} catalog failed ({}): {e}", request.side, e.kind());
                state.catalog = CatalogState::Failed(e);
                None
            }
        }
    }

    /// Select a sheet on one side. Returns the tagged load request, or `None`
    /// when nothing needs loading (same sheet, or the name was rejected).
    pub fn select_sheet(&mut self, side: Side, sheet: &str) -> Option<SheetRequest> {
        let state = self.sides.get_mut(side);
        if !state.sheets().iter().any(|s| s == sheet) {
            log::warn!("{side:?}: sheet '{sheet}' is not in {}", state.file);
            state.notice = Some(SxsError::SheetNotFound {
                file: state.file.to_string(),
                sheet: sheet.to_string(),
            });
            return None;
        }
        let same = state.selected.as_deref() == Some(sheet);
        if same && matches!(state.load, LoadState::Loading(_) | LoadState::Ready(_)) {
            return None;
        }

        let key = SheetKey {
            file: state.file.clone(),
            sheet: sheet.to_string(),
        };
        log::debug!("{side:?}: loading {key}");
        state.selected = Some(sheet.to_string());
        state.load = LoadState::Loading(key.clone());
        state.notice = None;
        state.layout = None;
        Some(SheetRequest { side, key })
    }

    /// A grid load finished. The result is applied only when its key still
    /// matches the side's selection.
    pub fn on_sheet_loaded(
        &mut self,
        request: &SheetRequest,
        result: Result<GridSnapshot>,
    ) -> LoadOutcome {
        let side = request.side;
        let state = self.sides.get_mut(side);
        let current = matches!(&state.load, LoadState::Loading(key) if *key == request.key);
        if !current {
            log::debug!("{side:?}: dropping stale result for {}", request.key);
            return LoadOutcome::Discarded;
        }
        match result {
            Ok(snapshot) => {
                log::info!(
                    "{side:?}: {} ready ({} x {})",
                    request.key,
                    snapshot.row_count(),
                    snapshot.col_count()
                );
                state.load = LoadState::Ready(snapshot);
                self.relayout(side);
            }
            Err(e) => {
                log::warn!("{side:?}: {} failed ({}): {e}", request.key, e.kind());
                state.load = LoadState::Failed(e);
            }
        }
        LoadOutcome::Applied
    }

    fn row_filter_rows(&self) -> Option<&BTreeSet<u32>> {
        (self.show_differences && self.only_changes).then_some(&self.changed_rows)
    }

    fn relayout(&mut self, side: Side) {
        let filter = self
            .row_filter_rows()
            .map_or(RowFilter::All, RowFilter::Only);
        let layout = self
            .sides
            .get(side)
            .snapshot()
            .map(|snapshot| GridRenderer::layout_for(snapshot, &self.config, filter));
        let state = self.sides.get_mut(side);
        state.layout = layout;
        if let Some(layout) = &state.layout {
            state.viewport.clamp_offset(layout);
        }
    }

    // --- selection -----------------------------------------------------

    /// Select a cell on both grids.
    pub fn select(&mut self, row: u32, col: u32) {
        self.cursor.select(row, col);
    }

    pub fn clear_selection(&mut self) {
        self.cursor.clear();
    }

    /// A click at `(x, y)` relative to a grid's top-left corner. Selects the
    /// cell under the pointer; clicks on headers or empty space do nothing.
    pub fn click(&mut self, side: Side, x: f32, y: f32) -> Option<CellCoord> {
        let state = self.sides.get(side);
        let (row, col) = state.viewport.hit_cell(state.layout.as_ref()?, x, y)?;
        self.cursor.select(row, col);
        Some(CellCoord::new(row, col))
    }

    /// Move the cursor to the next highlighted cell (wrapping).
    pub fn next_change(&mut self) -> Option<CellCoord> {
        let next = self.highlights.next_change(self.cursor.get())?;
        self.cursor.select(next.row, next.col);
        Some(next)
    }

    /// Move the cursor to the previous highlighted cell (wrapping).
    pub fn prev_change(&mut self) -> Option<CellCoord> {
        let prev = self.highlights.prev_change(self.cursor.get())?;
        self.cursor.select(prev.row, prev.col);
        Some(prev)
    }

    /// Find the next match on one side after the cursor, and move the cursor
    /// there.
    pub fn find_next(
        &mut self,
        side: Side,
        query: &str,
        options: &SearchOptions,
    ) -> Option<CellCoord> {
        let snapshot = self.sides.get(side).snapshot()?;
        let hit = search::find_next(snapshot, query, options, self.cursor.get())?;
        self.cursor.select(hit.row, hit.col);
        Some(hit)
    }

    /// All matches on both loaded grids.
    pub fn find_all(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        let grids = Side::BOTH
            .into_iter()
            .filter_map(|side| Some((side, self.sides.get(side).snapshot()?)));
        search::find_all_sides(grids, query, options)
    }

    // --- display options -----------------------------------------------

    pub fn set_scroll_sync(&mut self, enabled: bool) {
        log::debug!("scroll sync {}", if enabled { "on" } else { "off" });
        self.scroll.set_enabled(enabled);
    }

    /// Toggle highlight painting. Turning it off also turns off the
    /// changed-rows filter.
    pub fn set_show_differences(&mut self, show: bool) {
        self.show_differences = show;
        if !show {
            self.only_changes = false;
        }
        self.relayout_both();
    }

    /// Show only rows that contain a highlighted cell. Ignored while
    /// differences are hidden.
    pub fn set_only_changes(&mut self, only: bool) {
        if only && !self.show_differences {
            return;
        }
        self.only_changes = only;
        self.relayout_both();
    }

    fn relayout_both(&mut self) {
        for side in Side::BOTH {
            self.relayout(side);
        }
    }

    /// Rows currently collapsed on both grids.
    pub fn hidden_rows(&self, side: Side) -> Vec<u32> {
        let Some(layout) = &self.sides.get(side).layout else {
            return Vec::new();
        };
        (0..layout.row_count())
            .filter(|&row| layout.is_row_hidden(row))
            .collect()
    }

    // --- viewport ------------------------------------------------------

    pub fn resize(&mut self, side: Side, width: f32, height: f32) {
        let state = self.sides.get_mut(side);
        state.viewport.resize(width, height);
        if let Some(layout) = &state.layout {
            state.viewport.clamp_offset(layout);
        }
    }

    /// A grid was scrolled. The returned outcome tells the driver whether to
    /// write the other grid's offset and whether to arm the quiescence timer.
    /// A write is already clamped to the target grid's extent.
    pub fn on_scroll(&mut self, side: Side, offset: ScrollOffset) -> ScrollOutcome {
        self.sides.get_mut(side).viewport.offset = offset;
        let mut outcome = self.scroll.on_scroll(side, offset);
        outcome.write = self.apply_mirror(outcome.write);
        outcome
    }

    /// The quiescence timer fired.
    pub fn on_scroll_quiescence(&mut self) -> ScrollOutcome {
        let mut outcome = self.scroll.on_quiescence();
        outcome.write = self.apply_mirror(outcome.write);
        outcome
    }

    // The target reports the clamped offset in its echo, so that is what the
    // coordinator must expect.
    fn apply_mirror(&mut self, write: Option<MirrorWrite>) -> Option<MirrorWrite> {
        let write = write?;
        let state = self.sides.get_mut(write.target);
        state.viewport.offset = write.offset;
        if let Some(layout) = &state.layout {
            state.viewport.clamp_offset(layout);
        }
        let offset = state.viewport.offset;
        self.scroll.note_written(write.target, offset);
        Some(MirrorWrite { offset, ..write })
    }

    /// Offset that brings `coord` fully into view on `side`, or `None` when
    /// it is already visible or not on this grid.
    pub fn reveal_offset(&self, side: Side, coord: CellCoord) -> Option<ScrollOffset> {
        let state = self.sides.get(side);
        let layout = state.layout.as_ref()?;
        let (top, height) = layout.row_span(coord.row)?;
        let (left, width) = layout.col_span(coord.col)?;
        let viewport = &state.viewport;
        let view_w = f64::from((viewport.width - layout.row_header_width).max(0.0));
        let view_h = f64::from((viewport.height - layout.col_header_height).max(0.0));

        let mut offset = viewport.offset;
        offset.top = bring_into_view(offset.top, view_h, f64::from(top), f64::from(height));
        offset.left = bring_into_view(offset.left, view_w, f64::from(left), f64::from(width));
        (!offset.approx_eq(&viewport.offset)).then_some(offset)
    }

    // --- rendering -----------------------------------------------------

    /// Paint list for one side: a grid frame when a grid is loaded, the
    /// side's status message otherwise.
    pub fn paint(&self, side: Side) -> SidePaint<'_> {
        let state = self.sides.get(side);
        if let Some(message) = state.status_message() {
            return SidePaint::Message(message);
        }
        let (Some(snapshot), Some(layout)) = (state.snapshot(), state.layout.as_ref()) else {
            return SidePaint::Message("No data loaded".to_string());
        };
        SidePaint::Grid(GridRenderer::frame(&GridView {
            snapshot,
            layout,
            viewport: &state.viewport,
            highlights: self.show_differences.then_some(&self.highlights),
            cursor: &self.cursor,
        }))
    }

    pub fn summary(&self) -> ViewerSummary {
        ViewerSummary {
            compare: self.compare.clone(),
            counts: self.highlights.counts(),
            changed_rows: self.changed_rows.len(),
            scroll_sync: self.scroll.is_enabled(),
            show_differences: self.show_differences,
            only_changes: self.only_changes,
            selected: self.cursor.get(),
            sides: Side::BOTH.map(|side| {
                let state = self.sides.get(side);
                SideSummary {
                    side,
                    label: side.label(),
                    file: state.file.to_string(),
                    sheets: state.sheets().to_vec(),
                    selected: state.selected.clone(),
                    rows: state.snapshot().map_or(0, GridSnapshot::row_count),
                    cols: state.snapshot().map_or(0, GridSnapshot::col_count),
                    status: state.status_message(),
                    error_kind: state.error().map(SxsError::kind),
                }
            }),
        }
    }
}

/// Scroll position along one axis that shows `[start, start + len)`, moving
/// as little as possible.
fn bring_into_view(scroll: f64, view: f64, start: f64, len: f64) -> f64 {
    if start < scroll {
        start
    } else if start + len > scroll + view {
        (start + len - view).max(0.0)
    } else {
        scroll
    }
}
