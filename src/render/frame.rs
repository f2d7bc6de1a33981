//! Backend-agnostic frame computation for one grid.
//!
//! Turns a snapshot plus the shared highlight map and selection cursor into a
//! list of positioned paint items for the visible area. Keeping this free of
//! Canvas APIs lets the same frame drive the browser painter and the text
//! painter, and keeps the overlay rules testable.

use crate::cell_ref::col_to_letter;
use crate::config::ViewerConfig;
use crate::diff_index::HighlightMap;
use crate::layout::{GridLayout, RowFilter, Viewport};
use crate::types::{CellCoord, ChangeType, GridSnapshot, SelectionCursor};

/// Everything needed to render one side. All borrowed: the renderer owns
/// nothing and keeps no state between frames.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    pub snapshot: &'a GridSnapshot,
    pub layout: &'a GridLayout,
    pub viewport: &'a Viewport,
    /// `None` when difference display is switched off.
    pub highlights: Option<&'a HighlightMap>,
    pub cursor: &'a SelectionCursor,
}

/// One visible cell, in viewport coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPaint<'a> {
    pub row: u32,
    pub col: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: &'a str,
    pub highlight: Option<ChangeType>,
    pub selected: bool,
}

/// One visible row or column header, in viewport coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderPaint {
    pub index: u32,
    pub label: String,
    /// Left (column headers) or top (row headers) edge.
    pub start: f32,
    /// Width (column headers) or height (row headers).
    pub extent: f32,
    pub selected: bool,
}

/// Paint list for one grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridFrame<'a> {
    pub width: f32,
    pub height: f32,
    pub row_header_width: f32,
    pub col_header_height: f32,
    pub cells: Vec<CellPaint<'a>>,
    pub col_headers: Vec<HeaderPaint>,
    pub row_headers: Vec<HeaderPaint>,
    /// The cursor, if it addresses a visible cell of this grid.
    pub selected: Option<CellCoord>,
}

impl<'a> GridFrame<'a> {
    pub fn cell(&self, row: u32, col: u32) -> Option<&CellPaint<'a>> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }
}

/// Stateless grid renderer.
pub struct GridRenderer;

impl GridRenderer {
    /// Build the layout for a snapshot: its own explicit sizes where it has
    /// them, the configured sizes everywhere else.
    pub fn layout_for(
        snapshot: &GridSnapshot,
        config: &ViewerConfig,
        row_filter: RowFilter<'_>,
    ) -> GridLayout {
        GridLayout::new(
            snapshot.row_count(),
            snapshot.col_count(),
            &snapshot.row_heights_px(),
            &snapshot.col_widths_px(),
            config.row_height,
            config.col_width,
            row_filter,
            config.row_header_width,
            config.col_header_height,
        )
    }

    /// Compute the paint list for the visible part of the grid.
    pub fn frame<'a>(view: &GridView<'a>) -> GridFrame<'a> {
        let layout = view.layout;
        let viewport = view.viewport;
        let mut frame = GridFrame {
            width: viewport.width,
            height: viewport.height,
            row_header_width: layout.row_header_width,
            col_header_height: layout.col_header_height,
            ..GridFrame::default()
        };

        frame.selected = view
            .cursor
            .get()
            .filter(|c| view.snapshot.contains(c.row, c.col) && !layout.is_row_hidden(c.row));

        let (Some((row_start, row_end)), Some((col_start, col_end))) =
            (viewport.visible_rows(layout), viewport.visible_cols(layout))
        else {
            return frame;
        };

        for col in col_start..=col_end {
            let Some((left, width)) = layout.col_span(col) else {
                continue;
            };
            let (x, _) = viewport.to_screen(layout, left, 0.0);
            frame.col_headers.push(HeaderPaint {
                index: col,
                label: col_to_letter(col),
                start: x,
                extent: width,
                selected: view.cursor.in_col(col),
            });
        }

        for row in row_start..=row_end {
            let Some((top, height)) = layout.row_span(row) else {
                continue;
            };
            if height <= 0.0 {
                continue;
            }
            let (_, y) = viewport.to_screen(layout, 0.0, top);
            frame.row_headers.push(HeaderPaint {
                index: row,
                label: (u64::from(row) + 1).to_string(),
                start: y,
                extent: height,
                selected: view.cursor.in_row(row),
            });

            for col in col_start..=col_end {
                let Some((left, width)) = layout.col_span(col) else {
                    continue;
                };
                let Some(text) = view.snapshot.cell(row, col) else {
                    continue;
                };
                let (x, _) = viewport.to_screen(layout, left, top);
                frame.cells.push(CellPaint {
                    row,
                    col,
                    x,
                    y,
                    width,
                    height,
                    text,
                    highlight: view.highlights.and_then(|h| h.get(row, col)),
                    selected: frame.selected == Some(CellCoord::new(row, col)),
                });
            }
        }

        frame
    }
}
