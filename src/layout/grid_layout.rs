//! Pre-computed layout data for one grid.
//!
//! Edges are computed once per snapshot (and again when the hidden-row set
//! changes), enabling O(log n) hit testing and visible-range lookups.

use std::collections::{BTreeSet, HashMap};

/// Which rows of a grid take up space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowFilter<'a> {
    #[default]
    All,
    /// Only the listed rows are shown; every other row gets zero height.
    Only(&'a BTreeSet<u32>),
}

impl RowFilter<'_> {
    pub fn shows(&self, row: u32) -> bool {
        match self {
            Self::All => true,
            Self::Only(rows) => rows.contains(&row),
        }
    }
}

/// Row and column edges of a grid in content coordinates (headers excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Cumulative row edges (`row_positions[i]` = y of row i's top edge, one extra final edge)
    pub row_positions: Vec<f32>,
    /// Cumulative column edges (one extra final edge)
    pub col_positions: Vec<f32>,
    /// Width of the row-number gutter
    pub row_header_width: f32,
    /// Height of the column-letter header
    pub col_header_height: f32,
}

impl GridLayout {
    /// Build a layout from explicit per-index sizes, falling back to the
    /// defaults for every row or column not listed.
    ///
    /// Rows rejected by `row_filter` get zero height.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rows: u32,
        cols: u32,
        row_heights: &HashMap<u32, f32>,
        col_widths: &HashMap<u32, f32>,
        default_row_height: f32,
        default_col_width: f32,
        row_filter: RowFilter<'_>,
        row_header_width: f32,
        col_header_height: f32,
    ) -> Self {
        let mut row_positions = Vec::with_capacity(rows as usize + 1);
        let mut y: f32 = 0.0;
        for row in 0..rows {
            row_positions.push(y);
            if row_filter.shows(row) {
                y += row_heights.get(&row).copied().unwrap_or(default_row_height);
            }
        }
        row_positions.push(y); // Final edge

        let mut col_positions = Vec::with_capacity(cols as usize + 1);
        let mut x: f32 = 0.0;
        for col in 0..cols {
            col_positions.push(x);
            x += col_widths.get(&col).copied().unwrap_or(default_col_width);
        }
        col_positions.push(x); // Final edge

        Self {
            row_positions,
            col_positions,
            row_header_width,
            col_header_height,
        }
    }

    /// Uniform rows and columns.
    pub fn uniform(
        rows: u32,
        cols: u32,
        row_height: f32,
        col_width: f32,
        row_filter: RowFilter<'_>,
        row_header_width: f32,
        col_header_height: f32,
    ) -> Self {
        let none = HashMap::new();
        Self::new(
            rows,
            cols,
            &none,
            &none,
            row_height,
            col_width,
            row_filter,
            row_header_width,
            col_header_height,
        )
    }

    pub fn row_count(&self) -> u32 {
        u32::try_from(self.row_positions.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    pub fn col_count(&self) -> u32 {
        u32::try_from(self.col_positions.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Top edge and height of a row, `None` when out of range.
    pub fn row_span(&self, row: u32) -> Option<(f32, f32)> {
        let top = self.row_positions.get(row as usize).copied()?;
        let bottom = self.row_positions.get(row as usize + 1).copied()?;
        Some((top, bottom - top))
    }

    /// Left edge and width of a column, `None` when out of range.
    pub fn col_span(&self, col: u32) -> Option<(f32, f32)> {
        let left = self.col_positions.get(col as usize).copied()?;
        let right = self.col_positions.get(col as usize + 1).copied()?;
        Some((left, right - left))
    }

    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.row_span(row).is_some_and(|(_, h)| h <= 0.0)
    }

    /// Row containing content y (binary search). Hidden rows are never
    /// returned; `None` outside the grid.
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        Self::index_at(&self.row_positions, y)
    }

    /// Column containing content x (binary search); `None` outside the grid.
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        Self::index_at(&self.col_positions, x)
    }

    // With zero-size entries several edges are equal; taking the last edge
    // <= pos lands on the visible entry that starts there.
    fn index_at(edges: &[f32], pos: f32) -> Option<u32> {
        if pos < 0.0 || !pos.is_finite() {
            return None;
        }
        let total = edges.last().copied()?;
        if pos >= total {
            return None;
        }
        let idx = edges.partition_point(|edge| *edge <= pos).checked_sub(1)?;
        u32::try_from(idx).ok()
    }

    /// Total content width (headers excluded)
    pub fn total_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Total content height (headers excluded)
    pub fn total_height(&self) -> f32 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Scrollable extent including headers, used to size the scroll spacer.
    pub fn scroll_extent(&self) -> (f32, f32) {
        (
            self.total_width() + self.row_header_width,
            self.total_height() + self.col_header_height,
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn layout(rows: u32, cols: u32, shown: Option<&[u32]>) -> GridLayout {
        let shown: Option<BTreeSet<u32>> = shown.map(|s| s.iter().copied().collect());
        let filter = shown.as_ref().map_or(RowFilter::All, RowFilter::Only);
        GridLayout::uniform(rows, cols, 20.0, 100.0, filter, 40.0, 20.0)
    }

    #[test]
    fn edges_and_totals() {
        let l = layout(3, 2, None);
        assert_eq!(l.row_positions, vec![0.0, 20.0, 40.0, 60.0]);
        assert_eq!(l.total_width(), 200.0);
        assert_eq!(l.scroll_extent(), (240.0, 80.0));
        assert_eq!(l.row_span(2), Some((40.0, 20.0)));
        assert_eq!(l.row_span(3), None);
    }

    #[test]
    fn hit_testing_skips_hidden_rows() {
        let l = layout(4, 1, Some(&[0, 3]));
        assert!(l.is_row_hidden(1));
        assert_eq!(l.row_at_y(5.0), Some(0));
        assert_eq!(l.row_at_y(25.0), Some(3));
        assert_eq!(l.row_at_y(40.0), None);
        assert_eq!(l.row_at_y(-1.0), None);
    }

    #[test]
    fn empty_grid() {
        let l = layout(0, 0, None);
        assert_eq!(l.row_count(), 0);
        assert_eq!(l.row_at_y(0.0), None);
        assert_eq!(l.col_at_x(0.0), None);
    }

    #[test]
    fn explicit_sizes_override_defaults() {
        let heights = HashMap::from([(1, 50.0)]);
        let widths = HashMap::from([(0, 30.0), (5, 999.0)]);
        let l = GridLayout::new(3, 2, &heights, &widths, 20.0, 100.0, RowFilter::All, 40.0, 20.0);
        assert_eq!(l.row_positions, vec![0.0, 20.0, 70.0, 90.0]);
        assert_eq!(l.col_positions, vec![0.0, 30.0, 130.0]);
        assert_eq!(l.row_at_y(65.0), Some(1));
        assert_eq!(l.col_at_x(31.0), Some(1));
    }

    #[test]
    fn hidden_row_ignores_its_explicit_height() {
        let heights = HashMap::from([(1, 50.0)]);
        let shown = BTreeSet::from([0, 2]);
        let l = GridLayout::new(
            3,
            1,
            &heights,
            &HashMap::new(),
            20.0,
            100.0,
            RowFilter::Only(&shown),
            40.0,
            20.0,
        );
        assert!(l.is_row_hidden(1));
        assert_eq!(l.total_height(), 40.0);
    }
}
