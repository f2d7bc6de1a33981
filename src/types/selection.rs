/// A 0-based cell address shared by both grids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// The single selection cursor applied to both grids.
///
/// Linkage is by position, not content: the same `(row, col)` is shown as
/// selected on both sides, whatever each side holds at that address. A grid
/// that is too small for the address simply shows nothing selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    current: Option<CellCoord>,
}

impl SelectionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cursor, replacing any previous value.
    pub fn select(&mut self, row: u32, col: u32) {
        self.current = Some(CellCoord::new(row, col));
    }

    /// Remove the cursor.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<CellCoord> {
        self.current
    }

    pub fn is_selected(&self, row: u32, col: u32) -> bool {
        self.current == Some(CellCoord::new(row, col))
    }

    /// True if the cursor sits on `row` (row header highlight).
    pub fn in_row(&self, row: u32) -> bool {
        self.current.is_some_and(|c| c.row == row)
    }

    /// True if the cursor sits in `col` (column header highlight).
    pub fn in_col(&self, col: u32) -> bool {
        self.current.is_some_and(|c| c.col == col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_replaces_and_clear_resets() {
        let mut cursor = SelectionCursor::new();
        assert_eq!(cursor.get(), None);
        cursor.select(2, 1);
        cursor.select(4, 0);
        assert_eq!(cursor.get(), Some(CellCoord::new(4, 0)));
        assert!(cursor.is_selected(4, 0));
        assert!(!cursor.is_selected(2, 1));
        assert!(cursor.in_row(4) && cursor.in_col(0));
        cursor.clear();
        assert!(!cursor.in_row(4));
    }
}
