//! Per-cell highlight lookup built from the compare service's change list.
//!
//! Built once per comparison result and shared, read-only, by both grids.
//! Row/column addressing is assumed identical on both sides, so there is no
//! per-side variant.

use std::collections::{BTreeSet, HashMap};

use crate::types::{CellCoord, ChangeRecord, ChangeType};

/// Number of highlighted cells per change type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ChangeCounts {
    pub modified: usize,
    pub added: usize,
    pub removed: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.modified + self.added + self.removed
    }
}

/// `(row, col)` → change type, with O(1) lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightMap {
    cells: HashMap<(u32, u32), ChangeType>,
    /// Highlighted coordinates in row-major order, for navigation.
    ordered: Vec<CellCoord>,
}

impl HighlightMap {
    /// Build the map from an ordered change list. For a duplicated coordinate
    /// the last record wins.
    pub fn build(changes: &[ChangeRecord]) -> Self {
        let mut cells = HashMap::with_capacity(changes.len());
        for change in changes {
            cells.insert((change.row, change.col), change.change_type);
        }
        let mut ordered: Vec<CellCoord> = cells
            .keys()
            .map(|&(row, col)| CellCoord::new(row, col))
            .collect();
        ordered.sort_unstable();
        Self { cells, ordered }
    }

    pub fn get(&self, row: u32, col: u32) -> Option<ChangeType> {
        self.cells.get(&(row, col)).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highlighted coordinates in row-major order.
    pub fn coords(&self) -> &[CellCoord] {
        &self.ordered
    }

    /// Rows that contain at least one highlighted cell.
    pub fn changed_rows(&self) -> BTreeSet<u32> {
        self.ordered.iter().map(|c| c.row).collect()
    }

    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for change_type in self.cells.values() {
            match change_type {
                ChangeType::Modified => counts.modified += 1,
                ChangeType::Added => counts.added += 1,
                ChangeType::Removed => counts.removed += 1,
            }
        }
        counts
    }

    /// First highlighted cell strictly after `from` in row-major order,
    /// wrapping to the first one. `None` starts from the top.
    pub fn next_change(&self, from: Option<CellCoord>) -> Option<CellCoord> {
        let first = self.ordered.first().copied();
        let Some(from) = from else {
            return first;
        };
        let idx = self.ordered.partition_point(|c| *c <= from);
        self.ordered.get(idx).copied().or(first)
    }

    /// Last highlighted cell strictly before `from`, wrapping to the last one.
    /// `None` starts from the bottom.
    pub fn prev_change(&self, from: Option<CellCoord>) -> Option<CellCoord> {
        let last = self.ordered.last().copied();
        let Some(from) = from else {
            return last;
        };
        let idx = self.ordered.partition_point(|c| *c < from);
        idx.checked_sub(1)
            .and_then(|i| self.ordered.get(i).copied())
            .or(last)
    }
}
