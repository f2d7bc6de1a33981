//! Per-side state: one file, its sheet catalog, the selected sheet and the
//! loaded grid.

use std::fmt;

use crate::error::SxsError;
use crate::layout::{GridLayout, Viewport};
use crate::types::{FileRef, GridSnapshot, SheetName, Side};

/// The `(file, sheet)` pair a grid load was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetKey {
    pub file: FileRef,
    pub sheet: SheetName,
}

impl fmt::Display for SheetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.file, self.sheet)
    }
}

/// Ask the service for a file's sheet names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub side: Side,
    pub file: FileRef,
}

/// Ask the service for one sheet's grid. The key is the tag compared against
/// the side's selection when the result comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRequest {
    pub side: Side,
    pub key: SheetKey,
}

/// Sheet catalog of a side's file.
#[derive(Debug, Default)]
pub enum CatalogState {
    #[default]
    Pending,
    Ready(Vec<SheetName>),
    Failed(SxsError),
}

/// Grid load state of a side.
#[derive(Debug, Default)]
pub enum LoadState {
    /// Nothing selected yet.
    #[default]
    Idle,
    Loading(SheetKey),
    Ready(GridSnapshot),
    Failed(SxsError),
}

/// Result of feeding a load completion to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// The side's selection moved on; the result was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct SideState {
    pub side: Side,
    pub file: FileRef,
    pub catalog: CatalogState,
    pub selected: Option<SheetName>,
    pub load: LoadState,
    /// Set when a request was rejected before reaching the service.
    pub notice: Option<SxsError>,
    /// Layout of the ready grid, rebuilt when the row filter changes.
    pub layout: Option<GridLayout>,
    pub viewport: Viewport,
}

impl SideState {
    pub fn new(side: Side, file: FileRef) -> Self {
        Self {
            side,
            file,
            catalog: CatalogState::Pending,
            selected: None,
            load: LoadState::Idle,
            notice: None,
            layout: None,
            viewport: Viewport::default(),
        }
    }

    pub fn sheets(&self) -> &[SheetName] {
        match &self.catalog {
            CatalogState::Ready(sheets) => sheets,
            _ => &[],
        }
    }

    pub fn snapshot(&self) -> Option<&GridSnapshot> {
        match &self.load {
            LoadState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Key of the current selection.
    pub fn current_key(&self) -> Option<SheetKey> {
        self.selected.as_ref().map(|sheet| SheetKey {
            file: self.file.clone(),
            sheet: sheet.clone(),
        })
    }

    /// The error to show for this side, most recent cause first.
    pub fn error(&self) -> Option<&SxsError> {
        if let Some(notice) = &self.notice {
            return Some(notice);
        }
        match (&self.load, &self.catalog) {
            (LoadState::Failed(e), _) | (LoadState::Idle, CatalogState::Failed(e)) => Some(e),
            _ => None,
        }
    }

    /// Placeholder text when the side has no grid to draw.
    pub fn status_message(&self) -> Option<String> {
        match &self.load {
            LoadState::Ready(snapshot) if snapshot.row_count() == 0 => {
                Some("No data loaded".to_string())
            }
            LoadState::Ready(_) => None,
            LoadState::Loading(key) => Some(format!("Loading {}\u{2026}", key.sheet)),
            LoadState::Failed(e) => Some(e.to_string()),
            LoadState::Idle => Some(match &self.catalog {
                CatalogState::Pending => "Loading sheets\u{2026}".to_string(),
                CatalogState::Ready(sheets) if sheets.is_empty() => "No sheets in file".to_string(),
                CatalogState::Ready(_) => "No data loaded".to_string(),
                CatalogState::Failed(e) => e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_state() {
        let mut side = SideState::new(Side::Left, FileRef::new("f1"));
        assert_eq!(side.status_message().as_deref(), Some("Loading sheets\u{2026}"));
        side.catalog = CatalogState::Ready(Vec::new());
        assert_eq!(side.status_message().as_deref(), Some("No sheets in file"));
        side.load = LoadState::Ready(GridSnapshot::default());
        assert_eq!(side.status_message().as_deref(), Some("No data loaded"));
        side.load = LoadState::Failed(SxsError::RemoteUnavailable("down".into()));
        assert_eq!(side.error().map(SxsError::kind), Some("remote-unavailable"));
    }
}
