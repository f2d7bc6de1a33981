//! Dark palette for the diff grids, as CSS color strings usable by Canvas 2D.

use crate::types::ChangeType;

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = &'static str;

/// Base palette.
pub mod palette {
    use super::CssColor;

    pub const GRID_BG: CssColor = "#111827";
    pub const GRID_LINE: CssColor = "#1F2937";
    pub const CELL_TEXT: CssColor = "#D1D5DB";
    pub const HEADER_BG: CssColor = "#1F2937";
    pub const HEADER_TEXT: CssColor = "#9CA3AF";
    pub const HEADER_BORDER: CssColor = "#374151";
    pub const HEADER_SELECTED_BG: CssColor = "rgba(49, 46, 129, 0.5)";
    pub const HEADER_SELECTED_TEXT: CssColor = "#C7D2FE";
    pub const SELECTED_BG: CssColor = "#4F46E5";
    pub const SELECTED_OUTLINE: CssColor = "#818CF8";
    pub const SELECTED_TEXT: CssColor = "#FFFFFF";
}

/// Fill, text color, and weight for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub background: Option<CssColor>,
    pub text: CssColor,
    pub bold: bool,
    pub outline: Option<CssColor>,
}

/// Style of a highlighted (not selected) cell.
pub fn change_style(change: ChangeType) -> CellStyle {
    let (background, text) = match change {
        ChangeType::Modified => ("rgba(113, 63, 18, 0.3)", "#FEF08A"),
        ChangeType::Added => ("rgba(20, 83, 45, 0.3)", "#BBF7D0"),
        ChangeType::Removed => ("rgba(127, 29, 29, 0.3)", "#FECACA"),
    };
    CellStyle {
        background: Some(background),
        text,
        bold: true,
        outline: None,
    }
}

/// Resolve the style for a cell. Selection wins over highlight.
pub fn cell_style(highlight: Option<ChangeType>, selected: bool) -> CellStyle {
    if selected {
        return CellStyle {
            background: Some(palette::SELECTED_BG),
            text: palette::SELECTED_TEXT,
            bold: false,
            outline: Some(palette::SELECTED_OUTLINE),
        };
    }
    match highlight {
        Some(change) => change_style(change),
        None => CellStyle {
            background: None,
            text: palette::CELL_TEXT,
            bold: false,
            outline: None,
        },
    }
}
