//! Plain-text backend used by the CLI and by tests.
//!
//! Each cell becomes a fixed-width column. Highlights are shown as a leading
//! marker (`*` modified, `+` added, `-` removed) and the selected cell is
//! wrapped in brackets.

use std::fmt::Write as _;

use super::backend::RenderBackend;
use super::frame::{CellPaint, GridFrame, HeaderPaint};
use crate::error::Result;
use crate::types::ChangeType;

const GUTTER_CHARS: usize = 6;

/// Renders frames into a string buffer.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    width: u32,
    height: u32,
    col_chars: usize,
    output: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(14)
    }
}

impl TextRenderer {
    /// `col_chars` is the width of every cell column, markers included.
    pub fn new(col_chars: usize) -> Self {
        Self {
            width: 0,
            height: 0,
            col_chars: col_chars.max(4),
            output: String::new(),
        }
    }

    /// Text of the last rendered frame.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn header_label(header: &HeaderPaint) -> String {
        if header.selected {
            format!("[{}]", header.label)
        } else {
            header.label.clone()
        }
    }

    fn cell_label(&self, cell: &CellPaint<'_>) -> String {
        let marker = match cell.highlight {
            Some(ChangeType::Modified) => "*",
            Some(ChangeType::Added) => "+",
            Some(ChangeType::Removed) => "-",
            None => "",
        };
        let (open, close) = if cell.selected { ("[", "]") } else { ("", "") };
        let budget = self
            .col_chars
            .saturating_sub(1 + marker.len() + open.len() + close.len());
        format!("{open}{marker}{}{close}", truncate(cell.text, budget))
    }
}

/// Cut `text` to at most `max_chars` characters, ending with an ellipsis when
/// anything was dropped.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('\u{2026}');
    out
}

impl RenderBackend for TextRenderer {
    fn resize(&mut self, width: u32, height: u32, _dpr: f32) {
        self.width = width;
        self.height = height;
    }

    fn render(&mut self, frame: &GridFrame<'_>) -> Result<()> {
        let width = self.col_chars;
        let mut out = String::new();

        out.push_str(&" ".repeat(GUTTER_CHARS));
        for header in &frame.col_headers {
            let _ = write!(out, "{:<width$}", Self::header_label(header));
        }
        out.push('\n');

        for header in &frame.row_headers {
            let _ = write!(out, "{:>w$} ", Self::header_label(header), w = GUTTER_CHARS - 1);
            for cell in frame.cells.iter().filter(|c| c.row == header.index) {
                let _ = write!(out, "{:<width$}", self.cell_label(cell));
            }
            // Trailing padding carries no information.
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }

        self.output = out;
        Ok(())
    }

    fn render_message(&mut self, message: &str) -> Result<()> {
        self.output = format!("{message}\n");
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::diff_index::HighlightMap;
    use crate::layout::{RowFilter, Viewport};
    use crate::render::frame::{GridRenderer, GridView};
    use crate::types::{ChangeRecord, GridSnapshot, SelectionCursor};

    #[test]
    fn markers_and_selection_brackets() {
        let snap = GridSnapshot::from_rows(vec![
            vec!["id".into(), "name".into()],
            vec!["1".into(), "alpha".into()],
        ]);
        let layout = GridRenderer::layout_for(&snap, &ViewerConfig::default(), RowFilter::All);
        let viewport = Viewport::new(1000.0, 1000.0);
        let map = HighlightMap::build(&[ChangeRecord::new(1, 1, ChangeType::Modified)]);
        let mut cursor = SelectionCursor::new();
        cursor.select(1, 0);
        let frame = GridRenderer::frame(&GridView {
            snapshot: &snap,
            layout: &layout,
            viewport: &viewport,
            highlights: Some(&map),
            cursor: &cursor,
        });
        let mut text = TextRenderer::new(10);
        text.render(&frame).unwrap();
        let lines: Vec<&str> = text.output().lines().collect();
        assert_eq!(lines.first().unwrap().trim(), "[A]       B");
        assert!(lines.get(2).unwrap().contains("[1]"));
        assert!(lines.get(2).unwrap().contains("*alpha"));
        assert!(lines.get(2).unwrap().trim_start().starts_with("[2]"));
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        assert_eq!(truncate("abcdefgh", 5), "abcd\u{2026}");
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn message_replaces_output() {
        let mut text = TextRenderer::default();
        text.render_message("No data loaded").unwrap();
        assert_eq!(text.output(), "No data loaded\n");
    }
}
