//! Viewport state: scroll offsets and visible area of one grid.

use super::GridLayout;

/// Scroll position of a grid's scroll container, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub top: f64,
    pub left: f64,
}

impl ScrollOffset {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Equal within half a pixel (browsers round scroll positions).
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.top - other.top).abs() < 0.5 && (self.left - other.left).abs() < 0.5
    }
}

/// Visible area of one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Current scroll offset
    pub offset: ScrollOffset,
    /// Viewport width in CSS pixels (headers included)
    pub width: f32,
    /// Viewport height in CSS pixels (headers included)
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            offset: ScrollOffset::default(),
            width,
            height,
        }
    }

    /// Content-area scroll position as f32 (layout coordinates).
    #[allow(clippy::cast_possible_truncation)]
    fn scroll_xy(&self) -> (f32, f32) {
        (self.offset.left as f32, self.offset.top as f32)
    }

    /// Visible row range (inclusive), `None` for an empty grid or a
    /// viewport with no room below the header.
    pub fn visible_rows(&self, layout: &GridLayout) -> Option<(u32, u32)> {
        let content_height = self.height - layout.col_header_height;
        let (_, scroll_y) = self.scroll_xy();
        Self::visible_range(
            layout.row_count(),
            content_height,
            scroll_y,
            layout.total_height(),
            |y| layout.row_at_y(y),
        )
    }

    /// Visible column range (inclusive).
    pub fn visible_cols(&self, layout: &GridLayout) -> Option<(u32, u32)> {
        let content_width = self.width - layout.row_header_width;
        let (scroll_x, _) = self.scroll_xy();
        Self::visible_range(
            layout.col_count(),
            content_width,
            scroll_x,
            layout.total_width(),
            |x| layout.col_at_x(x),
        )
    }

    fn visible_range(
        count: u32,
        extent: f32,
        scroll: f32,
        total: f32,
        at: impl Fn(f32) -> Option<u32>,
    ) -> Option<(u32, u32)> {
        if count == 0 || extent <= 0.0 || total <= 0.0 {
            return None;
        }
        // Past the end only happens with a stale offset; show the last entry.
        let start_pos = scroll.max(0.0);
        let start = at(start_pos).unwrap_or(count - 1);
        let end = at(start_pos + extent).unwrap_or(count - 1);
        Some((start, end.max(start)))
    }

    /// Convert a point relative to the viewport's top-left corner into a
    /// cell address. Points over the headers return `None`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn hit_cell(&self, layout: &GridLayout, x: f32, y: f32) -> Option<(u32, u32)> {
        if x < layout.row_header_width || y < layout.col_header_height {
            return None;
        }
        let (scroll_x, scroll_y) = self.scroll_xy();
        let content_x = x - layout.row_header_width + scroll_x;
        let content_y = y - layout.col_header_height + scroll_y;
        Some((layout.row_at_y(content_y)?, layout.col_at_x(content_x)?))
    }

    /// Screen position of a content-space point (inside the scrolled cell area).
    pub fn to_screen(&self, layout: &GridLayout, x: f32, y: f32) -> (f32, f32) {
        let (scroll_x, scroll_y) = self.scroll_xy();
        (
            x - scroll_x + layout.row_header_width,
            y - scroll_y + layout.col_header_height,
        )
    }

    /// Clamp the offset to what the layout can scroll to, as the browser
    /// does with a too-large scrollTop/scrollLeft.
    pub fn clamp_offset(&mut self, layout: &GridLayout) {
        let (extent_w, extent_h) = layout.scroll_extent();
        let max_left = f64::from((extent_w - self.width).max(0.0));
        let max_top = f64::from((extent_h - self.height).max(0.0));
        self.offset.left = self.offset.left.clamp(0.0, max_left);
        self.offset.top = self.offset.top.clamp(0.0, max_top);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::layout::RowFilter;

    fn layout(rows: u32, cols: u32) -> GridLayout {
        GridLayout::uniform(rows, cols, 20.0, 100.0, RowFilter::All, 40.0, 20.0)
    }

    #[test]
    fn visible_rows_follow_scroll() {
        let l = layout(100, 10);
        let mut vp = Viewport::new(440.0, 220.0);
        assert_eq!(vp.visible_rows(&l), Some((0, 10)));
        vp.offset.top = 400.0;
        assert_eq!(vp.visible_rows(&l), Some((20, 30)));
        assert_eq!(vp.visible_cols(&l), Some((0, 4)));
    }

    #[test]
    fn visible_range_clamps_at_end() {
        let l = layout(5, 2);
        let mut vp = Viewport::new(1000.0, 1000.0);
        vp.offset.top = 10_000.0;
        assert_eq!(vp.visible_rows(&l), Some((4, 4)));
        assert_eq!(vp.visible_cols(&l), Some((0, 1)));
    }

    #[test]
    fn hit_cell_accounts_for_headers_and_scroll() {
        let l = layout(100, 10);
        let mut vp = Viewport::new(440.0, 220.0);
        assert_eq!(vp.hit_cell(&l, 10.0, 30.0), None);
        assert_eq!(vp.hit_cell(&l, 50.0, 10.0), None);
        assert_eq!(vp.hit_cell(&l, 50.0, 25.0), Some((0, 0)));
        vp.offset = ScrollOffset::new(40.0, 100.0);
        assert_eq!(vp.hit_cell(&l, 50.0, 25.0), Some((2, 1)));
    }

    #[test]
    fn clamp_matches_browser_limits() {
        let l = layout(10, 2);
        let mut vp = Viewport::new(140.0, 120.0);
        vp.offset = ScrollOffset::new(1000.0, 1000.0);
        vp.clamp_offset(&l);
        assert_eq!(vp.offset, ScrollOffset::new(100.0, 100.0));
    }
}
