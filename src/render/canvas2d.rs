//! Canvas 2D backend.

use std::borrow::Cow;
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backend::RenderBackend;
use super::colors::{cell_style, palette};
use super::frame::{CellPaint, GridFrame, HeaderPaint};
use crate::error::{Result, SxsError};

const CELL_PADDING: f64 = 6.0;
const CELL_FONT: &str = "12px ui-monospace, SFMono-Regular, Menlo, Consolas, monospace";
const CELL_FONT_BOLD: &str = "600 12px ui-monospace, SFMono-Regular, Menlo, Consolas, monospace";
const HEADER_FONT: &str = "500 11px -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";
const MESSAGE_FONT: &str = "13px -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";
const TEXT_MEASURE_CACHE_CAP: usize = 4096;

/// Paints grid frames onto one `<canvas>`.
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f32,
    /// `(font, text)` → measured width.
    text_widths: HashMap<(&'static str, String), f64>,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| SxsError::Dom("failed to get 2d context".into()))?
            .ok_or_else(|| SxsError::Dom("no 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SxsError::Dom("failed to cast to CanvasRenderingContext2d".into()))?;
        let width = canvas.width();
        let height = canvas.height();
        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
            text_widths: HashMap::new(),
        })
    }

    /// Snap to the pixel centre so 1px lines stay sharp.
    fn crisp(x: f64) -> f64 {
        x.floor() + 0.5
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_line(&self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(1.0);
        self.ctx.move_to(Self::crisp(x1), Self::crisp(y1));
        self.ctx.line_to(Self::crisp(x2), Self::crisp(y2));
        self.ctx.stroke();
    }

    fn measure(&mut self, text: &str, font: &'static str) -> f64 {
        let key = (font, text.to_string());
        if let Some(width) = self.text_widths.get(&key) {
            return *width;
        }
        let width = self
            .ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0);
        if self.text_widths.len() >= TEXT_MEASURE_CACHE_CAP {
            self.text_widths.clear();
        }
        self.text_widths.insert(key, width);
        width
    }

    /// Longest prefix of `text` that fits `max_width`, with an ellipsis.
    /// Expects the context font to be `font` already.
    fn truncate_text<'a>(&mut self, text: &'a str, max_width: f64, font: &'static str) -> Cow<'a, str> {
        if self.measure(text, font) <= max_width {
            return Cow::Borrowed(text);
        }
        let ellipsis = "\u{2026}";
        let available = max_width - self.measure(ellipsis, font);
        if available <= 0.0 {
            return Cow::Borrowed(ellipsis);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut low = 0;
        let mut high = chars.len();
        while low < high {
            let mid = (low + high).div_ceil(2);
            let prefix: String = chars.iter().take(mid).collect();
            if self.measure(&prefix, font) <= available {
                low = mid;
            } else {
                high = mid - 1;
            }
        }
        let mut out: String = chars.iter().take(low).collect();
        out.push_str(ellipsis);
        Cow::Owned(out)
    }

    fn paint_cell(&mut self, cell: &CellPaint<'_>) {
        let style = cell_style(cell.highlight, cell.selected);
        let (x, y) = (f64::from(cell.x), f64::from(cell.y));
        let (w, h) = (f64::from(cell.width), f64::from(cell.height));

        if let Some(bg) = style.background {
            self.fill_rect(x, y, w, h, bg);
        }
        self.stroke_line(x + w, y, x + w, y + h, palette::GRID_LINE);
        self.stroke_line(x, y + h, x + w, y + h, palette::GRID_LINE);
        if let Some(outline) = style.outline {
            self.ctx.set_stroke_style_str(outline);
            self.ctx.set_line_width(2.0);
            self.ctx.stroke_rect(x + 1.0, y + 1.0, w - 2.0, h - 2.0);
        }

        if cell.text.is_empty() {
            return;
        }
        let font = if style.bold { CELL_FONT_BOLD } else { CELL_FONT };
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(style.text);
        let text = self.truncate_text(cell.text, w - CELL_PADDING * 2.0, font);
        self.ctx.fill_text(&text, x + CELL_PADDING, y + h / 2.0).ok();
    }

    fn paint_col_header(&self, header: &HeaderPaint, height: f64) {
        let x = f64::from(header.start);
        let w = f64::from(header.extent);
        if header.selected {
            self.fill_rect(x, 0.0, w, height, palette::HEADER_SELECTED_BG);
        }
        self.stroke_line(x + w, 0.0, x + w, height, palette::HEADER_BORDER);
        let color = if header.selected {
            palette::HEADER_SELECTED_TEXT
        } else {
            palette::HEADER_TEXT
        };
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_text(&header.label, x + w / 2.0, height / 2.0)
            .ok();
    }

    fn paint_row_header(&self, header: &HeaderPaint, width: f64) {
        let y = f64::from(header.start);
        let h = f64::from(header.extent);
        if header.selected {
            self.fill_rect(0.0, y, width, h, palette::HEADER_SELECTED_BG);
        }
        self.stroke_line(0.0, y + h, width, y + h, palette::HEADER_BORDER);
        let color = if header.selected {
            palette::HEADER_SELECTED_TEXT
        } else {
            palette::HEADER_TEXT
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(&header.label, width / 2.0, y + h / 2.0).ok();
    }

    fn clear(&self) {
        self.fill_rect(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
            palette::GRID_BG,
        );
    }
}

impl RenderBackend for CanvasRenderer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.canvas.set_width((width as f32 * dpr) as u32);
        self.canvas.set_height((height as f32 * dpr) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        // Setting the size resets the transform.
        let _ = self.ctx.scale(f64::from(dpr), f64::from(dpr));
    }

    fn render(&mut self, frame: &GridFrame<'_>) -> Result<()> {
        self.clear();
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("middle");
        for cell in &frame.cells {
            self.paint_cell(cell);
        }

        // Headers paint last so scrolled cells never show through them.
        let gutter = f64::from(frame.row_header_width);
        let header_h = f64::from(frame.col_header_height);
        let (w, h) = (f64::from(frame.width), f64::from(frame.height));
        self.fill_rect(0.0, 0.0, w, header_h, palette::HEADER_BG);
        self.fill_rect(0.0, 0.0, gutter, h, palette::HEADER_BG);

        self.ctx.set_font(HEADER_FONT);
        self.ctx.set_text_align("center");
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(gutter, 0.0, w - gutter, header_h);
        self.ctx.clip();
        for header in &frame.col_headers {
            self.paint_col_header(header, header_h);
        }
        self.ctx.restore();

        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(0.0, header_h, gutter, h - header_h);
        self.ctx.clip();
        for header in &frame.row_headers {
            self.paint_row_header(header, gutter);
        }
        self.ctx.restore();

        self.stroke_line(0.0, header_h - 1.0, w, header_h - 1.0, palette::HEADER_BORDER);
        self.stroke_line(gutter - 1.0, 0.0, gutter - 1.0, h, palette::HEADER_BORDER);
        Ok(())
    }

    fn render_message(&mut self, message: &str) -> Result<()> {
        self.clear();
        self.ctx.set_font(MESSAGE_FONT);
        self.ctx.set_fill_style_str(palette::HEADER_TEXT);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx
            .fill_text(
                message,
                f64::from(self.width) / 2.0,
                f64::from(self.height) / 2.0,
            )
            .map_err(|_| SxsError::Dom("fillText failed".into()))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
