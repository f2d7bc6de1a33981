//! Browser driver: two DOM panes around one [`SxsViewer`].
//!
//! Each pane is laid out like this:
//!
//! ```text
//! host (position: relative)
//! └── wrapper (flex column, fills host)
//!     ├── canvas (absolute, behind, pointer-events: none)
//!     ├── scroll_container (flex 1, overflow auto, z-index 1)
//!     │   └── spacer (sized to the grid's scroll extent)
//!     ├── tab_bar (sheet buttons)
//!     └── status (side label, file, errors)
//! ```
//!
//! The browser owns scrolling; scroll events feed the viewer, which decides
//! whether the other pane must be moved. State lives in
//! `Rc<RefCell<SharedState>>`. Borrows are released before any DOM write that
//! can dispatch an event and before every `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlDivElement, HtmlElement, MouseEvent};

use super::{SidePaint, SxsViewer};
use crate::cell_ref::format_cell_ref;
use crate::config::ViewerConfig;
use crate::error::SxsError;
use crate::layout::ScrollOffset;
use crate::remote::fetch::HttpBackend;
use crate::render::{palette, CanvasRenderer, RenderBackend};
use crate::search::SearchOptions;
use crate::types::{CellCoord, CompareInput, PerSide, Side};

/// DOM handles of one pane.
pub(crate) struct Pane {
    #[allow(dead_code)] // Kept to maintain DOM reference
    pub(crate) wrapper: HtmlDivElement,
    pub(crate) scroll_container: HtmlDivElement,
    pub(crate) spacer: HtmlDivElement,
    pub(crate) tab_bar: HtmlDivElement,
    pub(crate) status: HtmlDivElement,
}

pub(crate) struct SharedState {
    pub(crate) viewer: SxsViewer,
    pub(crate) renderers: PerSide<CanvasRenderer>,
    pub(crate) backend: HttpBackend,
    pub(crate) dpr: f32,
    pub(crate) quiescence_timer: Option<i32>,
    pub(crate) quiescence_closure: Option<Closure<dyn FnMut()>>,
}

/// Side-by-side spreadsheet comparison view.
#[wasm_bindgen]
pub struct SxsView {
    pub(crate) state: Rc<RefCell<SharedState>>,
    pub(crate) panes: Rc<PerSide<Pane>>,
    #[allow(dead_code)]
    scroll_closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
    #[allow(dead_code)]
    mouse_closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
}

pub(crate) fn scroll_left_f64(element: &HtmlDivElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_left()))
}

pub(crate) fn scroll_top_f64(element: &HtmlDivElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

fn side_arg(index: usize) -> Result<Side, JsValue> {
    Side::from_index(index)
        .ok_or_else(|| SxsError::InvalidInput(format!("side must be 0 or 1, got {index}")).into())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn coord_to_js(coord: Option<CellCoord>) -> Result<JsValue, JsValue> {
    match coord {
        Some(c) => to_js(&c),
        None => Ok(JsValue::NULL),
    }
}

fn set_style(element: &HtmlElement, properties: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in properties {
        let _ = style.set_property(name, value);
    }
}

impl Pane {
    /// Build the pane's DOM inside `host`, moving `canvas` into it.
    fn build(host: &HtmlElement, canvas: &HtmlCanvasElement) -> Result<Self, SxsError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| SxsError::Dom("no document available".into()))?;
        let create_div = || -> Result<HtmlDivElement, SxsError> {
            document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlDivElement>().ok())
                .ok_or_else(|| SxsError::Dom("failed to create div".into()))
        };
        let wrapper = create_div()?;
        let scroll_container = create_div()?;
        let spacer = create_div()?;
        let tab_bar = create_div()?;
        let status = create_div()?;

        if host
            .style()
            .get_property_value("position")
            .unwrap_or_default()
            .is_empty()
        {
            let _ = host.style().set_property("position", "relative");
        }
        set_style(
            &wrapper,
            &[
                ("display", "flex"),
                ("flex-direction", "column"),
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("background", palette::GRID_BG),
            ],
        );
        set_style(
            &scroll_container,
            &[
                ("flex", "1"),
                ("overflow", "auto"),
                ("position", "relative"),
                ("z-index", "1"),
                ("background", "transparent"),
                ("min-height", "0"),
            ],
        );
        let _ = scroll_container.set_attribute("data-sxsview-scroll", "");
        set_style(
            &spacer,
            &[("position", "absolute"), ("top", "0"), ("left", "0")],
        );
        set_style(
            canvas,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("pointer-events", "none"),
                ("z-index", "0"),
            ],
        );
        let border = format!("1px solid {}", palette::HEADER_BORDER);
        set_style(
            &tab_bar,
            &[
                ("display", "flex"),
                ("gap", "2px"),
                ("padding", "4px 8px"),
                ("overflow-x", "auto"),
                ("flex-shrink", "0"),
                ("background", palette::HEADER_BG),
                ("border-top", border.as_str()),
            ],
        );
        set_style(
            &status,
            &[
                ("flex-shrink", "0"),
                ("padding", "2px 8px"),
                ("font", "12px system-ui, -apple-system, sans-serif"),
                ("color", palette::HEADER_TEXT),
                ("background", palette::HEADER_BG),
                ("white-space", "nowrap"),
                ("overflow", "hidden"),
                ("text-overflow", "ellipsis"),
            ],
        );

        let dom = |r: Result<web_sys::Node, JsValue>| {
            r.map(|_| ())
                .map_err(|_| SxsError::Dom("failed to build pane".into()))
        };
        dom(host.append_child(&wrapper))?;
        dom(wrapper.append_child(canvas))?;
        dom(scroll_container.append_child(&spacer))?;
        dom(wrapper.append_child(&scroll_container))?;
        dom(wrapper.append_child(&tab_bar))?;
        dom(wrapper.append_child(&status))?;

        Ok(Self {
            wrapper,
            scroll_container,
            spacer,
            tab_bar,
            status,
        })
    }

    /// Visible size of the grid area, scrollbars excluded.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn client_size(&self) -> (f32, f32) {
        (
            self.scroll_container.client_width().max(0) as f32,
            self.scroll_container.client_height().max(0) as f32,
        )
    }
}

#[wasm_bindgen]
impl SxsView {
    /// Create a view inside two host elements (left = original file, right =
    /// modified file).
    ///
    /// `compare` is the compare flow's result:
    /// `{ files: { file1, file2 }, data: { summary, changes } }`.
    /// `config` is optional; see `ViewerConfig` for the fields.
    #[wasm_bindgen(constructor)]
    pub fn new(
        left_host: HtmlElement,
        right_host: HtmlElement,
        compare: JsValue,
        config: JsValue,
    ) -> Result<SxsView, JsValue> {
        console_error_panic_hook::set_once();
        let config = ViewerConfig::from_js(config)?;
        crate::logging::init(config.log_level_filter());
        let input: CompareInput = serde_wasm_bindgen::from_value(compare)
            .map_err(|e| SxsError::InvalidInput(format!("compare result: {e}")))?;

        let window = web_sys::window().ok_or_else(|| SxsError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SxsError::Dom("no document".into()))?;
        let dpr = window.device_pixel_ratio();
        #[allow(clippy::cast_possible_truncation)]
        let dpr = dpr as f32;

        let mut canvases = Vec::with_capacity(2);
        let mut panes = Vec::with_capacity(2);
        for host in [&left_host, &right_host] {
            let canvas = document
                .create_element("canvas")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
                .ok_or_else(|| SxsError::Dom("failed to create canvas".into()))?;
            panes.push(Pane::build(host, &canvas)?);
            canvases.push(canvas);
        }
        let (Some(right_pane), Some(left_pane)) = (panes.pop(), panes.pop()) else {
            return Err(SxsError::Dom("pane setup failed".into()).into());
        };
        let (Some(right_canvas), Some(left_canvas)) = (canvases.pop(), canvases.pop()) else {
            return Err(SxsError::Dom("canvas setup failed".into()).into());
        };

        let backend = HttpBackend::new(config.api_base.clone());
        let viewer = SxsViewer::new(input, config);
        let state = Rc::new(RefCell::new(SharedState {
            viewer,
            renderers: PerSide::new(
                CanvasRenderer::new(left_canvas)?,
                CanvasRenderer::new(right_canvas)?,
            ),
            backend,
            dpr,
            quiescence_timer: None,
            quiescence_closure: None,
        }));
        let panes = Rc::new(PerSide::new(left_pane, right_pane));

        let mut view = SxsView {
            state,
            panes,
            scroll_closures: Vec::new(),
            mouse_closures: Vec::new(),
        };
        view.wire_events();
        view.resize();

        let requests = view.state.borrow().viewer.start();
        for request in requests {
            Self::spawn_catalog(&view.state, &view.panes, request);
        }
        Ok(view)
    }

    /// Switch the sheet shown on one side (0 = left, 1 = right).
    pub fn select_sheet(&self, side: usize, sheet: &str) -> Result<(), JsValue> {
        let side = side_arg(side)?;
        Self::select_sheet_internal(&self.state, &self.panes, side, sheet);
        Ok(())
    }

    /// Sheet names of one side's file (empty until the catalog arrives).
    pub fn sheet_names(&self, side: usize) -> Result<JsValue, JsValue> {
        let side = side_arg(side)?;
        let s = self.state.borrow();
        to_js(&s.viewer.side(side).sheets())
    }

    pub fn set_scroll_sync(&self, enabled: bool) {
        self.state.borrow_mut().viewer.set_scroll_sync(enabled);
    }

    pub fn set_show_differences(&self, show: bool) {
        self.state.borrow_mut().viewer.set_show_differences(show);
        self.render();
    }

    pub fn set_only_changes(&self, only: bool) {
        self.state.borrow_mut().viewer.set_only_changes(only);
        self.render();
    }

    /// Select a cell on both grids.
    pub fn select_cell(&self, row: u32, col: u32) {
        self.state.borrow_mut().viewer.select(row, col);
        self.reveal(CellCoord::new(row, col));
        self.render();
    }

    pub fn clear_selection(&self) {
        self.state.borrow_mut().viewer.clear_selection();
        self.render();
    }

    /// Move the cursor to the next change; returns `{row, col}` or `null`.
    pub fn next_change(&self) -> Result<JsValue, JsValue> {
        let coord = self.state.borrow_mut().viewer.next_change();
        self.after_cursor_move(coord)
    }

    /// Move the cursor to the previous change; returns `{row, col}` or `null`.
    pub fn prev_change(&self) -> Result<JsValue, JsValue> {
        let coord = self.state.borrow_mut().viewer.prev_change();
        self.after_cursor_move(coord)
    }

    /// Find the next match on one side after the cursor.
    /// `options`: `{ match_case, match_entire, order: "by_rows" | "by_columns" }`.
    pub fn find_next(&self, side: usize, query: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let side = side_arg(side)?;
        let options = Self::search_options(options)?;
        let coord = self
            .state
            .borrow_mut()
            .viewer
            .find_next(side, query, &options);
        self.after_cursor_move(coord)
    }

    /// Every match on both grids as `[{side, row, col}]`.
    pub fn find_all(&self, query: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options = Self::search_options(options)?;
        let hits = self.state.borrow().viewer.find_all(query, &options);
        to_js(&hits)
    }

    /// Change counts, per-side status and display flags.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        let summary = self.state.borrow().viewer.summary();
        to_js(&summary)
    }

    /// The cursor as an A1 reference, e.g. `"C7"`.
    pub fn selected_address(&self) -> Option<String> {
        self.state
            .borrow()
            .viewer
            .cursor()
            .get()
            .map(format_cell_ref)
    }

    /// Re-measure both panes (call after the host elements change size).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&self) {
        for side in Side::BOTH {
            let (width, height) = self.panes.get(side).client_size();
            let mut s = self.state.borrow_mut();
            let dpr = s.dpr;
            s.viewer.resize(side, width, height);
            s.renderers
                .get_mut(side)
                .resize(width.round() as u32, height.round() as u32, dpr);
        }
        self.render();
    }

    /// Repaint both sides.
    pub fn render(&self) {
        for side in Side::BOTH {
            Self::render_side(&self.state, &self.panes, side);
        }
    }
}

impl SxsView {
    fn search_options(options: JsValue) -> Result<SearchOptions, JsValue> {
        if options.is_undefined() || options.is_null() {
            return Ok(SearchOptions::default());
        }
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| SxsError::InvalidInput(format!("search options: {e}")).into())
    }

    fn after_cursor_move(&self, coord: Option<CellCoord>) -> Result<JsValue, JsValue> {
        if let Some(coord) = coord {
            self.reveal(coord);
        }
        self.render();
        coord_to_js(coord)
    }

    /// Scroll the left pane (or the right one if the left has no grid) so
    /// `coord` is visible. With sync on, the mirror follows.
    fn reveal(&self, coord: CellCoord) {
        let target = {
            let s = self.state.borrow();
            Side::BOTH
                .into_iter()
                .find_map(|side| Some((side, s.viewer.reveal_offset(side, coord)?)))
        };
        if let Some((side, offset)) = target {
            Self::write_scroll(&self.panes.get(side).scroll_container, offset);
        }
    }

    pub(crate) fn write_scroll(container: &HtmlDivElement, offset: ScrollOffset) {
        let _ = Reflect::set(
            container.as_ref(),
            &JsValue::from_str("scrollTop"),
            &JsValue::from_f64(offset.top),
        );
        let _ = Reflect::set(
            container.as_ref(),
            &JsValue::from_str("scrollLeft"),
            &JsValue::from_f64(offset.left),
        );
    }

    /// Paint one side and sync its spacer, tab bar state and status line.
    pub(crate) fn render_side(state: &Rc<RefCell<SharedState>>, panes: &PerSide<Pane>, side: Side) {
        let (extent, status) = {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let renderer = s.renderers.get_mut(side);
            let result = match s.viewer.paint(side) {
                SidePaint::Grid(frame) => renderer.render(&frame),
                SidePaint::Message(message) => renderer.render_message(&message),
            };
            if let Err(e) = result {
                log::error!("{side:?}: render failed: {e}");
            }
            let side_state = s.viewer.side(side);
            let extent = side_state
                .layout
                .as_ref()
                .map_or((0.0, 0.0), |l| l.scroll_extent());
            let mut status = format!("{} \u{00b7} {}", side.label(), side_state.file);
            if let Some(sheet) = &side_state.selected {
                status.push_str(&format!(" \u{00b7} {sheet}"));
            }
            if let Some(error) = side_state.error() {
                status.push_str(&format!(" \u{00b7} {error}"));
            }
            (extent, status)
        }; // borrow dropped before DOM writes that may fire scroll events

        let pane = panes.get(side);
        let spacer_style = pane.spacer.style();
        let _ = spacer_style.set_property("width", &format!("{}px", extent.0));
        let _ = spacer_style.set_property("height", &format!("{}px", extent.1));
        pane.status.set_text_content(Some(&status));
    }
}
