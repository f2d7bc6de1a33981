//! Event wiring and async flows for `SxsView`.
//!
//! Scroll and click listeners, the scroll-quiescence timer, sheet tab
//! buttons, and the `spawn_local` tasks that run catalog and grid fetches.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, MouseEvent};

use super::dom::{scroll_left_f64, scroll_top_f64, Pane, SharedState, SxsView};
use super::{CatalogRequest, ScrollOutcome, SheetRequest};
use crate::layout::ScrollOffset;
use crate::remote::{GridDataSource, SheetCatalog};
use crate::render::palette;
use crate::types::{PerSide, Side};

impl SxsView {
    /// Attach scroll and mousedown listeners to both scroll containers.
    pub(crate) fn wire_events(&mut self) {
        for side in Side::BOTH {
            let container = self.panes.get(side).scroll_container.clone();

            let state = Rc::clone(&self.state);
            let panes = Rc::clone(&self.panes);
            let container_for_scroll = container.clone();
            let scroll_closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                let offset = ScrollOffset::new(
                    scroll_top_f64(&container_for_scroll),
                    scroll_left_f64(&container_for_scroll),
                );
                Self::internal_scroll(&state, &panes, side, offset);
            }) as Box<dyn FnMut(web_sys::Event)>);
            container
                .add_event_listener_with_callback("scroll", scroll_closure.as_ref().unchecked_ref())
                .ok();
            self.scroll_closures.push(scroll_closure);

            let state = Rc::clone(&self.state);
            let panes = Rc::clone(&self.panes);
            let container_ref = container.clone();
            let click_closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let rect = container_ref.get_bounding_client_rect();
                #[allow(clippy::cast_possible_truncation)]
                let x = (f64::from(event.client_x()) - rect.left()) as f32;
                #[allow(clippy::cast_possible_truncation)]
                let y = (f64::from(event.client_y()) - rect.top()) as f32;
                Self::internal_click(&state, &panes, side, x, y);
            }) as Box<dyn FnMut(MouseEvent)>);
            container
                .add_event_listener_with_callback("mousedown", click_closure.as_ref().unchecked_ref())
                .ok();
            self.mouse_closures.push(click_closure);
        }
    }

    fn internal_click(
        state: &Rc<RefCell<SharedState>>,
        panes: &Rc<PerSide<Pane>>,
        side: Side,
        x: f32,
        y: f32,
    ) {
        let hit = state.borrow_mut().viewer.click(side, x, y);
        if hit.is_some() {
            for side in Side::BOTH {
                Self::render_side(state, panes, side);
            }
        }
    }

    fn internal_scroll(
        state: &Rc<RefCell<SharedState>>,
        panes: &Rc<PerSide<Pane>>,
        side: Side,
        offset: ScrollOffset,
    ) {
        let outcome = state.borrow_mut().viewer.on_scroll(side, offset);
        Self::apply_scroll_outcome(state, panes, outcome);
        Self::render_side(state, panes, side);
    }

    /// Write the mirrored offset into the other pane and arm the timer.
    /// Runs with no borrow held: the write raises a scroll event.
    fn apply_scroll_outcome(
        state: &Rc<RefCell<SharedState>>,
        panes: &Rc<PerSide<Pane>>,
        outcome: ScrollOutcome,
    ) {
        if let Some(write) = outcome.write {
            Self::write_scroll(&panes.get(write.target).scroll_container, write.offset);
            Self::render_side(state, panes, write.target);
        }
        if outcome.arm_timer {
            Self::schedule_quiescence(state, panes);
        }
    }

    fn schedule_quiescence(state: &Rc<RefCell<SharedState>>, panes: &Rc<PerSide<Pane>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if let Some(timer_id) = s.quiescence_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        if s.quiescence_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let panes = Rc::clone(panes);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    Self::handle_quiescence(&state, &panes);
                }
            }) as Box<dyn FnMut()>);
            s.quiescence_closure = Some(closure);
        }
        let delay = i32::try_from(s.viewer.scroll().quiescence_ms()).unwrap_or(i32::MAX);
        let Some(callback) = s.quiescence_closure.as_ref() else {
            return;
        };
        let timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            )
            .ok();
        s.quiescence_timer = timer;
    }

    fn handle_quiescence(state: &Rc<RefCell<SharedState>>, panes: &Rc<PerSide<Pane>>) {
        let outcome = {
            let mut s = state.borrow_mut();
            s.quiescence_timer = None;
            s.viewer.on_scroll_quiescence()
        };
        Self::apply_scroll_outcome(state, panes, outcome);
    }

    // --- remote flows --------------------------------------------------

    pub(crate) fn spawn_catalog(
        state: &Rc<RefCell<SharedState>>,
        panes: &Rc<PerSide<Pane>>,
        request: CatalogRequest,
    ) {
        let state = Rc::clone(state);
        let panes = Rc::clone(panes);
        let backend = state.borrow().backend.clone();
        spawn_local(async move {
            let result = backend.list_sheets(&request.file).await;
            let next = state.borrow_mut().viewer.on_catalog(&request, result);
            Self::update_tab_bar(&state, &panes, request.side);
            if let Some(next) = next {
                Self::spawn_sheet_load(&state, &panes, next);
            }
            Self::render_side(&state, &panes, request.side);
        });
    }

    fn spawn_sheet_load(
        state: &Rc<RefCell<SharedState>>,
        panes: &Rc<PerSide<Pane>>,
        request: SheetRequest,
    ) {
        let state = Rc::clone(state);
        let panes = Rc::clone(panes);
        let backend = state.borrow().backend.clone();
        spawn_local(async move {
            let result = backend
                .load_sheet(&request.key.file, &request.key.sheet)
                .await;
            let _ = state.borrow_mut().viewer.on_sheet_loaded(&request, result);
            Self::render_side(&state, &panes, request.side);
        });
    }

    pub(crate) fn select_sheet_internal(
        state: &Rc<RefCell<SharedState>>,
        panes: &Rc<PerSide<Pane>>,
        side: Side,
        sheet: &str,
    ) {
        let request = state.borrow_mut().viewer.select_sheet(side, sheet);
        Self::update_tab_bar(state, panes, side);
        if let Some(request) = request {
            Self::spawn_sheet_load(state, panes, request);
        }
        Self::render_side(state, panes, side);
    }

    /// Rebuild a side's sheet buttons.
    fn update_tab_bar(state: &Rc<RefCell<SharedState>>, panes: &Rc<PerSide<Pane>>, side: Side) {
        let tab_bar = &panes.get(side).tab_bar;

        // Copy what we need, then drop the borrow before touching the DOM.
        let (sheets, selected) = {
            let s = state.borrow();
            let side_state = s.viewer.side(side);
            (side_state.sheets().to_vec(), side_state.selected.clone())
        };

        tab_bar.set_inner_html("");
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for name in sheets {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            button.set_text_content(Some(&name));
            let Some(el) = button.dyn_ref::<HtmlElement>() else {
                continue;
            };
            let style = el.style();
            let _ = style.set_property("padding", "4px 12px");
            let _ = style.set_property("border", "none");
            let _ = style.set_property("border-radius", "4px 4px 0 0");
            let _ = style.set_property("cursor", "pointer");
            let _ = style.set_property("font-size", "12px");
            let _ = style.set_property("font-family", "system-ui, -apple-system, sans-serif");
            let _ = style.set_property("white-space", "nowrap");
            if selected.as_deref() == Some(name.as_str()) {
                let _ = style.set_property("background", palette::SELECTED_BG);
                let _ = style.set_property("color", palette::SELECTED_TEXT);
                let _ = style.set_property("font-weight", "500");
            } else {
                let _ = style.set_property("background", palette::GRID_LINE);
                let _ = style.set_property("color", palette::HEADER_TEXT);
            }

            let state = Rc::clone(state);
            let panes = Rc::clone(panes);
            let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
                Self::select_sheet_internal(&state, &panes, side, &name);
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget(); // Lives as long as the button

            let _ = tab_bar.append_child(&button);
        }
    }
}
