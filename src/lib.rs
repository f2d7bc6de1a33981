//! sxsview - side-by-side spreadsheet diff viewer for the web
//!
//! Shows two versions of a spreadsheet as synchronized Canvas 2D grids via
//! WebAssembly:
//! - Cell highlights from a precomputed comparison (added, removed, modified)
//! - Mirrored scrolling with an explicit anti-feedback guard
//! - One selection shared by both grids
//! - Per-side sheet tabs, loaded lazily from the comparison service
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { SxsView } from 'sxsview';
//! await init();
//! const compare = await (await fetch('/api/compare', opts)).json();
//! const view = new SxsView(leftHost, rightHost, compare, { apiBase: '/api' });
//! view.set_only_changes(true);
//! view.next_change();
//! ```

pub mod cell_ref;
pub mod config;
pub mod diff_index;
pub mod error;
pub mod logging;
pub mod remote;
pub mod search;
pub mod types;

// Grid geometry, painting and the viewer itself
pub mod layout;
pub mod render;
pub mod viewer;

use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::SxsView;
pub use viewer::SxsViewer;

pub use types::*;

/// Highlight index of a comparison, as handed to the page.
#[derive(Debug, Serialize)]
struct ChangeIndex {
    counts: diff_index::ChangeCounts,
    changed_rows: Vec<u32>,
    cells: Vec<ChangeRecord>,
}

fn change_index(json: &str) -> error::Result<ChangeIndex> {
    let input = CompareInput::from_json(json)?;
    let map = diff_index::HighlightMap::build(&input.data.changes);
    let cells = map
        .coords()
        .iter()
        .filter_map(|c| Some(ChangeRecord::new(c.row, c.col, map.get(c.row, c.col)?)))
        .collect();
    Ok(ChangeIndex {
        counts: map.counts(),
        changed_rows: map.changed_rows().into_iter().collect(),
        cells,
    })
}

/// Deduplicate a comparison's change list and return the highlight index as
/// JSON (`counts`, `changed_rows`, `cells`).
///
/// # Errors
/// Returns an error if the comparison document does not decode.
#[wasm_bindgen]
pub fn index_changes(compare_json: &str) -> Result<String, JsValue> {
    let index = change_index(compare_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&index)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Same as [`index_changes`], returned as a JS object.
///
/// # Errors
/// Returns an error if the comparison document does not decode.
#[wasm_bindgen]
pub fn index_changes_to_js(compare_json: &str) -> Result<JsValue, JsValue> {
    let index = change_index(compare_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&index)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn index_changes_keeps_last_record_per_cell() {
        let json = r#"{
            "files": {"file1": "a", "file2": "b"},
            "data": {"changes": [
                {"row": 1, "col": 0, "type": "added"},
                {"row": 1, "col": 0, "type": "modified"},
                {"row": 4, "col": 2, "type": "removed"}
            ]}
        }"#;
        let out: serde_json::Value = serde_json::from_str(&index_changes(json).unwrap()).unwrap();
        assert_eq!(out["changed_rows"], serde_json::json!([1, 4]));
        assert_eq!(out["cells"].as_array().unwrap().len(), 2);
        assert_eq!(out["cells"][0]["type"], "modified");
    }
}
