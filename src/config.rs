//! Viewer configuration supplied by the host page.
//!
//! Every field has a default so the host can pass `{}` (or nothing) and only
//! override what it needs.

use serde::{Deserialize, Serialize};

/// Default quiescence window (ms) for the scroll mirror guard.
pub const SCROLL_SYNC_QUIESCENCE_MS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Prefix for the sheet/data endpoints (no trailing slash needed).
    pub api_base: String,
    /// Mirror scroll offsets between the two grids.
    pub scroll_sync: bool,
    /// Quiescence window after a mirrored write. Zero is raised to one.
    pub sync_quiescence_ms: u32,
    /// Row height in CSS pixels.
    pub row_height: f32,
    /// Column width in CSS pixels.
    pub col_width: f32,
    /// Width of the row-number gutter.
    pub row_header_width: f32,
    /// Height of the column-letter header.
    pub col_header_height: f32,
    /// Paint diff highlights.
    pub show_differences: bool,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            scroll_sync: true,
            sync_quiescence_ms: SCROLL_SYNC_QUIESCENCE_MS,
            row_height: 24.0,
            col_width: 100.0,
            row_header_width: 48.0,
            col_header_height: 28.0,
            show_differences: true,
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse from JSON, then normalize.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Decode from a JS object (`undefined`/`null` yields the defaults).
    #[cfg(target_arch = "wasm32")]
    pub fn from_js(value: wasm_bindgen::JsValue) -> crate::error::Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(value)
            .map_err(|e| crate::error::SxsError::InvalidInput(e.to_string()))?;
        Ok(config.normalized())
    }

    /// Clamp values that would break layout or the scroll guard.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.sync_quiescence_ms = self.sync_quiescence_ms.max(1);
        let defaults = Self::default();
        if !(self.row_height.is_finite() && self.row_height >= 1.0) {
            self.row_height = defaults.row_height;
        }
        if !(self.col_width.is_finite() && self.col_width >= 1.0) {
            self.col_width = defaults.col_width;
        }
        if !(self.row_header_width.is_finite() && self.row_header_width >= 0.0) {
            self.row_header_width = defaults.row_header_width;
        }
        if !(self.col_header_height.is_finite() && self.col_header_height >= 0.0) {
            self.col_header_height = defaults.col_header_height;
        }
        let trimmed = self.api_base.trim_end_matches('/').len();
        self.api_base.truncate(trimmed);
        self
    }

    /// Parsed log level; unknown names fall back to `info`.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn zero_quiescence_and_bad_sizes_are_clamped() {
        let config = ViewerConfig::from_json(
            r#"{"sync_quiescence_ms":0,"row_height":-3,"api_base":"http://h/api//"}"#,
        )
        .unwrap();
        assert_eq!(config.sync_quiescence_ms, 1);
        assert_eq!(config.row_height, 24.0);
        assert_eq!(config.api_base, "http://h/api");
    }

    #[test]
    fn log_level_parsing() {
        let mut config = ViewerConfig::default();
        config.log_level = "debug".into();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
        config.log_level = "loud".into();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }
}
