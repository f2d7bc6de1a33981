//! Rendering with pluggable backends.
//!
//! - [`frame`] turns a grid plus overlays into a backend-agnostic paint list
//! - [`canvas2d`] paints that list on a `<canvas>` (browser only)
//! - [`text`] paints it as plain text (CLI, tests)
//! - [`colors`] holds the palette and the highlight/selection style rules

pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod colors;
pub mod frame;
pub mod text;

pub use backend::RenderBackend;
#[cfg(target_arch = "wasm32")]
pub use canvas2d::CanvasRenderer;
pub use colors::{cell_style, palette, CellStyle, CssColor};
pub use frame::{CellPaint, GridFrame, GridRenderer, GridView, HeaderPaint};
pub use text::TextRenderer;
