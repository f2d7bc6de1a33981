//! Grid geometry and viewport management.
//!
//! This module handles:
//! - Pre-computing row/column edges for one snapshot (with hidden rows)
//! - Viewport state (scroll offsets, visible range)
//! - Binary search for cell lookup at content coordinates

mod grid_layout;
mod viewport;

pub use grid_layout::{GridLayout, RowFilter};
pub use viewport::{ScrollOffset, Viewport};
