//! Backend-agnostic render trait.
//!
//! A backend receives a finished [`GridFrame`] and paints it. Layout, overlay
//! rules and visibility are decided before the frame reaches the backend.

use super::frame::GridFrame;
use crate::error::Result;

/// Trait that all render backends implement.
pub trait RenderBackend {
    /// Resize the render surface (CSS pixels, device pixel ratio).
    fn resize(&mut self, width: u32, height: u32, dpr: f32);

    /// Paint one frame, replacing whatever was drawn before.
    fn render(&mut self, frame: &GridFrame<'_>) -> Result<()>;

    /// Paint the placeholder shown while a side has nothing to display.
    fn render_message(&mut self, message: &str) -> Result<()>;

    /// Current width in CSS pixels.
    fn width(&self) -> u32;

    /// Current height in CSS pixels.
    fn height(&self) -> u32;
}
