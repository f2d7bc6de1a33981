//! Data types shared by the viewer, the remote contracts, and the renderers.

mod change;
mod grid;
mod selection;
mod side;

pub use change::*;
pub use grid::*;
pub use selection::*;
pub use side::*;
