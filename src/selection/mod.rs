//! Tile selection: the selected set, the rectangle/lasso drag tools and
//! the highlight mesh drawn over them.

pub mod set;
pub mod tool;
pub mod overlay;

pub use set::TileSelection;
pub use tool::{SelectTool, TileRect};
pub use overlay::{tile_overlay, OverlayVertex};
