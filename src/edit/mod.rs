//! Height editing: per-view tool options, the nine-handle deformable
//! quad, the drag engine and the deltas it hands to the undo stack.

pub mod config;
pub mod quad;
pub mod drag;
pub mod engine;
pub mod edge;
pub mod delta;

pub use config::{EdgeMode, Tool, ToolOptions};
pub use quad::{DeformableQuad, HandleGroup, HANDLE_COUNT, HANDLE_MASKS};
pub use drag::{DragSession, DragState};
pub use engine::{EditOutcome, HeightEditEngine};
pub use edge::{EdgePolicy, NoEdgePolicy};
pub use delta::{CubeHeights, HeightDelta};
