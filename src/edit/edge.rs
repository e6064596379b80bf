//! Hook for what happens at the selection border during a height drag

use crate::core::types::IVec2;
use crate::ground::Ground;
use super::config::EdgeMode;

/// Behaviour applied to the border of the selection after each drag
/// update. The selected cubes have already been deformed and their
/// normals reconciled when this runs.
pub trait EdgePolicy {
    /// `edges` are the selected tiles with an unselected 8-neighbour
    fn after_deform(&mut self, ground: &mut Ground, edges: &[IVec2], mode: EdgeMode);
}

/// Leaves the border alone in every mode
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEdgePolicy;

impl EdgePolicy for NoEdgePolicy {
    fn after_deform(&mut self, _ground: &mut Ground, _edges: &[IVec2], _mode: EdgeMode) {}
}
