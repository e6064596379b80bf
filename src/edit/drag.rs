//! Per-view drag state of the height handles

use crate::core::types::{IVec2, Vec3};
use crate::math::Plane;

/// Snapshot taken when a handle is grabbed
#[derive(Clone, Debug)]
pub struct DragSession {
    /// Index of the grabbed handle, 0-8
    pub handle: usize,
    /// Vertical plane the mouse ray is projected onto
    pub plane: Plane,
    /// Plane hit at grab time
    pub start: Vec3,
    /// Heights of every selected cube before the drag
    pub original_heights: Vec<(IVec2, [f32; 4])>,
    /// Quad corners before the drag
    pub original_corners: [Vec3; 4],
    /// Selected tiles on the selection border
    pub edges: Vec<IVec2>,
    /// Offset applied by the last update
    pub last_offset: Option<Vec3>,
}

/// Idle -> Armed on grab, Armed/Dragging -> Dragging while held,
/// back to Idle on release
#[derive(Clone, Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Armed(DragSession),
    Dragging(DragSession),
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Idle => None,
            DragState::Armed(s) | DragState::Dragging(s) => Some(s),
        }
    }

    /// Handle currently held, if any
    pub fn active_handle(&self) -> Option<usize> {
        self.session().map(|s| s.handle)
    }

    /// Handles other than the held one are disabled during a drag
    pub fn handle_enabled(&self, handle: usize) -> bool {
        self.active_handle().is_none_or(|h| h == handle)
    }
}
