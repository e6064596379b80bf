//! Height drag engine: grabs a quad handle and redistributes the drag over
//! every selected cube.

use std::fmt;

use log::{debug, warn};

use crate::core::input::FrameInput;
use crate::core::types::{IVec2, Vec3};
use crate::ground::Ground;
use crate::math::Plane;
use crate::selection::TileSelection;
use super::config::ToolOptions;
use super::delta::HeightDelta;
use super::drag::{DragSession, DragState};
use super::edge::{EdgePolicy, NoEdgePolicy};
use super::quad::{deform_corners, height_change, DeformableQuad};

/// Squared length under which a horizontal plane normal is unusable
const PLANE_EPSILON: f32 = 1e-8;

/// What one frame of the engine did
#[derive(Clone, Debug, PartialEq)]
pub struct EditOutcome {
    /// False when a handle took the mouse this frame
    pub can_select: bool,
    /// Heights were written this frame
    pub changed: bool,
    /// Set on the frame a drag ends, if it changed anything
    pub delta: Option<HeightDelta>,
    /// Where to draw the snap grid while dragging with snapping on
    pub snap_guide: Option<Vec3>,
    /// Handles for this frame, None without a selection
    pub quad: Option<DeformableQuad>,
}

impl EditOutcome {
    fn idle() -> Self {
        Self {
            can_select: true,
            changed: false,
            delta: None,
            snap_guide: None,
            quad: None,
        }
    }
}

/// Height handle tool of one map view.
pub struct HeightEditEngine {
    state: DragState,
    /// Last usable drag plane normal
    last_plane_normal: Option<Vec3>,
    edge_policy: Box<dyn EdgePolicy>,
}

impl fmt::Debug for HeightEditEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightEditEngine")
            .field("state", &self.state)
            .field("last_plane_normal", &self.last_plane_normal)
            .finish_non_exhaustive()
    }
}

impl Default for HeightEditEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightEditEngine {
    pub fn new() -> Self {
        Self::with_edge_policy(Box::new(NoEdgePolicy))
    }

    pub fn with_edge_policy(edge_policy: Box<dyn EdgePolicy>) -> Self {
        Self {
            state: DragState::Idle,
            last_plane_normal: None,
            edge_policy,
        }
    }

    pub fn set_edge_policy(&mut self, edge_policy: Box<dyn EdgePolicy>) {
        self.edge_policy = edge_policy;
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        !self.state.is_idle()
    }

    /// Drop any drag in progress without emitting a delta. Heights already
    /// written stay.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Run one frame.
    pub fn update(
        &mut self,
        ground: &mut Ground,
        selection: &TileSelection,
        input: &FrameInput,
        options: &ToolOptions,
    ) -> EditOutcome {
        let mut outcome = EditOutcome::idle();
        let Some(quad) = DeformableQuad::from_selection(ground, selection) else {
            if !self.state.is_idle() {
                debug!("Selection gone, dropping height drag");
                self.state = DragState::Idle;
            }
            return outcome;
        };
        outcome.quad = Some(quad);

        match std::mem::take(&mut self.state) {
            DragState::Idle => {
                if !input.hovered || !input.button.just_pressed() {
                    return outcome;
                }
                if let Some(handle) = quad.pick_handle(&input.mouse_ray, options) {
                    let session = self.arm(ground, selection, input, &quad, handle);
                    self.state = DragState::Armed(session);
                    outcome.can_select = false;
                }
            }
            DragState::Armed(mut session) | DragState::Dragging(mut session) => {
                outcome.can_select = false;
                if !input.button.is_down() {
                    let delta = HeightDelta::capture(ground, &session.original_heights);
                    debug!(
                        "Handle {} released, {} cubes changed",
                        session.handle,
                        delta.len()
                    );
                    outcome.delta = (!delta.is_empty()).then_some(delta);
                    return outcome;
                }

                let snap = options.snap(input.modifiers.shift);
                if snap {
                    outcome.snap_guide = Some(snap_guide(quad.points[session.handle], options));
                }
                outcome.changed = self.drag(ground, &mut session, input, options, snap);
                self.state = DragState::Dragging(session);
            }
        }
        outcome
    }

    fn arm(
        &mut self,
        ground: &Ground,
        selection: &TileSelection,
        input: &FrameInput,
        quad: &DeformableQuad,
        handle: usize,
    ) -> DragSession {
        let normal = self.drag_plane_normal(input);
        let plane = Plane::from_point_normal(quad.points[handle], normal);
        let ray = &input.mouse_ray;
        let start = ray
            .intersect_plane(&plane)
            .map(|t| ray.at(t))
            .unwrap_or(quad.points[handle]);

        let original_heights: Vec<(IVec2, [f32; 4])> = selection
            .iter()
            .filter_map(|t| ground.get_cube(t.x, t.y).map(|c| (t, c.heights)))
            .collect();
        debug!(
            "Handle {} grabbed at {:?}, {} cubes snapshotted",
            handle,
            start,
            original_heights.len()
        );

        DragSession {
            handle,
            plane,
            start,
            original_heights,
            original_corners: quad.corners(),
            edges: selection.edge_tiles(),
            last_offset: None,
        }
    }

    /// Camera-facing vertical plane normal. A camera looking straight down
    /// has no horizontal component; the previous normal is reused then.
    fn drag_plane_normal(&mut self, input: &FrameInput) -> Vec3 {
        let mut normal = input.view_axis();
        normal.y = 0.0;
        if normal.length_squared() > PLANE_EPSILON {
            let normal = normal.normalize();
            self.last_plane_normal = Some(normal);
            normal
        } else {
            let fallback = self.last_plane_normal.unwrap_or(Vec3::Z);
            warn!("Degenerate drag plane, reusing normal {:?}", fallback);
            fallback
        }
    }

    fn drag(
        &mut self,
        ground: &mut Ground,
        session: &mut DragSession,
        input: &FrameInput,
        options: &ToolOptions,
        snap: bool,
    ) -> bool {
        let ray = &input.mouse_ray;
        let Some(t) = ray.intersect_plane(&session.plane) else {
            return false;
        };

        let grid = options.grid_step();
        let mut offset = ray.at(t) - session.start;
        if snap && options.grid_local {
            offset = (offset / grid).round() * grid;
        }
        if session.last_offset == Some(offset) {
            return false;
        }
        session.last_offset = Some(offset);

        let absolute_grid = (snap && !options.grid_local).then_some(grid);
        let original = &session.original_corners;
        let deformed = deform_corners(original, session.handle, offset.y, absolute_grid);

        let mut tiles = Vec::with_capacity(session.original_heights.len());
        for &(tile, before) in &session.original_heights {
            let mut heights = before;
            for (corner, height) in heights.iter_mut().enumerate() {
                let p = ground.get_pos(tile.x, tile.y, corner);
                if let Some(change) = height_change(original, &deformed, p) {
                    *height = before[corner] + change;
                }
            }
            ground.write_heights(tile.x, tile.y, heights);
            tiles.push(tile);
        }
        ground.recalculate_normals(&tiles);
        self.edge_policy.after_deform(ground, &session.edges, options.edge_mode);
        true
    }
}

/// Position of the snap grid for a handle: the handle itself for local
/// snapping, floored to the grid for absolute snapping
pub fn snap_guide(handle: Vec3, options: &ToolOptions) -> Vec3 {
    let mut guide = handle;
    if !options.grid_local {
        let grid = options.grid_step();
        guide.y = (guide.y / grid).floor() * grid;
    }
    guide
}
