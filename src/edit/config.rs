//! Per-view tool options for height editing and tile selection.

use serde::{Deserialize, Serialize};

/// Selection tool used by plain drags in the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Rectangle,
    Lasso,
    /// Free painting; leaves the selection alone
    Doodle,
}

impl Tool {
    /// Whether this tool builds tile selections
    pub fn selects(self) -> bool {
        matches!(self, Tool::Rectangle | Tool::Lasso)
    }
}

/// What happens at the border of the selection while dragging heights
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeMode {
    #[default]
    Nothing,
    RaiseGround,
    BuildWalls,
}

/// Options owned by one map view. Two views of the same map may use
/// different tools and snapping at the same time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOptions {
    pub tool: Tool,
    pub edge_mode: EdgeMode,
    /// Snap drags to the height grid. Shift inverts this for a frame.
    pub snap_to_grid: bool,
    /// Grid step in height units
    pub grid_size: f32,
    /// Snap the drag offset (true) or the resulting heights (false)
    pub grid_local: bool,
    pub show_center_arrow: bool,
    pub show_corner_arrows: bool,
    pub show_edge_arrows: bool,
    /// Let the cursor hit cubes without a top tile
    pub view_empty_tiles: bool,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            tool: Tool::Rectangle,
            edge_mode: EdgeMode::Nothing,
            snap_to_grid: false,
            grid_size: 5.0,
            grid_local: true,
            show_center_arrow: true,
            show_corner_arrows: true,
            show_edge_arrows: true,
            view_empty_tiles: true,
        }
    }
}

impl ToolOptions {
    /// Effective snapping for a frame, given whether Shift is held
    pub fn snap(&self, shift: bool) -> bool {
        self.snap_to_grid != shift
    }

    /// Grid step guarded against zero and negative values
    pub fn grid_step(&self) -> f32 {
        if self.grid_size > f32::EPSILON {
            self.grid_size
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_inverts_snap() {
        let mut options = ToolOptions::default();
        assert!(!options.snap(false));
        assert!(options.snap(true));

        options.snap_to_grid = true;
        assert!(options.snap(false));
        assert!(!options.snap(true));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: ToolOptions =
            serde_json::from_str(r#"{"tool":"Lasso","grid_size":2.5}"#).unwrap();
        assert_eq!(options.tool, Tool::Lasso);
        assert_eq!(options.grid_size, 2.5);
        assert!(options.grid_local);
        assert_eq!(options.edge_mode, EdgeMode::Nothing);
    }

    #[test]
    fn test_grid_step_guard() {
        let options = ToolOptions { grid_size: 0.0, ..Default::default() };
        assert_eq!(options.grid_step(), 1.0);
    }

    #[test]
    fn test_doodle_does_not_select() {
        assert!(Tool::Rectangle.selects());
        assert!(Tool::Lasso.selects());
        assert!(!Tool::Doodle.selects());
    }
}
