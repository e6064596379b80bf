//! Rectangle and lasso drag selection

use log::debug;

use crate::core::input::FrameInput;
use crate::core::types::{IVec2, Vec3};
use crate::edit::config::Tool;
use crate::ground::{Ground, TILE_SIZE};
use crate::math::Polygon;
use super::TileSelection;

/// Half-open box of tile coordinates `[min, max)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl TileRect {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Tiles covered by a drag between two ground hits.
    ///
    /// X bounds are the floor/ceil of the dragged span. Z runs opposite to
    /// tile Y, so the Y bounds are flipped and shifted by one.
    pub fn from_drag(ground: &Ground, start: Vec3, end: Vec3) -> Self {
        let min_x = (start.x.min(end.x) / TILE_SIZE).floor() as i32;
        let max_x = (start.x.max(end.x) / TILE_SIZE).ceil() as i32;
        let max_y = ground.height() - (start.z.min(end.z) / TILE_SIZE).floor() as i32 + 1;
        let min_y = ground.height() - (start.z.max(end.z) / TILE_SIZE).ceil() as i32 + 1;
        Self::new(IVec2::new(min_x, min_y), IVec2::new(max_x, max_y))
    }

    /// Whether every bound lies inside `[0, width] x [0, height]`
    pub fn fits(&self, ground: &Ground) -> bool {
        self.min.x >= 0
            && self.max.x <= ground.width()
            && self.min.y >= 0
            && self.max.y <= ground.height()
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    pub fn tiles(&self) -> impl Iterator<Item = IVec2> + use<> {
        let (min, max) = (self.min, self.max);
        (min.x..max.x).flat_map(move |x| (min.y..max.y).map(move |y| IVec2::new(x, y)))
    }
}

/// Drag state of the selection tools, one per view.
#[derive(Clone, Debug, Default)]
pub struct SelectTool {
    mouse_down: bool,
    drag_start: Vec3,
    drag_end: Vec3,
    /// Shift or Ctrl was held when the drag began
    keep_selection: bool,
    lasso: Vec<IVec2>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.mouse_down
    }

    /// Tiles visited by the current lasso drag
    pub fn lasso_path(&self) -> &[IVec2] {
        &self.lasso
    }

    /// Abandon the drag without touching the selection
    pub fn cancel(&mut self) {
        self.mouse_down = false;
        self.lasso.clear();
    }

    /// Advance one frame.
    ///
    /// `hit` is the ground point under the cursor, if any. Only call this
    /// when no height handle took the mouse this frame. Returns true when
    /// the selection changed.
    pub fn update(
        &mut self,
        ground: &Ground,
        selection: &mut TileSelection,
        input: &FrameInput,
        hit: Option<Vec3>,
        tool: Tool,
    ) -> bool {
        if !tool.selects() {
            self.cancel();
            return false;
        }

        if let Some(point) = hit {
            self.drag_end = point;
        }

        let button = input.button;
        if !self.mouse_down {
            if input.hovered && button.is_down() {
                let Some(point) = hit else {
                    return false;
                };
                self.mouse_down = true;
                self.drag_start = point;
                self.keep_selection = input.modifiers.shift || input.modifiers.ctrl;
                self.lasso.clear();
                debug!("Selection drag started at {:?}", point);
            } else {
                return false;
            }
        }

        if button.just_released() {
            self.mouse_down = false;
            if !input.hovered {
                self.lasso.clear();
                return false;
            }
            let subtract = input.modifiers.ctrl;
            return match tool {
                Tool::Rectangle => self.finish_rectangle(ground, selection, subtract),
                Tool::Lasso => self.finish_lasso(ground, selection, subtract),
                Tool::Doodle => false,
            };
        }

        if !button.is_down() {
            // Button lost without a release event
            self.cancel();
            return false;
        }

        if tool == Tool::Lasso {
            let tile = ground.tile_at(self.drag_end);
            if ground.in_map(tile) && self.lasso.last() != Some(&tile) {
                self.lasso.push(tile);
            }
        }
        false
    }

    fn finish_rectangle(&mut self, ground: &Ground, selection: &mut TileSelection, subtract: bool) -> bool {
        let rect = TileRect::from_drag(ground, self.drag_start, self.drag_end);
        if !rect.fits(ground) {
            debug!("Rectangle {:?} outside the ground, ignored", rect);
            return false;
        }
        if !self.keep_selection {
            selection.clear();
        }
        apply(selection, rect.tiles(), subtract);
        true
    }

    fn finish_lasso(&mut self, ground: &Ground, selection: &mut TileSelection, subtract: bool) -> bool {
        let path = std::mem::take(&mut self.lasso);
        let polygon = Polygon::from_points(path.iter().map(|t| t.as_vec2()));

        if !self.keep_selection {
            selection.clear();
        }
        let inside = (0..ground.width())
            .flat_map(|x| (0..ground.height()).map(move |y| IVec2::new(x, y)))
            .filter(|t| polygon.contains(t.as_vec2()));
        apply(selection, inside, subtract);
        apply(selection, path.iter().copied(), subtract);
        true
    }

    /// Tiles to highlight for the drag in progress: the covered rectangle
    /// (when it fits the ground) or the lasso path
    pub fn preview_tiles(&self, ground: &Ground, tool: Tool) -> Vec<IVec2> {
        if !self.mouse_down {
            return Vec::new();
        }
        match tool {
            Tool::Rectangle => {
                let rect = TileRect::from_drag(ground, self.drag_start, self.drag_end);
                if rect.fits(ground) {
                    rect.tiles().collect()
                } else {
                    Vec::new()
                }
            }
            Tool::Lasso => self.lasso.clone(),
            Tool::Doodle => Vec::new(),
        }
    }

    /// The rectangle currently spanned by the drag, for status display
    pub fn drag_rect(&self, ground: &Ground) -> Option<TileRect> {
        self.mouse_down
            .then(|| TileRect::from_drag(ground, self.drag_start, self.drag_end))
    }
}

fn apply(selection: &mut TileSelection, tiles: impl Iterator<Item = IVec2>, subtract: bool) {
    for tile in tiles {
        if subtract {
            selection.remove(tile);
        } else {
            selection.add(tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{ButtonState, Modifiers};
    use crate::core::types::Mat4;
    use crate::math::Ray;

    /// Center of tile (x, y) on flat ground
    fn center(ground: &Ground, x: i32, y: i32) -> Vec3 {
        (ground.get_pos(x, y, 0) + ground.get_pos(x, y, 3)) * 0.5
    }

    struct Driver {
        button: ButtonState,
        modifiers: Modifiers,
    }

    impl Driver {
        fn new(modifiers: Modifiers) -> Self {
            Self { button: ButtonState::new(), modifiers }
        }

        fn frame(
            &mut self,
            tool: &mut SelectTool,
            ground: &Ground,
            selection: &mut TileSelection,
            kind: Tool,
            down: bool,
            hit: Vec3,
        ) -> bool {
            self.button.update(down);
            let input = FrameInput::new(Ray::new(hit + Vec3::Y * 50.0, Vec3::NEG_Y), Mat4::IDENTITY)
                .with_modifiers(self.modifiers)
                .with_button(self.button);
            tool.update(ground, selection, &input, Some(hit), kind)
        }

        fn drag(
            &mut self,
            tool: &mut SelectTool,
            ground: &Ground,
            selection: &mut TileSelection,
            kind: Tool,
            path: &[Vec3],
        ) -> bool {
            for point in path {
                self.frame(tool, ground, selection, kind, true, *point);
            }
            let last = *path.last().unwrap();
            self.frame(tool, ground, selection, kind, false, last)
        }
    }

    #[test]
    fn test_rect_from_single_tile_drag() {
        let ground = Ground::new(8, 8).unwrap();
        let p = Vec3::new(34.0, 0.0, 47.0);
        let rect = TileRect::from_drag(&ground, p, p);
        assert_eq!(rect, TileRect::new(IVec2::new(3, 4), IVec2::new(4, 5)));
        assert_eq!(ground.tile_at(p), IVec2::new(3, 4));
    }

    #[test]
    fn test_rect_bounds_rejection() {
        let ground = Ground::new(5, 5).unwrap();
        let rect = TileRect::new(IVec2::new(-1, 0), IVec2::new(5, 5));
        assert!(!rect.fits(&ground));
        assert!(TileRect::new(IVec2::new(0, 0), IVec2::new(5, 5)).fits(&ground));
        assert!(!TileRect::new(IVec2::new(0, 0), IVec2::new(5, 6)).fits(&ground));
    }

    #[test]
    fn test_rectangle_drag_replaces() {
        let ground = Ground::new(8, 8).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::from_tiles([IVec2::new(7, 7)]);
        let mut driver = Driver::new(Modifiers::NONE);

        let changed = driver.drag(
            &mut tool,
            &ground,
            &mut selection,
            Tool::Rectangle,
            &[center(&ground, 1, 1), center(&ground, 2, 3)],
        );
        assert!(changed);
        assert_eq!(selection.len(), 6);
        assert!(!selection.contains(IVec2::new(7, 7)));
        for x in 1..=2 {
            for y in 1..=3 {
                assert!(selection.contains(IVec2::new(x, y)), "({x}, {y})");
            }
        }
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_shift_adds_ctrl_subtracts() {
        let ground = Ground::new(8, 8).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::from_tiles([IVec2::new(7, 7)]);

        Driver::new(Modifiers::SHIFT).drag(
            &mut tool,
            &ground,
            &mut selection,
            Tool::Rectangle,
            &[center(&ground, 0, 0), center(&ground, 1, 1)],
        );
        assert_eq!(selection.len(), 5);
        assert!(selection.contains(IVec2::new(7, 7)));

        Driver::new(Modifiers::CTRL).drag(
            &mut tool,
            &ground,
            &mut selection,
            Tool::Rectangle,
            &[center(&ground, 0, 0), center(&ground, 0, 1)],
        );
        assert_eq!(selection.len(), 3);
        assert!(!selection.contains(IVec2::new(0, 0)));
        assert!(!selection.contains(IVec2::new(0, 1)));
        assert!(selection.contains(IVec2::new(1, 1)));
    }

    #[test]
    fn test_out_of_range_drag_discarded() {
        let ground = Ground::new(4, 4).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::from_tiles([IVec2::new(2, 2)]);

        let changed = Driver::new(Modifiers::NONE).drag(
            &mut tool,
            &ground,
            &mut selection,
            Tool::Rectangle,
            &[Vec3::new(-15.0, 0.0, 25.0), center(&ground, 1, 1)],
        );
        assert!(!changed);
        // Not clamped, and the old selection survives
        assert_eq!(selection.as_slice(), &[IVec2::new(2, 2)]);
    }

    #[test]
    fn test_lasso_fills_polygon() {
        let ground = Ground::new(10, 10).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::new();

        let corners = [(1, 1), (6, 1), (6, 6), (1, 6)];
        let path: Vec<Vec3> = corners.iter().map(|&(x, y)| center(&ground, x, y)).collect();
        Driver::new(Modifiers::NONE).drag(&mut tool, &ground, &mut selection, Tool::Lasso, &path);

        // Interior tiles and the traced vertices are selected
        assert!(selection.contains(IVec2::new(3, 3)));
        for (x, y) in corners {
            assert!(selection.contains(IVec2::new(x, y)));
        }
        assert!(!selection.contains(IVec2::new(8, 8)));
        assert!(!selection.contains(IVec2::new(0, 0)));
        assert!(tool.lasso_path().is_empty());
    }

    #[test]
    fn test_lasso_dedups_consecutive_tiles() {
        let ground = Ground::new(10, 10).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::new();
        let mut driver = Driver::new(Modifiers::NONE);

        let a = center(&ground, 2, 2);
        for point in [a, a + Vec3::X, a, center(&ground, 3, 2), Vec3::new(-50.0, 0.0, 0.0)] {
            driver.frame(&mut tool, &ground, &mut selection, Tool::Lasso, true, point);
        }
        assert_eq!(tool.lasso_path(), &[IVec2::new(2, 2), IVec2::new(3, 2)]);
        assert_eq!(tool.preview_tiles(&ground, Tool::Lasso).len(), 2);
    }

    #[test]
    fn test_rectangle_preview() {
        let ground = Ground::new(8, 8).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::new();
        let mut driver = Driver::new(Modifiers::NONE);

        driver.frame(&mut tool, &ground, &mut selection, Tool::Rectangle, true, center(&ground, 0, 0));
        driver.frame(&mut tool, &ground, &mut selection, Tool::Rectangle, true, center(&ground, 2, 0));
        assert_eq!(tool.preview_tiles(&ground, Tool::Rectangle).len(), 3);
        assert_eq!(
            tool.drag_rect(&ground),
            Some(TileRect::new(IVec2::new(0, 0), IVec2::new(3, 1)))
        );
        assert!(selection.is_empty());

        driver.frame(&mut tool, &ground, &mut selection, Tool::Rectangle, false, center(&ground, 2, 0));
        assert_eq!(tool.drag_rect(&ground), None);
    }

    fn lasso_path(ground: &Ground, corners: &[(i32, i32)]) -> Vec<Vec3> {
        corners.iter().map(|&(x, y)| center(ground, x, y)).collect()
    }

    #[test]
    fn test_ctrl_lasso_subtracts() {
        let ground = Ground::new(10, 10).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::from_tiles(
            (0..10).flat_map(|x| (0..10).map(move |y| IVec2::new(x, y))),
        );

        let path = lasso_path(&ground, &[(2, 2), (6, 2), (6, 6), (2, 6)]);
        let changed = Driver::new(Modifiers::CTRL).drag(&mut tool, &ground, &mut selection, Tool::Lasso, &path);
        assert!(changed);

        // Interior and traced tiles go, everything outside the loop stays
        for tile in [(4, 4), (3, 5), (2, 2), (6, 2), (6, 6), (2, 6)] {
            assert!(!selection.contains(IVec2::new(tile.0, tile.1)), "{tile:?}");
        }
        for tile in [(0, 0), (9, 9), (8, 4), (4, 8), (1, 1)] {
            assert!(selection.contains(IVec2::new(tile.0, tile.1)), "{tile:?}");
        }
        assert!(selection.len() >= 75 && selection.len() < 100);
    }

    #[test]
    fn test_shift_lasso_adds() {
        let ground = Ground::new(10, 10).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::from_tiles([IVec2::new(8, 8)]);

        let path = lasso_path(&ground, &[(1, 1), (5, 1), (5, 5), (1, 5)]);
        Driver::new(Modifiers::SHIFT).drag(&mut tool, &ground, &mut selection, Tool::Lasso, &path);

        assert!(selection.contains(IVec2::new(8, 8)));
        for tile in [(3, 3), (1, 1), (5, 1), (5, 5), (1, 5)] {
            assert!(selection.contains(IVec2::new(tile.0, tile.1)), "{tile:?}");
        }
        assert!(!selection.contains(IVec2::new(0, 0)));
        assert!(!selection.contains(IVec2::new(7, 7)));
    }

    #[test]
    fn test_doodle_leaves_selection() {
        let ground = Ground::new(8, 8).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::from_tiles([IVec2::new(1, 1)]);

        let changed = Driver::new(Modifiers::NONE).drag(
            &mut tool,
            &ground,
            &mut selection,
            Tool::Doodle,
            &[center(&ground, 0, 0), center(&ground, 3, 3)],
        );
        assert!(!changed);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_unhovered_press_ignored() {
        let ground = Ground::new(8, 8).unwrap();
        let mut tool = SelectTool::new();
        let mut selection = TileSelection::new();

        let mut button = ButtonState::new();
        button.update(true);
        let mut input = FrameInput::new(Ray::new(Vec3::Y, Vec3::NEG_Y), Mat4::IDENTITY).with_button(button);
        input.hovered = false;
        tool.update(&ground, &mut selection, &input, Some(center(&ground, 1, 1)), Tool::Rectangle);
        assert!(!tool.is_dragging());
    }
}
