//! One viewport onto a map: tool options, selection drags and height
//! handles, run once per frame.

use log::debug;

use crate::clipboard::{self, PendingCube};
use crate::core::input::FrameInput;
use crate::core::types::{IVec2, Vec3};
use crate::core::Result;
use crate::edit::{DeformableQuad, HeightDelta, HeightEditEngine, Tool, ToolOptions};
use crate::selection::{tile_overlay, OverlayVertex, SelectTool};
use super::Map;

/// Everything a view produced in one frame, for drawing and undo
#[derive(Clone, Debug, Default)]
pub struct ViewFrame {
    /// Tile under the cursor
    pub hovered_tile: Option<IVec2>,
    pub selection_changed: bool,
    pub heights_changed: bool,
    /// Finished height drag, ready for an undo stack
    pub delta: Option<HeightDelta>,
    pub snap_guide: Option<Vec3>,
    pub quad: Option<DeformableQuad>,
    pub selection_overlay: Vec<OverlayVertex>,
    /// Tiles covered by the selection drag in progress
    pub preview_overlay: Vec<OverlayVertex>,
}

#[derive(Debug, Default)]
pub struct MapView {
    pub options: ToolOptions,
    select: SelectTool,
    engine: HeightEditEngine,
    hovered_tile: Option<IVec2>,
}

impl MapView {
    pub fn new(options: ToolOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn hovered_tile(&self) -> Option<IVec2> {
        self.hovered_tile
    }

    pub fn engine(&self) -> &HeightEditEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HeightEditEngine {
        &mut self.engine
    }

    pub fn select_tool(&self) -> &SelectTool {
        &self.select
    }

    /// Run one frame. Height handles get the mouse first; the selection
    /// tool only sees frames no handle claimed.
    pub fn frame(&mut self, map: &mut Map, input: &FrameInput) -> ViewFrame {
        let hit = map.ground.ray_cast(&input.mouse_ray, self.options.view_empty_tiles);
        self.hovered_tile = hit.map(|p| map.ground.tile_at(p));

        let outcome = self.engine.update(&mut map.ground, &map.selection, input, &self.options);

        let mut selection_changed = false;
        if outcome.can_select {
            selection_changed =
                self.select.update(&map.ground, &mut map.selection, input, hit, self.options.tool);
        } else if self.select.is_dragging() {
            self.select.cancel();
        }
        if selection_changed {
            debug!("Selection of '{}' now {} tiles", map.name, map.selection.len());
        }

        let preview = self.select.preview_tiles(&map.ground, self.options.tool);
        ViewFrame {
            hovered_tile: self.hovered_tile,
            selection_changed,
            heights_changed: outcome.changed,
            delta: outcome.delta,
            snap_guide: outcome.snap_guide,
            quad: outcome.quad,
            selection_overlay: tile_overlay(&map.ground, map.selection.iter(), input.camera_distance),
            preview_overlay: tile_overlay(&map.ground, preview, input.camera_distance),
        }
    }

    fn commands_enabled(&self) -> bool {
        self.options.tool != Tool::Doodle
    }

    /// Serialize the selection. None while doodling.
    pub fn copy(&self, map: &Map) -> Result<Option<String>> {
        if !self.commands_enabled() {
            return Ok(None);
        }
        Ok(Some(clipboard::copy(&map.ground, &map.selection)?))
    }

    /// Decode clipboard text into cubes ready to place. Empty while
    /// doodling or when the text is unusable.
    pub fn paste(&self, text: Option<&str>) -> Vec<PendingCube> {
        if !self.commands_enabled() {
            return Vec::new();
        }
        clipboard::paste(text)
    }

    /// Returns the number of tiles added
    pub fn grow_selection(&self, map: &mut Map) -> usize {
        if !self.commands_enabled() {
            return 0;
        }
        map.selection.grow(&map.ground)
    }

    /// Returns the number of tiles removed
    pub fn shrink_selection(&self, map: &mut Map) -> usize {
        if !self.commands_enabled() {
            return 0;
        }
        map.selection.shrink(&map.ground)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::ButtonState;
    use crate::core::types::Mat4;
    use crate::ground::Ground;
    use crate::math::Ray;

    /// A point inside tile (x, y), off its diagonal
    fn inside(map: &Map, x: i32, y: i32) -> Vec3 {
        let center = (map.ground.get_pos(x, y, 0) + map.ground.get_pos(x, y, 3)) * 0.5;
        center + Vec3::new(2.0, 0.0, 1.0)
    }

    fn down_at(p: Vec3) -> Ray {
        Ray::new(p + Vec3::Y * 50.0, Vec3::NEG_Y)
    }

    struct Session {
        map: Map,
        view: MapView,
        button: ButtonState,
    }

    impl Session {
        fn new() -> Self {
            Self {
                map: Map::new("test", Ground::new(8, 8).unwrap()),
                view: MapView::default(),
                button: ButtonState::new(),
            }
        }

        fn frame(&mut self, down: bool, ray: Ray) -> ViewFrame {
            self.button.update(down);
            let input = FrameInput::new(ray, Mat4::IDENTITY).with_button(self.button);
            self.view.frame(&mut self.map, &input)
        }
    }

    #[test]
    fn test_drag_selects_rectangle() {
        let mut s = Session::new();
        let (a, b) = (inside(&s.map, 1, 1), inside(&s.map, 2, 3));

        s.frame(true, down_at(a));
        let holding = s.frame(true, down_at(b));
        assert_eq!(holding.hovered_tile, Some(IVec2::new(2, 3)));
        assert_eq!(holding.preview_overlay.len(), 6 * 6);
        assert!(holding.selection_overlay.is_empty());

        let released = s.frame(false, down_at(b));
        assert!(released.selection_changed);
        assert_eq!(s.map.selection.len(), 6);
        assert_eq!(released.selection_overlay.len(), 6 * 6);
        assert!(released.preview_overlay.is_empty());
    }

    #[test]
    fn test_handle_drag_takes_the_mouse() {
        let mut s = Session::new();
        s.map
            .select_tiles((2..=4).flat_map(|x| (2..=4).map(move |y| IVec2::new(x, y))))
            .unwrap();
        let handle = DeformableQuad::from_selection(&s.map.ground, &s.map.selection)
            .unwrap()
            .points[4];

        let grab = s.frame(true, down_at(handle));
        assert!(grab.quad.is_some());
        assert!(!s.view.select_tool().is_dragging());

        let moved = s.frame(true, Ray::new(handle + Vec3::new(0.0, 10.0, -40.0), Vec3::Z));
        assert!(moved.heights_changed);

        let released = s.frame(false, down_at(handle));
        assert!(!released.selection_changed);
        assert_eq!(s.map.selection.len(), 9);
        let delta = released.delta.unwrap();
        assert_eq!(delta.len(), 9);
        assert!((s.map.ground.get_pos(3, 3, 0).y - 10.0).abs() < 1e-4);

        delta.revert(&mut s.map.ground);
        assert!(s.map.ground.get_pos(3, 3, 0).y.abs() < 1e-4);
    }

    #[test]
    fn test_copy_paste_and_grow() {
        let mut s = Session::new();
        s.map.select_tiles([IVec2::new(3, 3), IVec2::new(4, 3)]).unwrap();

        let text = s.view.copy(&s.map).unwrap().unwrap();
        assert_eq!(s.view.paste(Some(&text)).len(), 2);
        assert_eq!(s.view.grow_selection(&mut s.map), 10);
        assert_eq!(s.view.shrink_selection(&mut s.map), 10);
        assert_eq!(s.map.selection.len(), 2);
    }

    #[test]
    fn test_doodle_disables_commands() {
        let mut s = Session::new();
        s.view.options.tool = Tool::Doodle;
        s.map.select_tiles([IVec2::new(3, 3)]).unwrap();

        let text = MapView::default().copy(&s.map).unwrap().unwrap();
        assert!(s.view.copy(&s.map).unwrap().is_none());
        assert!(s.view.paste(Some(&text)).is_empty());
        assert_eq!(s.view.grow_selection(&mut s.map), 0);
        assert_eq!(s.view.shrink_selection(&mut s.map), 0);

        let (a, b) = (inside(&s.map, 0, 0), inside(&s.map, 1, 1));
        s.frame(true, down_at(a));
        let released = s.frame(false, down_at(b));
        assert!(!released.selection_changed);
        assert_eq!(s.map.selection.as_slice(), &[IVec2::new(3, 3)]);
    }
}
