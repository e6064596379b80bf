//! An open map and the views editing it.
//!
//! A [`Map`] owns the ground, the tile selection and the cached quadtree.
//! Each [`MapView`] keeps its own tool options and drag state, so several
//! views can edit one map.

pub mod config;
pub mod view;

pub use config::EditorConfig;
pub use view::{MapView, ViewFrame};

use log::info;

use crate::core::types::IVec2;
use crate::core::{Error, Result};
use crate::ground::{Ground, GroundQuadTree};
use crate::selection::TileSelection;

/// Shared document state of one map
#[derive(Debug)]
pub struct Map {
    pub name: String,
    pub ground: Ground,
    pub selection: TileSelection,
    quadtree: Option<GroundQuadTree>,
}

impl Map {
    pub fn new(name: impl Into<String>, ground: Ground) -> Self {
        Self {
            name: name.into(),
            ground,
            selection: TileSelection::new(),
            quadtree: None,
        }
    }

    /// Quadtree built by the last save, if any
    pub fn quadtree(&self) -> Option<&GroundQuadTree> {
        self.quadtree.as_ref()
    }

    pub fn rebuild_quadtree(&mut self, depth: u8) -> &GroundQuadTree {
        self.quadtree.insert(GroundQuadTree::build(&self.ground, depth))
    }

    /// Replace the selection with `tiles`. Fails without touching the
    /// selection if any tile is off the ground.
    pub fn select_tiles(&mut self, tiles: impl IntoIterator<Item = IVec2>) -> Result<()> {
        let tiles: Vec<IVec2> = tiles.into_iter().collect();
        if let Some(bad) = tiles.iter().find(|t| !self.ground.in_map(**t)) {
            return Err(Error::Selection(format!(
                "tile ({}, {}) is outside the {}x{} ground",
                bad.x,
                bad.y,
                self.ground.width(),
                self.ground.height()
            )));
        }
        self.selection = TileSelection::from_tiles(tiles);
        Ok(())
    }

    pub fn select_all(&mut self) {
        let (w, h) = (self.ground.width(), self.ground.height());
        self.selection = TileSelection::from_tiles(
            (0..w).flat_map(|x| (0..h).map(move |y| IVec2::new(x, y))),
        );
    }

    /// Check the ground and refresh derived data before writing the map out
    pub fn prepare_save(&mut self, config: &EditorConfig) -> Result<()> {
        self.ground.validate()?;
        if config.recalculate_quadtree_on_save {
            let nodes = self.rebuild_quadtree(config.quadtree_depth).node_count();
            info!("Rebuilt quadtree for '{}' ({} nodes)", self.name, nodes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_map() -> Map {
        Map::new("prontera", Ground::new(8, 4).unwrap())
    }

    #[test]
    fn test_select_tiles_rejects_off_map() {
        let mut map = test_map();
        map.select_tiles([IVec2::new(1, 1)]).unwrap();

        let result = map.select_tiles([IVec2::new(2, 2), IVec2::new(8, 0)]);
        assert!(matches!(result, Err(Error::Selection(_))));
        assert_eq!(map.selection.as_slice(), &[IVec2::new(1, 1)]);
    }

    #[test]
    fn test_select_all() {
        let mut map = test_map();
        map.select_all();
        assert_eq!(map.selection.len(), 32);
    }

    #[test]
    fn test_prepare_save_rebuilds_quadtree() {
        let mut map = test_map();
        assert!(map.quadtree().is_none());

        let config = EditorConfig { quadtree_depth: 2, ..Default::default() };
        map.prepare_save(&config).unwrap();
        assert_eq!(map.quadtree().unwrap().node_count(), 21);

        let mut skip = test_map();
        let config = EditorConfig { recalculate_quadtree_on_save: false, ..Default::default() };
        skip.prepare_save(&config).unwrap();
        assert!(skip.quadtree().is_none());
    }
}
