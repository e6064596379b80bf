//! Serialized form of copied tiles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::IVec2;
use crate::ground::{Ground, Lightmap, Texture, Tile, NONE_INDEX};
use crate::selection::TileSelection;
use super::ClipboardError;

/// One copied cube
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubeRecord {
    pub heights: [f32; 4],
    /// Tile ids in the source ground, -1 = no tile
    pub tile_ids: [i32; 3],
    /// Offset from the selection centroid
    pub pos: [i32; 2],
}

impl CubeRecord {
    pub fn position(&self) -> IVec2 {
        IVec2::from_array(self.pos)
    }
}

/// Copied cubes plus the shared records they reference, keyed by their
/// index in the source ground.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardDocument {
    pub cubes: Vec<CubeRecord>,
    pub tiles: BTreeMap<i32, Tile>,
    pub textures: BTreeMap<i32, Texture>,
    pub lightmaps: BTreeMap<i32, Lightmap>,
}

impl ClipboardDocument {
    /// Collect the selected cubes and everything they reference
    pub fn from_selection(ground: &Ground, selection: &TileSelection) -> Result<Self, ClipboardError> {
        let center = selection.centroid().ok_or(ClipboardError::EmptySelection)?;
        let mut document = Self::default();

        for tile in selection.iter() {
            let cube = ground
                .get_cube(tile.x, tile.y)
                .ok_or(ClipboardError::OutsideGround { x: tile.x, y: tile.y })?;
            document.cubes.push(CubeRecord {
                heights: cube.heights,
                tile_ids: cube.tile_ids,
                pos: (tile - center).to_array(),
            });

            for &id in &cube.tile_ids {
                if id == NONE_INDEX {
                    continue;
                }
                let record = ground.tile(id).ok_or(ClipboardError::MissingTile(id))?;
                if record.has_texture() {
                    let texture = ground
                        .texture(record.texture_index)
                        .ok_or(ClipboardError::MissingTexture(record.texture_index))?;
                    document.textures.insert(record.texture_index, texture.clone());
                }
                if record.has_lightmap() {
                    let lightmap = ground
                        .lightmap(record.lightmap_index)
                        .ok_or(ClipboardError::MissingLightmap(record.lightmap_index))?;
                    document.lightmaps.insert(record.lightmap_index, lightmap.clone());
                }
                document.tiles.insert(id, record.clone());
            }
        }
        Ok(document)
    }

    /// Parse a document
    pub fn parse(text: &str) -> Result<Self, ClipboardError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ClipboardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }
}
