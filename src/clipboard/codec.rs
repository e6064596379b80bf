//! Copy and paste of tile selections

use log::{info, warn};

use crate::core::types::IVec2;
use crate::ground::{Face, Ground, Lightmap, Texture, Tile, NONE_INDEX};
use crate::selection::TileSelection;
use super::{ClipboardDocument, ClipboardError};

/// A face of a pasted cube with its references resolved
#[derive(Clone, Debug, PartialEq)]
pub struct PendingFace {
    pub tile: Tile,
    pub texture: Option<Texture>,
    pub lightmap: Option<Lightmap>,
}

/// A pasted cube waiting to be placed on a ground
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCube {
    /// Offset from the copied selection's centroid
    pub pos: IVec2,
    pub heights: [f32; 4],
    /// Tile ids as they were in the source ground
    pub tile_ids: [i32; 3],
    /// Resolved top, front and side faces
    pub faces: [Option<PendingFace>; 3],
}

impl PendingCube {
    /// Grid position when the paste is anchored at `anchor`
    pub fn absolute_position(&self, anchor: IVec2) -> IVec2 {
        anchor + self.pos
    }

    pub fn face(&self, face: Face) -> Option<&PendingFace> {
        self.faces[face.index()].as_ref()
    }
}

/// Serialize the selected cubes and everything they reference
pub fn copy(ground: &Ground, selection: &TileSelection) -> Result<String, ClipboardError> {
    let document = ClipboardDocument::from_selection(ground, selection)?;
    let text = document.to_json()?;
    info!(
        "Copied {} cubes, {} tiles, {} textures, {} lightmaps",
        document.cubes.len(),
        document.tiles.len(),
        document.textures.len(),
        document.lightmaps.len()
    );
    Ok(text)
}

/// Parse clipboard text into pending cubes.
///
/// Blank text decodes to nothing. A reference to a record the document
/// does not carry rejects the whole document.
pub fn decode(text: &str) -> Result<Vec<PendingCube>, ClipboardError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    resolve(&ClipboardDocument::parse(text)?)
}

/// Resolve every cube of a parsed document
pub fn resolve(document: &ClipboardDocument) -> Result<Vec<PendingCube>, ClipboardError> {
    document
        .cubes
        .iter()
        .map(|record| -> Result<PendingCube, ClipboardError> {
            let mut faces: [Option<PendingFace>; 3] = Default::default();
            for (slot, &id) in faces.iter_mut().zip(&record.tile_ids) {
                if id > NONE_INDEX {
                    *slot = Some(resolve_face(document, id)?);
                }
            }
            Ok(PendingCube {
                pos: record.position(),
                heights: record.heights,
                tile_ids: record.tile_ids,
                faces,
            })
        })
        .collect()
}

fn resolve_face(document: &ClipboardDocument, id: i32) -> Result<PendingFace, ClipboardError> {
    let tile = document.tiles.get(&id).ok_or(ClipboardError::MissingTile(id))?;

    let lightmap = if tile.lightmap_index > NONE_INDEX {
        let lightmap = document
            .lightmaps
            .get(&tile.lightmap_index)
            .ok_or(ClipboardError::MissingLightmap(tile.lightmap_index))?;
        if !lightmap.is_well_formed() {
            return Err(ClipboardError::BadLightmap(tile.lightmap_index, lightmap.data.len()));
        }
        Some(lightmap.clone())
    } else {
        None
    };

    let texture = if tile.texture_index > NONE_INDEX {
        let texture = document
            .textures
            .get(&tile.texture_index)
            .ok_or(ClipboardError::MissingTexture(tile.texture_index))?;
        Some(texture.clone())
    } else {
        None
    };

    Ok(PendingFace {
        tile: tile.clone(),
        texture,
        lightmap,
    })
}

/// Paste from the system clipboard text. Absent, blank or malformed text
/// yields no cubes.
pub fn paste(text: Option<&str>) -> Vec<PendingCube> {
    let Some(text) = text else {
        return Vec::new();
    };
    match decode(text) {
        Ok(cubes) => {
            if !cubes.is_empty() {
                info!("Pasted {} cubes", cubes.len());
            }
            cubes
        }
        Err(e) => {
            warn!("Ignoring clipboard contents: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 ground with a lit tile, a plain tile and a side tile
    fn sample_ground() -> Ground {
        let mut ground = Ground::new(4, 4).unwrap();
        let grass = ground.add_texture(Texture::new("grass", "grass.bmp"));
        let rock = ground.add_texture(Texture::new("rock", "rock.bmp"));
        let mut lightmap = Lightmap::blank();
        lightmap.data[100] = 9;
        let lit = ground.add_lightmap(lightmap);

        let t0 = ground.add_tile(Tile::new(grass).with_lightmap(lit)).unwrap();
        let t1 = ground.add_tile(Tile::new(rock).with_color([10, 20, 30, 255])).unwrap();
        ground.set_tile_id(1, 1, Face::Top, t0).unwrap();
        ground.set_tile_id(2, 1, Face::Top, t1).unwrap();
        ground.set_tile_id(2, 1, Face::Side, t0).unwrap();
        ground.set_cube_heights(1, 1, [1.0, 2.0, 3.0, 4.0]);
        ground
    }

    fn selection() -> TileSelection {
        TileSelection::from_tiles([IVec2::new(1, 1), IVec2::new(2, 1), IVec2::new(3, 2)])
    }

    #[test]
    fn test_copy_positions_relative_to_centroid() {
        let ground = sample_ground();
        let document = ClipboardDocument::from_selection(&ground, &selection()).unwrap();
        // Centroid (6 / 3, 4 / 3) = (2, 1)
        let positions: Vec<IVec2> = document.cubes.iter().map(|c| c.position()).collect();
        assert_eq!(positions, vec![IVec2::new(-1, 0), IVec2::new(0, 0), IVec2::new(1, 1)]);
        assert_eq!(document.tiles.len(), 2);
        assert_eq!(document.textures.len(), 2);
        assert_eq!(document.lightmaps.len(), 1);
    }

    #[test]
    fn test_round_trip() {
        let ground = sample_ground();
        let text = copy(&ground, &selection()).unwrap();
        let cubes = paste(Some(&text));
        assert_eq!(cubes.len(), 3);

        let first = &cubes[0];
        assert_eq!(first.absolute_position(IVec2::new(2, 1)), IVec2::new(1, 1));
        assert_eq!(first.heights, [1.0, 2.0, 3.0, 4.0]);
        let top = first.face(Face::Top).unwrap();
        assert_eq!(top.texture.as_ref().unwrap().name, "grass");
        assert_eq!(top.lightmap.as_ref().unwrap().data[100], 9);
        assert!(first.face(Face::Front).is_none());

        let second = &cubes[1];
        let top = second.face(Face::Top).unwrap();
        assert_eq!(top.tile.color, [10, 20, 30, 255]);
        assert!(top.lightmap.is_none());
        assert_eq!(second.face(Face::Side).unwrap().texture.as_ref().unwrap().file, "grass.bmp");

        // Untextured cube comes back with no faces
        assert!(cubes[2].faces.iter().all(Option::is_none));
    }

    #[test]
    fn test_empty_and_absent_are_noops() {
        assert!(paste(None).is_empty());
        assert!(paste(Some("")).is_empty());
        assert!(paste(Some("   \n")).is_empty());
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_is_noop() {
        assert!(paste(Some("{not json")).is_empty());
        assert!(matches!(decode("[1, 2"), Err(ClipboardError::Parse(_))));
    }

    #[test]
    fn test_missing_reference_rejects_document() {
        let text = r#"{
            "cubes": [
                {"heights": [0, 0, 0, 0], "tile_ids": [-1, -1, -1], "pos": [0, 0]},
                {"heights": [0, 0, 0, 0], "tile_ids": [5, -1, -1], "pos": [1, 0]}
            ]
        }"#;
        assert!(matches!(decode(text), Err(ClipboardError::MissingTile(5))));
        assert!(paste(Some(text)).is_empty());
    }

    #[test]
    fn test_short_lightmap_rejected() {
        let mut ground = sample_ground();
        let short = ground.add_lightmap(Lightmap::from_bytes(vec![1, 2, 3]));
        let tile = ground.add_tile(Tile::new(0).with_lightmap(short)).unwrap();
        ground.set_tile_id(0, 0, Face::Top, tile).unwrap();

        let text = copy(&ground, &TileSelection::from_tiles([IVec2::new(0, 0)])).unwrap();
        assert!(matches!(decode(&text), Err(ClipboardError::BadLightmap(_, 3))));
    }

    #[test]
    fn test_copy_empty_selection() {
        let ground = sample_ground();
        assert!(matches!(
            copy(&ground, &TileSelection::new()),
            Err(ClipboardError::EmptySelection)
        ));
    }

    #[test]
    fn test_paste_never_touches_ground() {
        let mut ground = sample_ground();
        let text = copy(&ground, &selection()).unwrap();
        ground.take_dirty_chunks();
        let _ = paste(Some(&text));
        assert!(!ground.dirty().has_dirty());
    }
}
