//! Shared face records: tiles, textures and lightmaps

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use super::NONE_INDEX;

/// Bytes in one lightmap: 8x8 brightness followed by 8x8 RGB
pub const LIGHTMAP_BYTES: usize = 8 * 8 + 8 * 8 * 3;

/// A textured face record shared between cubes by index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Index into the ground's texture table
    pub texture_index: i32,
    /// Index into the ground's lightmap table, -1 = none
    pub lightmap_index: i32,
    /// RGBA tint, 0-255
    pub color: [u8; 4],
    /// UVs for the four corners, in cube corner order
    pub uvs: [Vec2; 4],
}

impl Tile {
    /// Create a tile with full-texture UVs and white tint
    pub fn new(texture_index: i32) -> Self {
        Self {
            texture_index,
            lightmap_index: NONE_INDEX,
            color: [255, 255, 255, 255],
            uvs: [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
            ],
        }
    }

    /// Set lightmap (builder pattern)
    pub fn with_lightmap(mut self, lightmap_index: i32) -> Self {
        self.lightmap_index = lightmap_index;
        self
    }

    /// Set tint (builder pattern)
    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn has_lightmap(&self) -> bool {
        self.lightmap_index > NONE_INDEX
    }

    pub fn has_texture(&self) -> bool {
        self.texture_index > NONE_INDEX
    }
}

/// A texture reference as stored in the map file
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Texture {
    /// Display name
    pub name: String,
    /// Path relative to the texture root
    pub file: String,
}

impl Texture {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

/// Baked lighting for one tile face.
///
/// Serialized as a base64 string so clipboard documents stay compact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lightmap {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Lightmap {
    /// Fully lit, colorless lightmap
    pub fn blank() -> Self {
        let mut data = vec![0u8; LIGHTMAP_BYTES];
        data[..64].fill(255);
        Self { data }
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Whether the payload has the expected size
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == LIGHTMAP_BYTES
    }

    /// Brightness sample at (x, y) in the 8x8 grid
    pub fn brightness(&self, x: usize, y: usize) -> Option<u8> {
        if x >= 8 || y >= 8 {
            return None;
        }
        self.data.get(y * 8 + x).copied()
    }
}

impl Default for Lightmap {
    fn default() -> Self {
        Self::blank()
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
