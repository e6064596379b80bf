//! Ground model: the heightmap + tile grid of one map.
//!
//! A ground is `width x height` cubes. Each cube stores four corner heights
//! and up to three face tiles (top, front, side). Tiles, textures and
//! lightmaps live in shared tables and are referenced by index, `-1`
//! meaning "none".

pub mod tile;
pub mod cube;
pub mod gnd;
pub mod dirty;
pub mod quadtree;

pub use tile::{Tile, Texture, Lightmap};
pub use cube::{Cube, Face};
pub use gnd::Ground;
pub use dirty::{ChunkCoord, DirtyChunks};
pub use quadtree::{GroundQuadTree, QuadNode};

use thiserror::Error;

/// World units per tile along X and Z
pub const TILE_SIZE: f32 = 10.0;

/// Tiles per side of a render chunk
pub const CHUNK_TILES: i32 = 21;

/// Sentinel for "no tile / no texture / no lightmap"
pub const NONE_INDEX: i32 = -1;

/// Errors from ground mutations that validate their input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GroundError {
    #[error("invalid ground dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("cube ({x}, {y}) is outside the ground")]
    OutOfBounds { x: i32, y: i32 },

    #[error("tile id {0} does not exist")]
    InvalidTileId(i32),

    #[error("texture index {0} does not exist")]
    InvalidTextureIndex(i32),

    #[error("lightmap index {0} does not exist")]
    InvalidLightmapIndex(i32),

    #[error("corner index {0} out of range (0-3)")]
    InvalidCorner(usize),
}
