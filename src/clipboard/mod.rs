//! Tile clipboard: copies a selection into a self-contained JSON document
//! and turns such documents back into detached cubes for placement.
//!
//! A document holds the selected cubes, positioned relative to the
//! selection centroid, and every tile, texture and lightmap they reference
//! keyed by its index in the source ground. Pasting resolves those
//! references so the result no longer depends on the source tables.

pub mod document;
pub mod codec;

pub use document::{ClipboardDocument, CubeRecord};
pub use codec::{copy, decode, paste, resolve, PendingCube, PendingFace};

use thiserror::Error;

/// Errors from building or reading clipboard documents
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("nothing selected")]
    EmptySelection,

    #[error("selected cube ({x}, {y}) is outside the ground")]
    OutsideGround { x: i32, y: i32 },

    #[error("tile {0} is referenced but not included")]
    MissingTile(i32),

    #[error("texture {0} is referenced but not included")]
    MissingTexture(i32),

    #[error("lightmap {0} is referenced but not included")]
    MissingLightmap(i32),

    #[error("lightmap {0} has {1} bytes")]
    BadLightmap(i32, usize),

    #[error("malformed clipboard document: {0}")]
    Parse(#[from] serde_json::Error),
}
