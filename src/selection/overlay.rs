//! Highlight geometry for selected and previewed tiles

use bytemuck::{Pod, Zeroable};

use crate::core::types::IVec2;
use crate::ground::Ground;

/// Lift applied per unit of camera distance so the highlight does not
/// z-fight with the ground
pub const OVERLAY_LIFT: f32 = 0.002;

/// One vertex of the highlight mesh. Must match the overlay shader input.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Corner order of the two triangles drawn per tile
const TRIANGLE_CORNERS: [usize; 6] = [2, 0, 3, 0, 3, 1];

/// Triangle list covering `tiles`, following the ground surface.
///
/// Tiles outside the ground are skipped.
pub fn tile_overlay(
    ground: &Ground,
    tiles: impl IntoIterator<Item = IVec2>,
    camera_distance: f32,
) -> Vec<OverlayVertex> {
    let lift = OVERLAY_LIFT * camera_distance;
    let mut vertices = Vec::new();
    for tile in tiles {
        let Some(cube) = ground.get_cube(tile.x, tile.y) else {
            continue;
        };
        for corner in TRIANGLE_CORNERS {
            let mut position = ground.get_pos(tile.x, tile.y, corner);
            position.y += lift;
            vertices.push(OverlayVertex {
                position: position.to_array(),
                normal: cube.normals()[corner].to_array(),
            });
        }
    }
    vertices
}
