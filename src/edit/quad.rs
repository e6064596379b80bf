//! The nine-handle quad spanned over a tile selection

use crate::core::types::{IVec2, Vec3};
use crate::ground::Ground;
use crate::math::{triangle_contains_point, triangle_height, Aabb, Ray};
use crate::selection::TileSelection;
use super::config::ToolOptions;

/// Four corners, the center, then the edge midpoints 0-1, 2-3, 0-2, 1-3
pub const HANDLE_COUNT: usize = 9;

/// Quad corners moved by each handle, bit `i` = corner `i`
pub const HANDLE_MASKS: [u8; HANDLE_COUNT] = [
    0b0001, 0b0010, 0b0100, 0b1000, 0b1111, 0b0011, 0b1100, 0b0101, 0b1010,
];

/// Triangles the quad is split into, as corner indices
pub const QUAD_TRIANGLES: [[usize; 3]; 2] = [[0, 1, 2], [1, 3, 2]];

/// Half size of a handle's pick box at full scale
const HANDLE_HALF_EXTENT: Vec3 = Vec3::new(2.0, 5.0, 2.0);

/// Scale of the handles on selections one tile thin
const SMALL_HANDLE_SCALE: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleGroup {
    Corner,
    Center,
    Edge,
}

impl HandleGroup {
    pub fn of(handle: usize) -> Self {
        match handle {
            0..=3 => HandleGroup::Corner,
            4 => HandleGroup::Center,
            _ => HandleGroup::Edge,
        }
    }

    /// Whether the options show handles of this group
    pub fn visible(self, options: &ToolOptions) -> bool {
        match self {
            HandleGroup::Corner => options.show_corner_arrows,
            HandleGroup::Center => options.show_center_arrow,
            HandleGroup::Edge => options.show_edge_arrows,
        }
    }
}

/// Control points of the selection's bounding quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeformableQuad {
    pub points: [Vec3; HANDLE_COUNT],
    /// Selection extent in tiles, max minus min
    pub span: IVec2,
}

impl DeformableQuad {
    /// Quad over the bounding box of `selection` at the current heights.
    /// None for an empty selection or one reaching off the ground.
    pub fn from_selection(ground: &Ground, selection: &TileSelection) -> Option<Self> {
        let (min, max) = selection.bounds()?;
        if !ground.in_map(min) || !ground.in_map(max) {
            return None;
        }
        let corners = [
            ground.get_pos(min.x, min.y, 0),
            ground.get_pos(max.x, min.y, 1),
            ground.get_pos(min.x, max.y, 2),
            ground.get_pos(max.x, max.y, 3),
        ];
        Some(Self::from_corners(corners, max - min))
    }

    /// Derive center and edge midpoints from four corners
    pub fn from_corners(c: [Vec3; 4], span: IVec2) -> Self {
        Self {
            points: [
                c[0],
                c[1],
                c[2],
                c[3],
                (c[0] + c[1] + c[2] + c[3]) / 4.0,
                (c[0] + c[1]) / 2.0,
                (c[2] + c[3]) / 2.0,
                (c[0] + c[2]) / 2.0,
                (c[1] + c[3]) / 2.0,
            ],
            span,
        }
    }

    pub fn corners(&self) -> [Vec3; 4] {
        [self.points[0], self.points[1], self.points[2], self.points[3]]
    }

    pub fn handle_scale(&self) -> f32 {
        if self.span.x <= 1 || self.span.y <= 1 {
            SMALL_HANDLE_SCALE
        } else {
            1.0
        }
    }

    /// Pick box of one handle
    pub fn handle_bounds(&self, handle: usize) -> Aabb {
        Aabb::from_center_half_extent(self.points[handle], HANDLE_HALF_EXTENT * self.handle_scale())
    }

    /// Nearest visible handle hit by the ray
    pub fn pick_handle(&self, ray: &Ray, options: &ToolOptions) -> Option<usize> {
        (0..HANDLE_COUNT)
            .filter(|&h| HandleGroup::of(h).visible(options))
            .filter_map(|h| ray.intersects_aabb(&self.handle_bounds(h)).map(|(t, _)| (t, h)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, h)| h)
    }
}

/// Move the corners selected by `handle` down by `offset_y`.
///
/// With `absolute_grid` set, each moved corner is snapped through the
/// doubled-offset rounding: `y + 2 * offset` is rounded to the grid and
/// mirrored around the original height.
pub fn deform_corners(original: &[Vec3; 4], handle: usize, offset_y: f32, absolute_grid: Option<f32>) -> [Vec3; 4] {
    let mask = HANDLE_MASKS[handle];
    let mut corners = *original;
    for (i, corner) in corners.iter_mut().enumerate() {
        if (mask >> i) & 1 == 0 {
            continue;
        }
        corner.y -= offset_y;
        if let Some(grid) = absolute_grid {
            corner.y += 2.0 * offset_y;
            corner.y = (corner.y / grid).round() * grid;
            corner.y = original[i].y + (original[i].y - corner.y);
        }
    }
    corners
}

/// Height change at `p` between the original and deformed quad.
///
/// Points in triangle (0, 1, 2) take that triangle's difference; points
/// in (1, 3, 2) take the second, which wins on the shared diagonal.
/// Degenerate triangles contribute nothing. None when `p` lies outside
/// both.
pub fn height_change(original: &[Vec3; 4], deformed: &[Vec3; 4], p: Vec3) -> Option<f32> {
    let mut change = None;
    for [a, b, c] in QUAD_TRIANGLES {
        if !triangle_contains_point(deformed[a], deformed[b], deformed[c], p) {
            continue;
        }
        let now = triangle_height(deformed[a], deformed[b], deformed[c], p);
        let before = triangle_height(original[a], original[b], original[c], p);
        if let (Some(now), Some(before)) = (now, before) {
            change = Some(now - before);
        }
    }
    change
}
