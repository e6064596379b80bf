//! A single ground cell

use crate::core::types::Vec3;
use super::{NONE_INDEX, TILE_SIZE};

/// Which face of a cube a tile is drawn on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Top = 0,
    Front = 1,
    Side = 2,
}

impl Face {
    pub const ALL: [Face; 3] = [Face::Top, Face::Front, Face::Side];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// X/Z offset of each corner from the cube's (left, far) grid point.
///
/// Corners 0 and 1 sit on the edge shared with row `y - 1`, corners 0 and 2
/// on the edge shared with column `x - 1`.
pub const CORNER_OFFSETS: [(f32, f32); 4] = [
    (0.0, TILE_SIZE),
    (TILE_SIZE, TILE_SIZE),
    (0.0, 0.0),
    (TILE_SIZE, 0.0),
];

/// One grid cell: four corner heights, derived normals, three face tiles.
///
/// The world-space Y of a corner is the negated stored height.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    /// Corner heights h1..h4
    pub heights: [f32; 4],
    /// Tile ids for the top, front and side faces, -1 = hidden
    pub tile_ids: [i32; 3],
    /// Face normal from this cube's own heights
    normal: Vec3,
    /// Per-corner normals averaged over the cubes sharing each corner
    normals: [Vec3; 4],
}

impl Cube {
    /// Flat cube with the given top tile and no side faces
    pub fn new(top_tile: i32) -> Self {
        Self::with_heights([0.0; 4], [top_tile, NONE_INDEX, NONE_INDEX])
    }

    /// Create a cube and derive its face normal
    pub fn with_heights(heights: [f32; 4], tile_ids: [i32; 3]) -> Self {
        let mut cube = Self {
            heights,
            tile_ids,
            normal: Vec3::Y,
            normals: [Vec3::Y; 4],
        };
        cube.calc_normal();
        cube
    }

    pub fn h1(&self) -> f32 { self.heights[0] }
    pub fn h2(&self) -> f32 { self.heights[1] }
    pub fn h3(&self) -> f32 { self.heights[2] }
    pub fn h4(&self) -> f32 { self.heights[3] }

    /// Tile id on a face, None when the face is hidden
    pub fn tile_id(&self, face: Face) -> Option<usize> {
        let id = self.tile_ids[face.index()];
        (id > NONE_INDEX).then_some(id as usize)
    }

    /// Face normal derived from the four heights
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Smoothed per-corner normals
    pub fn normals(&self) -> &[Vec3; 4] {
        &self.normals
    }

    /// Corner position relative to the cube's grid origin
    pub fn local_corner(&self, corner: usize) -> Vec3 {
        let (ox, oz) = CORNER_OFFSETS[corner];
        Vec3::new(ox, -self.heights[corner], oz)
    }

    /// Recompute the face normal from the two top triangles and reset all
    /// corner normals to it. Neighbour smoothing is done by the ground.
    pub fn calc_normal(&mut self) {
        self.normal = face_normal(&self.heights);
        self.normals = [self.normal; 4];
    }

    pub(crate) fn set_normals(&mut self, normals: [Vec3; 4]) {
        self.normals = normals;
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::new(NONE_INDEX)
    }
}

/// Normal of the top face: the normalized sum of both triangle normals
pub fn face_normal(heights: &[f32; 4]) -> Vec3 {
    let corner = |i: usize| {
        let (ox, oz) = CORNER_OFFSETS[i];
        Vec3::new(ox, -heights[i], oz)
    };
    let (p0, p1, p2, p3) = (corner(0), corner(1), corner(2), corner(3));

    let n1 = (p0 - p2).cross(p3 - p2).normalize_or_zero();
    let n2 = (p3 - p1).cross(p0 - p1).normalize_or_zero();
    let sum = n1 + n2;
    if sum.length_squared() > 0.0 {
        sum.normalize()
    } else {
        Vec3::Y
    }
}
