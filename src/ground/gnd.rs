//! The ground grid: cubes, shared tile tables, normals and ray casting.

use std::collections::HashSet;

use log::debug;

use crate::core::types::{IVec2, Vec2, Vec3};
use crate::math::{Aabb, Ray};
use super::cube::{Cube, Face, CORNER_OFFSETS};
use super::dirty::{ChunkCoord, DirtyChunks};
use super::tile::{Lightmap, Texture, Tile};
use super::{GroundError, CHUNK_TILES, NONE_INDEX, TILE_SIZE};

/// Padding applied to chunk bounds so flat chunks keep a non-zero slab
const BOUNDS_EPSILON: f32 = 0.01;

/// Heightmap and tile grid of one map.
///
/// Cubes are addressed as `(x, y)` with `0 <= x < width`, `0 <= y < height`.
/// World X grows with `x`; world Z shrinks as `y` grows. Cube `(x, y)`
/// spans X in `[10x, 10x + 10]` and Z in `[10(height - y), 10(height - y) + 10]`.
#[derive(Debug)]
pub struct Ground {
    width: i32,
    height: i32,
    /// Cubes stored column-major: index = x * height + y
    cubes: Vec<Cube>,
    tiles: Vec<Tile>,
    textures: Vec<Texture>,
    lightmaps: Vec<Lightmap>,
    /// Conservative world bounds per render chunk, for ray casting
    chunk_bounds: Vec<Aabb>,
    dirty: DirtyChunks,
}

impl Ground {
    /// Create a flat ground with no tiles
    pub fn new(width: i32, height: i32) -> Result<Self, GroundError> {
        if width <= 0 || height <= 0 {
            return Err(GroundError::InvalidDimensions { width, height });
        }

        let mut ground = Self {
            width,
            height,
            cubes: vec![Cube::default(); (width * height) as usize],
            tiles: Vec::new(),
            textures: Vec::new(),
            lightmaps: Vec::new(),
            chunk_bounds: Vec::new(),
            dirty: DirtyChunks::new(),
        };
        ground.recalculate_bounds();
        ground.recalculate_all_normals();
        Ok(ground)
    }

    /// Create a flat ground whose every top face uses one tile of `texture`
    pub fn new_textured(width: i32, height: i32, texture: Texture) -> Result<Self, GroundError> {
        let mut ground = Self::new(width, height)?;
        let texture_index = ground.add_texture(texture);
        let tile = ground.add_tile(Tile::new(texture_index))?;
        for cube in &mut ground.cubes {
            cube.tile_ids[Face::Top.index()] = tile;
        }
        Ok(ground)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check whether (x, y) is a cube of this ground
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn in_map(&self, tile: IVec2) -> bool {
        self.contains(tile.x, tile.y)
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (x * self.height + y) as usize
    }

    /// Cube at (x, y). Panics when out of bounds; selections only ever
    /// hold validated coordinates.
    pub fn cube(&self, x: i32, y: i32) -> &Cube {
        assert!(self.contains(x, y), "cube ({x}, {y}) outside {}x{} ground", self.width, self.height);
        &self.cubes[self.index(x, y)]
    }

    pub fn get_cube(&self, x: i32, y: i32) -> Option<&Cube> {
        self.contains(x, y).then(|| &self.cubes[self.index(x, y)])
    }

    fn cube_mut(&mut self, x: i32, y: i32) -> &mut Cube {
        assert!(self.contains(x, y), "cube ({x}, {y}) outside {}x{} ground", self.width, self.height);
        let index = self.index(x, y);
        &mut self.cubes[index]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn lightmaps(&self) -> &[Lightmap] {
        &self.lightmaps
    }

    /// Tile by id, None for -1 or out of range
    pub fn tile(&self, id: i32) -> Option<&Tile> {
        usize::try_from(id).ok().and_then(|i| self.tiles.get(i))
    }

    pub fn texture(&self, index: i32) -> Option<&Texture> {
        usize::try_from(index).ok().and_then(|i| self.textures.get(i))
    }

    pub fn lightmap(&self, index: i32) -> Option<&Lightmap> {
        usize::try_from(index).ok().and_then(|i| self.lightmaps.get(i))
    }

    pub fn add_texture(&mut self, texture: Texture) -> i32 {
        self.textures.push(texture);
        self.textures.len() as i32 - 1
    }

    pub fn add_lightmap(&mut self, lightmap: Lightmap) -> i32 {
        self.lightmaps.push(lightmap);
        self.lightmaps.len() as i32 - 1
    }

    /// Append a tile after checking its texture and lightmap references
    pub fn add_tile(&mut self, tile: Tile) -> Result<i32, GroundError> {
        self.check_texture(tile.texture_index)?;
        self.check_lightmap(tile.lightmap_index)?;
        self.tiles.push(tile);
        Ok(self.tiles.len() as i32 - 1)
    }

    fn check_tile_id(&self, id: i32) -> Result<(), GroundError> {
        if id == NONE_INDEX || self.tile(id).is_some() {
            Ok(())
        } else {
            Err(GroundError::InvalidTileId(id))
        }
    }

    fn check_texture(&self, index: i32) -> Result<(), GroundError> {
        if index == NONE_INDEX || self.texture(index).is_some() {
            Ok(())
        } else {
            Err(GroundError::InvalidTextureIndex(index))
        }
    }

    fn check_lightmap(&self, index: i32) -> Result<(), GroundError> {
        if index == NONE_INDEX || self.lightmap(index).is_some() {
            Ok(())
        } else {
            Err(GroundError::InvalidLightmapIndex(index))
        }
    }

    fn check_cube(&self, x: i32, y: i32) -> Result<(), GroundError> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(GroundError::OutOfBounds { x, y })
        }
    }

    /// Verify every cross reference of the grid and its tables
    pub fn validate(&self) -> Result<(), GroundError> {
        for cube in &self.cubes {
            for &id in &cube.tile_ids {
                self.check_tile_id(id)?;
            }
        }
        for tile in &self.tiles {
            self.check_texture(tile.texture_index)?;
            self.check_lightmap(tile.lightmap_index)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// World position of one corner of cube (x, y)
    pub fn get_pos(&self, x: i32, y: i32, corner: usize) -> Vec3 {
        let (ox, oz) = CORNER_OFFSETS[corner];
        Vec3::new(
            TILE_SIZE * x as f32 + ox,
            -self.cube(x, y).heights[corner],
            TILE_SIZE * (self.height - y) as f32 + oz,
        )
    }

    /// Tile coordinate under a world-space point. The result may lie
    /// outside the ground.
    pub fn tile_at(&self, point: Vec3) -> IVec2 {
        IVec2::new(
            (point.x / TILE_SIZE).floor() as i32,
            self.height - (point.z / TILE_SIZE).floor() as i32,
        )
    }

    /// World bounds over all cube corners.
    ///
    /// Conservative: height writes only ever grow the chunk bounds, so
    /// lowered terrain stays enclosed but loose until `recalculate_bounds`.
    pub fn world_bounds(&self) -> Aabb {
        self.chunk_bounds
            .iter()
            .fold(Aabb::empty(), |acc, b| acc.merged(b))
    }

    fn chunks_y(&self) -> i32 {
        (self.height + CHUNK_TILES - 1) / CHUNK_TILES
    }

    fn chunks_x(&self) -> i32 {
        (self.width + CHUNK_TILES - 1) / CHUNK_TILES
    }

    fn chunk_slot(&self, coord: ChunkCoord) -> usize {
        (coord.x * self.chunks_y() + coord.y) as usize
    }

    fn cube_bounds(&self, x: i32, y: i32) -> Aabb {
        Aabb::from_points((0..4).map(|corner| self.get_pos(x, y, corner)))
    }

    /// Rebuild the per-chunk bounds used to accelerate ray casts
    pub fn recalculate_bounds(&mut self) {
        let (chunks_x, chunks_y) = (self.chunks_x(), self.chunks_y());
        let mut bounds = Vec::with_capacity((chunks_x * chunks_y) as usize);
        for cx in 0..chunks_x {
            for cy in 0..chunks_y {
                let mut aabb = Aabb::empty();
                for (x, y) in self.chunk_tiles(ChunkCoord::new(cx, cy)) {
                    aabb = aabb.merged(&self.cube_bounds(x, y));
                }
                bounds.push(aabb.grown(BOUNDS_EPSILON));
            }
        }
        self.chunk_bounds = bounds;
    }

    fn chunk_tiles(&self, coord: ChunkCoord) -> impl Iterator<Item = (i32, i32)> + use<> {
        let x0 = coord.x * CHUNK_TILES;
        let y0 = coord.y * CHUNK_TILES;
        let x1 = (x0 + CHUNK_TILES).min(self.width);
        let y1 = (y0 + CHUNK_TILES).min(self.height);
        (x0..x1).flat_map(move |x| (y0..y1).map(move |y| (x, y)))
    }

    /// First intersection of a world-space ray with the ground surface.
    ///
    /// Chunks are visited front to back by their bounds; cubes without a
    /// top tile are skipped unless `include_empty_tiles` is set.
    pub fn ray_cast(&self, ray: &Ray, include_empty_tiles: bool) -> Option<Vec3> {
        let chunks_y = self.chunks_y();
        let mut candidates: Vec<(f32, i32)> = self
            .chunk_bounds
            .iter()
            .enumerate()
            .filter_map(|(slot, bounds)| {
                ray.intersects_aabb(bounds).map(|(t_near, _)| (t_near, slot as i32))
            })
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut best: Option<f32> = None;
        for (t_near, slot) in candidates {
            if best.is_some_and(|t| t < t_near) {
                break;
            }
            let coord = ChunkCoord::new(slot / chunks_y, slot % chunks_y);
            for (x, y) in self.chunk_tiles(coord) {
                let cube = self.cube(x, y);
                if !include_empty_tiles && cube.tile_ids[Face::Top.index()] == NONE_INDEX {
                    continue;
                }
                let c = [
                    self.get_pos(x, y, 0),
                    self.get_pos(x, y, 1),
                    self.get_pos(x, y, 2),
                    self.get_pos(x, y, 3),
                ];
                for (a, b, d) in [(c[2], c[0], c[3]), (c[0], c[3], c[1])] {
                    if let Some(t) = ray.intersect_triangle(a, b, d) {
                        if best.is_none_or(|current| t < current) {
                            best = Some(t);
                        }
                    }
                }
            }
        }
        best.map(|t| ray.at(t))
    }

    // ------------------------------------------------------------------
    // Height mutation
    // ------------------------------------------------------------------

    /// Write one corner height and reconcile normals around the cube
    pub fn set_height(&mut self, x: i32, y: i32, corner: usize, value: f32) {
        let mut heights = self.cube(x, y).heights;
        heights[corner] = value;
        self.write_heights(x, y, heights);
        self.recalculate_normals(&[IVec2::new(x, y)]);
    }

    /// Write all four corner heights and reconcile normals around the cube
    pub fn set_cube_heights(&mut self, x: i32, y: i32, heights: [f32; 4]) {
        self.write_heights(x, y, heights);
        self.recalculate_normals(&[IVec2::new(x, y)]);
    }

    /// Raw height write for batch edits. Callers must follow up with
    /// `recalculate_normals` over every tile they touched.
    pub(crate) fn write_heights(&mut self, x: i32, y: i32, heights: [f32; 4]) {
        self.cube_mut(x, y).heights = heights;
        let cube_bounds = self.cube_bounds(x, y);
        let slot = self.chunk_slot(ChunkCoord::from_tile(x, y));
        self.chunk_bounds[slot] = self.chunk_bounds[slot].merged(&cube_bounds.grown(BOUNDS_EPSILON));
        self.dirty.mark_tile(x, y);
    }

    /// Recompute face normals of `tiles`, then the smoothed corner normals
    /// of `tiles` and every in-map neighbour sharing a corner with them.
    pub fn recalculate_normals(&mut self, tiles: &[IVec2]) {
        let edited: HashSet<IVec2> = tiles.iter().copied().collect();
        for t in &edited {
            self.cube_mut(t.x, t.y).calc_normal();
        }

        let mut reconcile: HashSet<IVec2> = HashSet::with_capacity(edited.len() * 2);
        for t in &edited {
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let n = *t + IVec2::new(dx, dy);
                    if self.in_map(n) {
                        reconcile.insert(n);
                    }
                }
            }
        }

        for t in reconcile {
            if !edited.contains(&t) {
                // Neighbour shading changes; its face normal does not
                self.dirty.mark_tile(t.x, t.y);
            }
            self.calc_normals(t.x, t.y);
        }
    }

    /// Recompute every face and corner normal
    pub fn recalculate_all_normals(&mut self) {
        for cube in &mut self.cubes {
            cube.calc_normal();
        }
        for x in 0..self.width {
            for y in 0..self.height {
                self.calc_normals(x, y);
            }
        }
    }

    /// Smooth the corner normals of (x, y) over the up to four cubes that
    /// share each corner. Face normals must be current.
    pub fn calc_normals(&mut self, x: i32, y: i32) {
        let normals = self.expected_normals(x, y);
        self.cube_mut(x, y).set_normals(normals);
    }

    /// Corner normals that (x, y) should carry given current face normals
    pub fn expected_normals(&self, x: i32, y: i32) -> [Vec3; 4] {
        let mut normals = [Vec3::ZERO; 4];
        for (corner, normal) in normals.iter_mut().enumerate() {
            let sx = if corner % 2 == 0 { -1 } else { 1 };
            let sy = if corner < 2 { -1 } else { 1 };
            let mut sum = Vec3::ZERO;
            for (dx, dy) in [(0, 0), (sx, 0), (0, sy), (sx, sy)] {
                if let Some(cube) = self.get_cube(x + dx, y + dy) {
                    sum += cube.normal();
                }
            }
            *normal = sum.normalize_or_zero();
        }
        normals
    }

    // ------------------------------------------------------------------
    // Tile details
    // ------------------------------------------------------------------

    /// Point a cube face at another tile (or -1 to hide it)
    pub fn set_tile_id(&mut self, x: i32, y: i32, face: Face, tile_id: i32) -> Result<(), GroundError> {
        self.check_cube(x, y)?;
        self.check_tile_id(tile_id)?;
        self.cube_mut(x, y).tile_ids[face.index()] = tile_id;
        self.dirty.mark_tile(x, y);
        Ok(())
    }

    pub fn set_tile_texture(&mut self, tile_id: i32, texture_index: i32) -> Result<(), GroundError> {
        self.check_texture(texture_index)?;
        self.tile_mut(tile_id)?.texture_index = texture_index;
        self.mark_tile_users_dirty(tile_id);
        Ok(())
    }

    pub fn set_tile_lightmap(&mut self, tile_id: i32, lightmap_index: i32) -> Result<(), GroundError> {
        self.check_lightmap(lightmap_index)?;
        self.tile_mut(tile_id)?.lightmap_index = lightmap_index;
        self.mark_tile_users_dirty(tile_id);
        Ok(())
    }

    pub fn set_tile_color(&mut self, tile_id: i32, color: [u8; 4]) -> Result<(), GroundError> {
        self.tile_mut(tile_id)?.color = color;
        self.mark_tile_users_dirty(tile_id);
        Ok(())
    }

    pub fn set_tile_uv(&mut self, tile_id: i32, corner: usize, uv: Vec2) -> Result<(), GroundError> {
        if corner >= 4 {
            return Err(GroundError::InvalidCorner(corner));
        }
        self.tile_mut(tile_id)?.uvs[corner] = uv.clamp(Vec2::ZERO, Vec2::ONE);
        self.mark_tile_users_dirty(tile_id);
        Ok(())
    }

    fn tile_mut(&mut self, tile_id: i32) -> Result<&mut Tile, GroundError> {
        usize::try_from(tile_id)
            .ok()
            .and_then(|i| self.tiles.get_mut(i))
            .ok_or(GroundError::InvalidTileId(tile_id))
    }

    /// Tile edits are visible on every cube that references the tile
    fn mark_tile_users_dirty(&mut self, tile_id: i32) {
        let mut marked = 0usize;
        for x in 0..self.width {
            for y in 0..self.height {
                if self.cubes[self.index(x, y)].tile_ids.contains(&tile_id) {
                    self.dirty.mark_tile(x, y);
                    marked += 1;
                }
            }
        }
        debug!("Tile {} edited, {} cubes affected", tile_id, marked);
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    /// Drain the chunks touched since the last call
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkCoord> {
        self.dirty.take()
    }

    pub fn dirty(&self) -> &DirtyChunks {
        &self.dirty
    }
}
