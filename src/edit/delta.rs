//! Height edit deltas for the undo stack

use crate::core::types::IVec2;
use crate::ground::{ChunkCoord, Ground};

/// Heights of one cube before and after an edit
#[derive(Clone, Debug, PartialEq)]
pub struct CubeHeights {
    pub tile: IVec2,
    pub before: [f32; 4],
    pub after: [f32; 4],
}

/// Every cube one height drag changed.
///
/// Emitted when a drag ends; the undo stack keeps it and calls
/// [`HeightDelta::revert`] or [`HeightDelta::apply`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightDelta {
    pub cubes: Vec<CubeHeights>,
}

impl HeightDelta {
    /// Build from per-cube snapshots taken before the edit, keeping only
    /// cubes whose heights differ now
    pub fn capture(ground: &Ground, before: &[(IVec2, [f32; 4])]) -> Self {
        let cubes = before
            .iter()
            .filter_map(|&(tile, before)| {
                let after = ground.get_cube(tile.x, tile.y)?.heights;
                (after != before).then_some(CubeHeights { tile, before, after })
            })
            .collect();
        Self { cubes }
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cubes.iter().map(|c| c.tile)
    }

    /// Chunks touched by this delta, sorted and deduplicated
    pub fn affected_chunks(&self) -> Vec<ChunkCoord> {
        let mut chunks: Vec<ChunkCoord> = self
            .tiles()
            .map(|t| ChunkCoord::from_tile(t.x, t.y))
            .collect();
        chunks.sort_unstable();
        chunks.dedup();
        chunks
    }

    /// Re-apply the edit
    pub fn apply(&self, ground: &mut Ground) {
        self.write(ground, |c| c.after);
    }

    /// Undo the edit
    pub fn revert(&self, ground: &mut Ground) {
        self.write(ground, |c| c.before);
    }

    fn write(&self, ground: &mut Ground, pick: impl Fn(&CubeHeights) -> [f32; 4]) {
        let tiles: Vec<IVec2> = self.tiles().filter(|t| ground.in_map(*t)).collect();
        for cube in &self.cubes {
            if ground.in_map(cube.tile) {
                ground.write_heights(cube.tile.x, cube.tile.y, pick(cube));
            }
        }
        ground.recalculate_normals(&tiles);
    }
}
