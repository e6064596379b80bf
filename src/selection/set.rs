//! Ordered set of selected tile coordinates

use std::collections::HashSet;

use crate::core::types::IVec2;
use crate::ground::Ground;

/// Tiles picked by the user, in the order they were added.
///
/// Coordinates are unique. Adding a present tile or removing an absent one
/// leaves the set untouched.
#[derive(Clone, Debug, Default)]
pub struct TileSelection {
    tiles: Vec<IVec2>,
    lookup: HashSet<IVec2>,
}

impl TileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from tiles, dropping duplicates
    pub fn from_tiles(tiles: impl IntoIterator<Item = IVec2>) -> Self {
        let mut selection = Self::new();
        for tile in tiles {
            selection.add(tile);
        }
        selection
    }

    /// Add a tile. Returns false if it was already selected.
    pub fn add(&mut self, tile: IVec2) -> bool {
        if self.lookup.insert(tile) {
            self.tiles.push(tile);
            true
        } else {
            false
        }
    }

    /// Remove a tile. Returns false if it was not selected.
    pub fn remove(&mut self, tile: IVec2) -> bool {
        if self.lookup.remove(&tile) {
            self.tiles.retain(|t| *t != tile);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, tile: IVec2) -> bool {
        self.lookup.contains(&tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.lookup.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles.iter().copied()
    }

    pub fn as_slice(&self) -> &[IVec2] {
        &self.tiles
    }

    /// Inclusive (min, max) tile coordinates, None when empty
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        let first = *self.tiles.first()?;
        Some(self.tiles.iter().fold((first, first), |(min, max), t| {
            (min.min(*t), max.max(*t))
        }))
    }

    /// Integer average of all coordinates, truncated toward zero
    pub fn centroid(&self) -> Option<IVec2> {
        if self.tiles.is_empty() {
            return None;
        }
        let sum = self.tiles.iter().fold(IVec2::ZERO, |acc, t| acc + *t);
        Some(sum / self.tiles.len() as i32)
    }

    /// Selected tiles with at least one unselected 8-neighbour
    pub fn edge_tiles(&self) -> Vec<IVec2> {
        self.tiles
            .iter()
            .copied()
            .filter(|t| neighbours(*t).any(|n| !self.contains(n)))
            .collect()
    }

    /// Add every in-map 8-neighbour of the current selection
    pub fn grow(&mut self, ground: &Ground) -> usize {
        let candidates: Vec<IVec2> = self
            .tiles
            .iter()
            .flat_map(|t| neighbours(*t))
            .filter(|n| ground.in_map(*n))
            .collect();
        candidates.into_iter().filter(|n| self.add(*n)).count()
    }

    /// Remove every tile with an unselected or off-map 8-neighbour
    pub fn shrink(&mut self, ground: &Ground) -> usize {
        let doomed: Vec<IVec2> = self
            .tiles
            .iter()
            .copied()
            .filter(|t| neighbours(*t).any(|n| !ground.in_map(n) || !self.contains(n)))
            .collect();
        for tile in &doomed {
            self.remove(*tile);
        }
        doomed.len()
    }
}

fn neighbours(tile: IVec2) -> impl Iterator<Item = IVec2> {
    (-1..=1)
        .flat_map(|dx| (-1..=1).map(move |dy| IVec2::new(dx, dy)))
        .filter(|d| *d != IVec2::ZERO)
        .map(move |d| tile + d)
}
