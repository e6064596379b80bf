//! Bounding-volume quadtree over the ground, stored with the map on save.
//!
//! The tree is complete: every level `l` holds `4^l` nodes laid out
//! row-major, so a depth-5 tree always has 1365 nodes. Leaves take their
//! Y extent from the corner heights of the cubes whose centers fall in
//! them; inner nodes are the union of their four children.

use crate::core::types::{Vec2, Vec3};
use crate::math::Aabb;
use super::{Ground, TILE_SIZE};

/// Depth used when saving maps
pub const DEFAULT_DEPTH: u8 = 5;

/// One node of the ground quadtree
#[derive(Clone, Debug, PartialEq)]
pub struct QuadNode {
    pub bounds: Aabb,
    pub level: u8,
    /// Indices of the four children, None on leaves
    pub children: Option<[usize; 4]>,
}

impl QuadNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Complete quadtree partitioning the ground's X/Z footprint
#[derive(Clone, Debug)]
pub struct GroundQuadTree {
    nodes: Vec<QuadNode>,
    depth: u8,
    /// World X/Z of the footprint's minimum corner
    origin: Vec2,
    /// World X/Z extent of the footprint
    size: Vec2,
}

/// Index of the first node of `level`
fn level_offset(level: u8) -> usize {
    ((1usize << (2 * level as usize)) - 1) / 3
}

impl GroundQuadTree {
    /// Build with the default save depth
    pub fn new(ground: &Ground) -> Self {
        Self::build(ground, DEFAULT_DEPTH)
    }

    /// Build a tree of `depth` levels below the root
    pub fn build(ground: &Ground, depth: u8) -> Self {
        let origin = Vec2::new(0.0, ground.get_pos(0, ground.height() - 1, 2).z);
        let size = Vec2::new(
            ground.width() as f32 * TILE_SIZE,
            ground.height() as f32 * TILE_SIZE,
        );

        let node_count = level_offset(depth + 1);
        let mut nodes = Vec::with_capacity(node_count);

        // Level by level, X/Z only; Y is filled in from the leaves upwards
        for level in 0..=depth {
            let cells = 1usize << level;
            let cell = size / cells as f32;
            for cz in 0..cells {
                for cx in 0..cells {
                    let min = origin + cell * Vec2::new(cx as f32, cz as f32);
                    let max = min + cell;
                    let children = (level < depth).then(|| {
                        let child_cells = cells * 2;
                        let base = level_offset(level + 1);
                        let at = |dx: usize, dz: usize| {
                            base + (2 * cz + dz) * child_cells + 2 * cx + dx
                        };
                        [at(0, 0), at(1, 0), at(0, 1), at(1, 1)]
                    });
                    nodes.push(QuadNode {
                        bounds: Aabb::new(
                            Vec3::new(min.x, f32::MAX, min.y),
                            Vec3::new(max.x, f32::MIN, max.y),
                        ),
                        level,
                        children,
                    });
                }
            }
        }

        let mut tree = Self { nodes, depth, origin, size };
        tree.fill_leaves(ground);
        tree.merge_upwards();
        tree
    }

    fn fill_leaves(&mut self, ground: &Ground) {
        for x in 0..ground.width() {
            for y in 0..ground.height() {
                let corners: [Vec3; 4] = std::array::from_fn(|c| ground.get_pos(x, y, c));
                let center = (corners[0] + corners[3]) * 0.5;
                if let Some(index) = self.leaf_index(center.x, center.z) {
                    let bounds = &mut self.nodes[index].bounds;
                    for corner in corners {
                        bounds.expand(corner);
                    }
                }
            }
        }

        // Leaves past the edge of a small ground stay flat at zero
        let leaves = level_offset(self.depth)..self.nodes.len();
        for node in &mut self.nodes[leaves] {
            if node.bounds.min.y > node.bounds.max.y {
                node.bounds.min.y = 0.0;
                node.bounds.max.y = 0.0;
            }
        }
    }

    fn merge_upwards(&mut self) {
        for index in (0..level_offset(self.depth)).rev() {
            if let Some(children) = self.nodes[index].children {
                let mut bounds = self.nodes[index].bounds;
                for child in children {
                    bounds = bounds.merged(&self.nodes[child].bounds);
                }
                self.nodes[index].bounds = bounds;
            }
        }
    }

    fn leaf_index(&self, x: f32, z: f32) -> Option<usize> {
        let local = (Vec2::new(x, z) - self.origin) / self.size;
        if !(0.0..=1.0).contains(&local.x) || !(0.0..=1.0).contains(&local.y) {
            return None;
        }
        let cells = 1usize << self.depth;
        let cx = ((local.x * cells as f32) as usize).min(cells - 1);
        let cz = ((local.y * cells as f32) as usize).min(cells - 1);
        Some(level_offset(self.depth) + cz * cells + cx)
    }

    /// Leaf whose X/Z cell contains the world point, None outside the ground
    pub fn leaf_at(&self, x: f32, z: f32) -> Option<&QuadNode> {
        self.leaf_index(x, z).map(|i| &self.nodes[i])
    }

    pub fn root(&self) -> &QuadNode {
        &self.nodes[0]
    }

    pub fn node(&self, index: usize) -> Option<&QuadNode> {
        self.nodes.get(index)
    }

    /// All nodes in level order
    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth_node_count() {
        let ground = Ground::new(16, 16).unwrap();
        let tree = GroundQuadTree::new(&ground);
        assert_eq!(tree.node_count(), 1365);
        assert_eq!(tree.depth(), 5);
        assert!(tree.nodes()[1364].is_leaf());
        assert!(!tree.root().is_leaf());
    }

    #[test]
    fn test_root_covers_footprint() {
        let ground = Ground::new(8, 4).unwrap();
        let tree = GroundQuadTree::build(&ground, 2);
        let root = tree.root().bounds;
        assert_eq!(root.min.x, 0.0);
        assert_eq!(root.max.x, 80.0);
        assert_eq!(root.min.z, 10.0);
        assert_eq!(root.max.z, 50.0);
    }

    #[test]
    fn test_raised_cube_propagates_to_root() {
        let mut ground = Ground::new(8, 8).unwrap();
        ground.set_cube_heights(6, 1, [-25.0; 4]);
        let tree = GroundQuadTree::build(&ground, 3);

        assert!((tree.root().bounds.max.y - 25.0).abs() < 1e-5);
        let center = (ground.get_pos(6, 1, 0) + ground.get_pos(6, 1, 3)) * 0.5;
        let leaf = tree.leaf_at(center.x, center.z).unwrap();
        assert!(leaf.is_leaf());
        assert!((leaf.bounds.max.y - 25.0).abs() < 1e-5);

        // A leaf far from the raised cube stays flat
        let far = tree.leaf_at(1.0, 75.0).unwrap();
        assert!(far.bounds.max.y.abs() < 1e-5);
    }

    #[test]
    fn test_children_inside_parents() {
        let mut ground = Ground::new(10, 10).unwrap();
        ground.set_height(3, 3, 0, 12.0);
        ground.set_height(7, 2, 3, -8.0);
        let tree = GroundQuadTree::build(&ground, 3);

        for node in tree.nodes() {
            if let Some(children) = node.children {
                for child in children {
                    let c = tree.node(child).unwrap();
                    assert_eq!(c.level, node.level + 1);
                    assert!(node.bounds.encloses(&c.bounds));
                }
            }
        }
    }

    #[test]
    fn test_leaf_at_outside() {
        let ground = Ground::new(4, 4).unwrap();
        let tree = GroundQuadTree::build(&ground, 2);
        assert!(tree.leaf_at(-1.0, 20.0).is_none());
        assert!(tree.leaf_at(20.0, 0.0).is_none());
        assert!(tree.leaf_at(40.0, 50.0).is_some());
    }
}
