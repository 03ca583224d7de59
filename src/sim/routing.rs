//! Binary marble routing
//!
//! Four rows of switches form a perfect binary tree of depth 4: 15 switch
//! nodes in level order (root = 0, children of `i` are `2i+1` / `2i+2`) and 16
//! bins under the bottom row. A switch that is off sends the marble left, on
//! sends it right, so the bin reached is the row state read as a 4-bit number
//! with row 0 as the most significant bit.
//!
//! Layout (world units, z = 0):
//! - bins sit on `y = BIN_Y`, `BIN_SPACING` apart, centred on `x = 0`
//! - node rows are `VERTICAL_SPACING` apart, bottom row at `y = 0`
//! - each bottom-row node sits midway above its two bins

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Switch rows in the tree
pub const LEVELS: usize = 4;
/// Switch nodes (internal tree nodes)
pub const NODE_COUNT: usize = (1 << LEVELS) - 1;
/// Leaf bins
pub const BIN_COUNT: usize = 1 << LEVELS;
/// Index of the first node in the bottom row
const BOTTOM_ROW_START: usize = (1 << (LEVELS - 1)) - 1;

pub const VERTICAL_SPACING: f32 = 2.5;
pub const BIN_SPACING: f32 = 1.6;
pub const BIN_Y: f32 = -2.5;
/// Height the marble is dropped from
pub const ENTRY_HEIGHT: f32 = 12.0;
/// Second entry point, this far above the root centre
pub const ENTRY_CLEARANCE: f32 = 2.0;
/// Half height of a node or bin (top/bottom face offset from centre)
pub const FACE_OFFSET: f32 = 0.5;

/// On/off state of each switch row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RowState([bool; LEVELS]);

impl RowState {
    pub const fn new(rows: [bool; LEVELS]) -> Self {
        Self(rows)
    }

    /// Row state whose bin is `bin` (row 0 = most significant bit)
    pub fn from_bin(bin: u8) -> Self {
        let mut rows = [false; LEVELS];
        for (level, row) in rows.iter_mut().enumerate() {
            *row = (bin >> (LEVELS - 1 - level)) & 1 == 1;
        }
        Self(rows)
    }

    pub fn get(&self, level: usize) -> Option<bool> {
        self.0.get(level).copied()
    }

    pub fn set(&mut self, level: usize, on: bool) -> Result<()> {
        let row = self.0.get_mut(level).ok_or(ConfigError::InvalidRowLevel {
            level,
            levels: LEVELS,
        })?;
        *row = on;
        Ok(())
    }

    pub fn toggle(&mut self, level: usize) -> Result<()> {
        let on = self.get(level).ok_or(ConfigError::InvalidRowLevel {
            level,
            levels: LEVELS,
        })?;
        self.set(level, !on)
    }

    pub fn rows(&self) -> [bool; LEVELS] {
        self.0
    }

    /// Bin index by positional weight: `row0*8 + row1*4 + row2*2 + row3`
    pub fn as_bits(&self) -> u8 {
        self.0
            .iter()
            .fold(0u8, |acc, &on| (acc << 1) | u8::from(on))
    }

    /// Switch state of every node: a node is lit when its row is on
    pub fn node_states(&self) -> [bool; NODE_COUNT] {
        std::array::from_fn(|node| self.0[node_level(node)])
    }
}

/// The nodes and bin a marble visits for one row state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeWalk {
    /// Visited node per row, root first
    pub nodes: [usize; LEVELS],
    pub bin: u8,
}

/// Walk the tree from the root, branching right wherever the row is on
pub fn walk(rows: &RowState) -> TreeWalk {
    let mut nodes = [0usize; LEVELS];
    let mut node = 0;
    for level in 0..LEVELS - 1 {
        node = if rows.0[level] { 2 * node + 2 } else { 2 * node + 1 };
        nodes[level + 1] = node;
    }
    let offset = node - BOTTOM_ROW_START;
    let bin = if rows.0[LEVELS - 1] {
        2 * offset + 1
    } else {
        2 * offset
    };
    TreeWalk {
        nodes,
        bin: bin as u8,
    }
}

/// A destination bin and the points leading to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub bin_index: u8,
    pub waypoints: Vec<Vec3>,
}

/// Full fall path for the marble animation
///
/// Drop point, point just above the root, then top and bottom face of every
/// visited node, ending at the bin's top face and its interior.
pub fn route(rows: &RowState) -> Route {
    let walk = walk(rows);
    let root = node_position(0);
    let face = Vec3::new(0.0, FACE_OFFSET, 0.0);

    let mut waypoints = Vec::with_capacity(2 * LEVELS + 4);
    waypoints.push(Vec3::new(root.x, ENTRY_HEIGHT, 0.0));
    waypoints.push(Vec3::new(root.x, root.y + ENTRY_CLEARANCE, 0.0));
    for &node in &walk.nodes {
        let center = node_position(node);
        waypoints.push(center + face);
        waypoints.push(center - face);
    }
    let bin = bin_position(walk.bin as usize);
    waypoints.push(bin + face);
    waypoints.push(bin);

    Route {
        bin_index: walk.bin,
        waypoints,
    }
}

/// Centreline preview: centre of each visited node, then the bin
pub fn preview(rows: &RowState) -> Route {
    let walk = walk(rows);
    let mut waypoints: Vec<Vec3> = walk.nodes.iter().map(|&n| node_position(n)).collect();
    waypoints.push(bin_position(walk.bin as usize));
    Route {
        bin_index: walk.bin,
        waypoints,
    }
}

/// Row (depth) of a node, root = 0
#[inline]
pub fn node_level(index: usize) -> usize {
    (index + 1).ilog2() as usize
}

/// Centre of switch node `index`
pub fn node_position(index: usize) -> Vec3 {
    let level = node_level(index);
    let spacing = (1 << (LEVELS - level)) as f32 * BIN_SPACING;
    let nodes_in_level = 1usize << level;
    let index_in_level = index + 1 - nodes_in_level;

    let x = (index_in_level as f32 - (nodes_in_level as f32 - 1.0) / 2.0) * spacing;
    let y = (LEVELS - 1 - level) as f32 * VERTICAL_SPACING;
    Vec3::new(x, y, 0.0)
}

/// Centre of bin `index`
pub fn bin_position(index: usize) -> Vec3 {
    let x = (index as f32 - (BIN_COUNT as f32 - 1.0) / 2.0) * BIN_SPACING;
    Vec3::new(x, BIN_Y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_row_states() -> impl Iterator<Item = RowState> {
        (0..BIN_COUNT as u8).map(RowState::from_bin)
    }

    #[test]
    fn test_worked_examples() {
        assert_eq!(walk(&RowState::new([false; 4])).bin, 0);
        assert_eq!(walk(&RowState::new([true; 4])).bin, 15);
        assert_eq!(walk(&RowState::new([true, false, true, false])).bin, 10);
    }

    #[test]
    fn test_every_bin_reached_once() {
        let mut seen = [false; BIN_COUNT];
        for rows in all_row_states() {
            let bin = route(&rows).bin_index as usize;
            assert!(!seen[bin], "bin {bin} reached twice");
            seen[bin] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_walk_visits_one_node_per_row() {
        let rows = RowState::new([true, false, true, true]);
        let walk = walk(&rows);
        assert_eq!(walk.nodes, [0, 2, 5, 12]);
        assert_eq!(walk.bin, 11);
        for (level, &node) in walk.nodes.iter().enumerate() {
            assert_eq!(node_level(node), level);
        }
    }

    #[test]
    fn test_fall_path_shape() {
        let rows = RowState::new([false, true, false, true]);
        let path = route(&rows);
        assert_eq!(path.waypoints.len(), 12);

        let root = node_position(0);
        assert_eq!(path.waypoints[0], Vec3::new(root.x, ENTRY_HEIGHT, 0.0));
        assert_eq!(path.waypoints[1], Vec3::new(root.x, root.y + 2.0, 0.0));
        assert_eq!(path.waypoints[2], root + Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(path.waypoints[3], root - Vec3::new(0.0, 0.5, 0.0));

        let bin = bin_position(path.bin_index as usize);
        assert_eq!(path.waypoints[10], bin + Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(path.waypoints[11], bin);

        // Strictly downhill after the drop
        for pair in path.waypoints.windows(2) {
            assert!(pair[1].y < pair[0].y);
        }
    }

    #[test]
    fn test_preview_is_centreline() {
        let rows = RowState::new([true, true, false, false]);
        let preview = preview(&rows);
        let walk = walk(&rows);
        assert_eq!(preview.waypoints.len(), LEVELS + 1);
        assert_eq!(preview.waypoints[0], node_position(0));
        for (point, &node) in preview.waypoints.iter().zip(&walk.nodes) {
            assert_eq!(*point, node_position(node));
        }
        assert_eq!(
            preview.waypoints.last(),
            Some(&bin_position(walk.bin as usize))
        );
    }

    #[test]
    fn test_layout() {
        assert_eq!(node_position(0), Vec3::new(0.0, 7.5, 0.0));
        assert!((bin_position(0).x + 12.0).abs() < 1e-4);
        assert!((bin_position(15).x - 12.0).abs() < 1e-4);
        for node in BOTTOM_ROW_START..NODE_COUNT {
            let offset = node - BOTTOM_ROW_START;
            let mid = (bin_position(2 * offset).x + bin_position(2 * offset + 1).x) / 2.0;
            assert!((node_position(node).x - mid).abs() < 1e-4);
            assert_eq!(node_position(node).y, 0.0);
        }
    }

    #[test]
    fn test_row_edits() {
        let mut rows = RowState::default();
        rows.set(1, true).unwrap();
        rows.toggle(3).unwrap();
        assert_eq!(rows.rows(), [false, true, false, true]);
        assert!(matches!(
            rows.set(4, true),
            Err(ConfigError::InvalidRowLevel { level: 4, levels: 4 })
        ));
        assert!(rows.toggle(9).is_err());
    }

    #[test]
    fn test_node_states_follow_rows() {
        let rows = RowState::new([false, true, false, true]);
        let states = rows.node_states();
        assert!(!states[0]);
        assert!(states[1] && states[2]);
        assert!(states[3..7].iter().all(|&s| !s));
        assert!(states[7..].iter().all(|&s| s));
    }

    proptest! {
        #[test]
        fn prop_walk_matches_bit_weights(bits in 0u8..16) {
            let rows = RowState::from_bin(bits);
            let [b0, b1, b2, b3] = rows.rows().map(u8::from);
            let weighted = b0 * 8 + b1 * 4 + b2 * 2 + b3;
            prop_assert_eq!(walk(&rows).bin, weighted);
            prop_assert_eq!(rows.as_bits(), weighted);
            prop_assert_eq!(weighted, bits);
        }

        #[test]
        fn prop_fall_and_preview_agree(bits in 0u8..16) {
            let rows = RowState::from_bin(bits);
            prop_assert_eq!(route(&rows).bin_index, preview(&rows).bin_index);
        }
    }
}
