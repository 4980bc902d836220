//! Wall synthesis from walkable/void adjacency.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, Pos};

use super::grid::TileGrid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// North faces decreasing `z`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::East => 0b0010,
            Self::South => 0b0100,
            Self::West => 0b1000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallEdge {
    pub pos: Pos,
    pub side: Side,
}

/// Per-cell wall edge masks for a grid of the same size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallSet {
    width: usize,
    depth: usize,
    masks: Vec<u8>,
}

impl WallSet {
    pub fn has(&self, pos: Pos, side: Side) -> bool {
        self.mask(pos) & side.bit() != 0
    }

    pub fn mask(&self, pos: Pos) -> u8 {
        if pos.x < 0 || pos.z < 0 || pos.x as usize >= self.width || pos.z as usize >= self.depth {
            return 0;
        }
        self.masks[(pos.z as usize) * self.width + (pos.x as usize)]
    }

    pub fn len(&self) -> usize {
        self.masks.iter().map(|mask| mask.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.iter().all(|&mask| mask == 0)
    }

    /// Edges in row-major cell order, sides in [`Side::ALL`] order.
    pub fn edges(&self) -> impl Iterator<Item = WallEdge> + '_ {
        self.masks.iter().enumerate().filter(|(_, mask)| **mask != 0).flat_map(
            move |(index, &mask)| {
                let pos = Pos { z: (index / self.width) as i32, x: (index % self.width) as i32 };
                Side::ALL
                    .into_iter()
                    .filter(move |side| mask & side.bit() != 0)
                    .map(move |side| WallEdge { pos, side })
            },
        )
    }
}

/// One pass over the grid: each walkable cell gets a wall on every side whose
/// neighbor is not walkable (void, an already promoted wall, or off the canvas).
pub fn derive_walls(grid: &TileGrid) -> WallSet {
    let mut masks = vec![0_u8; grid.width() * grid.depth()];
    for (index, pos) in grid.positions().enumerate() {
        if !grid.get(pos).is_walkable() {
            continue;
        }
        for side in Side::ALL {
            let (dx, dz) = side.offset();
            if !grid.get(pos.offset(dx, dz)).is_walkable() {
                masks[index] |= side.bit();
            }
        }
    }
    WallSet { width: grid.width(), depth: grid.depth(), masks }
}

/// Promotes the void cell behind every wall edge to [`Cell::Wall`].
pub fn apply_wall_cells(grid: &mut TileGrid, walls: &WallSet) {
    for edge in walls.edges() {
        let (dx, dz) = edge.side.offset();
        let behind = edge.pos.offset(dx, dz);
        if grid.get(behind) == Cell::Void {
            grid.set(behind, Cell::Wall);
        }
    }
}
