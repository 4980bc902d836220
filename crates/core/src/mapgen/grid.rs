//! Dense tile grid, rasterization of rooms and corridors, and reachability.

use std::collections::VecDeque;

use crate::types::{Cell, Pos};

use super::corridors::Corridor;
use super::layout::RoomRect;
use super::model::Room;

const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Row-major `width x depth` cell array (`x` advances fastest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    depth: usize,
    cells: Vec<Cell>,
}

impl TileGrid {
    pub fn new(width: usize, depth: usize) -> Self {
        Self { width, depth, cells: vec![Cell::Void; width * depth] }
    }

    /// Returns `None` when `cells` does not hold exactly `width * depth` entries.
    pub fn from_cells(width: usize, depth: usize, cells: Vec<Cell>) -> Option<Self> {
        (width.checked_mul(depth)? == cells.len()).then_some(Self { width, depth, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.z >= 0 && (pos.x as usize) < self.width && (pos.z as usize) < self.depth
    }

    pub fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.z as usize) * self.width + (pos.x as usize))
    }

    pub fn pos_at(&self, index: usize) -> Pos {
        Pos { z: (index / self.width) as i32, x: (index % self.width) as i32 }
    }

    /// Out-of-bounds positions read as [`Cell::Void`].
    pub fn get(&self, pos: Pos) -> Cell {
        self.index(pos).map_or(Cell::Void, |index| self.cells[index])
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        if let Some(index) = self.index(pos) {
            self.cells[index] = cell;
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cells.len()).map(|index| self.pos_at(index))
    }

    pub fn walkable_positions(&self) -> Vec<Pos> {
        self.positions().filter(|&pos| self.get(pos).is_walkable()).collect()
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&candidate| candidate == cell).count()
    }

    pub fn neighbors(pos: Pos) -> impl Iterator<Item = Pos> {
        NEIGHBOR_OFFSETS.into_iter().map(move |(dx, dz)| pos.offset(dx, dz))
    }

    fn carve_rect(&mut self, rect: RoomRect) {
        for pos in rect.positions() {
            if self.get(pos) == Cell::Void {
                self.set(pos, Cell::Floor);
            }
        }
    }

    /// Walkable cells reachable from `start` through 4-neighbor steps.
    pub fn reachable_from(&self, start: Pos) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        let Some(start_index) = self.index(start) else {
            return seen;
        };
        if !self.cells[start_index].is_walkable() {
            return seen;
        }

        seen[start_index] = true;
        let mut open = VecDeque::from([start]);
        while let Some(pos) = open.pop_front() {
            for next in Self::neighbors(pos) {
                let Some(next_index) = self.index(next) else {
                    continue;
                };
                if seen[next_index] || !self.cells[next_index].is_walkable() {
                    continue;
                }
                seen[next_index] = true;
                open.push_back(next);
            }
        }
        seen
    }

    pub fn is_fully_connected(&self) -> bool {
        let Some(start) = self.positions().find(|&pos| self.get(pos).is_walkable()) else {
            return true;
        };
        let reachable = self.reachable_from(start);
        self.cells
            .iter()
            .zip(&reachable)
            .all(|(cell, &reached)| !cell.is_walkable() || reached)
    }
}

/// Carves room interiors and corridor footprints to floor, then marks doorways.
pub fn build_tile_grid(
    width: usize,
    depth: usize,
    rooms: &[Room],
    corridors: &[Corridor],
) -> TileGrid {
    let mut grid = TileGrid::new(width, depth);
    for room in rooms {
        grid.carve_rect(room.rect);
    }
    for corridor in corridors {
        for segment in corridor.segments {
            grid.carve_rect(segment);
        }
    }
    mark_doorways(&mut grid, rooms);
    grid
}

/// A doorway is a floor cell outside every room that shares an edge with a room.
fn mark_doorways(grid: &mut TileGrid, rooms: &[Room]) {
    let mut doorways = Vec::new();
    for room in rooms {
        for pos in room.rect.expanded(1).positions() {
            if room.contains(pos) || grid.get(pos) != Cell::Floor {
                continue;
            }
            if rooms.iter().any(|other| other.contains(pos)) {
                continue;
            }
            if TileGrid::neighbors(pos).any(|next| room.contains(next)) {
                doorways.push(pos);
            }
        }
    }
    for pos in doorways {
        grid.set(pos, Cell::Door);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::corridors::connect_rooms;
    use crate::mapgen::model::{RoomId, RoomKind};

    fn room(id: usize, x: usize, z: usize, width: usize, depth: usize) -> Room {
        Room {
            id: RoomId(id),
            rect: RoomRect { x, z, width, depth },
            kind: RoomKind::Chamber,
            cleared: false,
        }
    }

    #[test]
    fn rooms_and_corridors_become_walkable() {
        let rooms = vec![room(0, 2, 2, 5, 5), room(1, 20, 12, 6, 4)];
        let corridors = connect_rooms(&rooms, 1, 30, 20);
        let grid = build_tile_grid(30, 20, &rooms, &corridors);

        for room in &rooms {
            assert!(room.rect.positions().all(|pos| grid.get(pos) == Cell::Floor));
        }
        assert!(grid.is_fully_connected());
        assert_eq!(grid.get(Pos::new(0, 0)), Cell::Void);
    }

    #[test]
    fn carving_is_idempotent() {
        let rooms = vec![room(0, 2, 2, 5, 5), room(1, 20, 12, 6, 4)];
        let corridors = connect_rooms(&rooms, 3, 30, 20);
        let once = build_tile_grid(30, 20, &rooms, &corridors);

        let mut doubled_rooms = rooms.clone();
        doubled_rooms.extend(rooms.iter().cloned());
        let mut doubled_corridors = corridors.clone();
        doubled_corridors.extend(corridors.iter().cloned());
        let twice = build_tile_grid(30, 20, &doubled_rooms, &doubled_corridors);
        assert_eq!(once, twice);
    }

    #[test]
    fn corridor_entrances_are_marked_as_doors() {
        let rooms = vec![room(0, 2, 2, 5, 5), room(1, 20, 2, 5, 5)];
        let corridors = connect_rooms(&rooms, 1, 30, 12);
        let grid = build_tile_grid(30, 12, &rooms, &corridors);

        // The corridor runs along z = 4 from x = 4 to x = 22.
        assert_eq!(grid.get(Pos::new(7, 4)), Cell::Door);
        assert_eq!(grid.get(Pos::new(19, 4)), Cell::Door);
        assert_eq!(grid.get(Pos::new(12, 4)), Cell::Floor);
        assert_eq!(grid.count(Cell::Door), 2);
    }

    #[test]
    fn reachability_stops_at_void() {
        let mut grid = TileGrid::new(5, 1);
        grid.set(Pos::new(0, 0), Cell::Floor);
        grid.set(Pos::new(1, 0), Cell::Door);
        grid.set(Pos::new(3, 0), Cell::Floor);
        let reachable = grid.reachable_from(Pos::new(0, 0));
        assert_eq!(reachable, vec![true, true, false, false, false]);
        assert!(!grid.is_fully_connected());
    }

    #[test]
    fn from_cells_rejects_wrong_length() {
        assert!(TileGrid::from_cells(3, 3, vec![Cell::Void; 8]).is_none());
        assert!(TileGrid::from_cells(3, 3, vec![Cell::Void; 9]).is_some());
    }
}
