//! Chunked hand-off of a finished grid to an external geometry builder.
//!
//! The grid is cut into `edge x edge` chunks in row-major chunk order, with the
//! last column and row clipped to the canvas. [`ChunkBuild`] is a lazy iterator:
//! each `next()` builds exactly one chunk, so a host scheduler regains control
//! between chunks and can cancel through a shared [`CancelToken`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::mapgen::{Side, TileGrid, WallEdge, WallSet};
use crate::types::{Cell, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkDescriptor {
    pub index: usize,
    pub column: usize,
    pub row: usize,
    /// World position of the chunk's top-left cell.
    pub origin: Pos,
    pub width: usize,
    pub depth: usize,
}

impl ChunkDescriptor {
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.origin.x
            && pos.z >= self.origin.z
            && ((pos.x - self.origin.x) as usize) < self.width
            && ((pos.z - self.origin.z) as usize) < self.depth
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.depth).flat_map(move |dz| {
            (0..self.width).map(move |dx| self.origin.offset(dx as i32, dz as i32))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.depth
    }
}

/// Row-major plan of clipped chunks over a `width x depth` canvas.
#[derive(Clone, Debug)]
pub struct ChunkPlan {
    width: usize,
    depth: usize,
    edge: usize,
    columns: usize,
    rows: usize,
    next: usize,
}

pub fn plan_chunks(width: usize, depth: usize, edge: usize) -> ChunkPlan {
    let edge = edge.max(1);
    ChunkPlan {
        width,
        depth,
        edge,
        columns: width.div_ceil(edge),
        rows: depth.div_ceil(edge),
        next: 0,
    }
}

impl ChunkPlan {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn descriptor(&self, index: usize) -> ChunkDescriptor {
        let column = index % self.columns;
        let row = index / self.columns;
        let x = column * self.edge;
        let z = row * self.edge;
        ChunkDescriptor {
            index,
            column,
            row,
            origin: Pos::new(x as i32, z as i32),
            width: self.edge.min(self.width - x),
            depth: self.edge.min(self.depth - z),
        }
    }
}

impl Iterator for ChunkPlan {
    type Item = ChunkDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.columns * self.rows {
            return None;
        }
        let descriptor = self.descriptor(self.next);
        self.next += 1;
        Some(descriptor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.columns * self.rows).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkPlan {}

/// Read-only window onto one chunk of the grid and its wall edges.
pub struct ChunkView<'a> {
    descriptor: ChunkDescriptor,
    grid: &'a TileGrid,
    walls: &'a WallSet,
}

impl<'a> ChunkView<'a> {
    pub fn new(descriptor: ChunkDescriptor, grid: &'a TileGrid, walls: &'a WallSet) -> Self {
        Self { descriptor, grid, walls }
    }

    pub fn descriptor(&self) -> &ChunkDescriptor {
        &self.descriptor
    }

    /// Reads a cell by world position; cells outside the chunk read as void.
    pub fn cell(&self, pos: Pos) -> Cell {
        if self.descriptor.contains(pos) { self.grid.get(pos) } else { Cell::Void }
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.descriptor.positions().map(|pos| (pos, self.grid.get(pos)))
    }

    pub fn walkable_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells().filter(|(_, cell)| cell.is_walkable()).map(|(pos, _)| pos)
    }

    /// Wall edges owned by walkable cells inside this chunk.
    pub fn wall_edges(&self) -> impl Iterator<Item = WallEdge> + '_ {
        self.descriptor.positions().flat_map(move |pos| {
            Side::ALL
                .into_iter()
                .filter(move |&side| self.walls.has(pos, side))
                .map(move |side| WallEdge { pos, side })
        })
    }
}

/// External collaborator that turns one chunk into engine geometry.
pub trait GeometryBuilder {
    type Output;

    fn build_chunk(&mut self, chunk: &ChunkView<'_>) -> Self::Output;
}

/// Shared cancellation flag, checked once per chunk boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct BuiltChunk<T> {
    pub descriptor: ChunkDescriptor,
    pub output: T,
}

pub struct ChunkBuild<'a, B> {
    grid: &'a TileGrid,
    walls: &'a WallSet,
    plan: ChunkPlan,
    builder: B,
    cancel: CancelToken,
    completed: usize,
    cancelled: bool,
}

impl<'a, B: GeometryBuilder> ChunkBuild<'a, B> {
    pub fn new(
        grid: &'a TileGrid,
        walls: &'a WallSet,
        edge: usize,
        builder: B,
        cancel: CancelToken,
    ) -> Self {
        Self {
            grid,
            walls,
            plan: plan_chunks(grid.width(), grid.depth(), edge),
            builder,
            cancel,
            completed: 0,
            cancelled: false,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.plan.columns() * self.plan.rows()
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn into_builder(self) -> B {
        self.builder
    }
}

impl<B: GeometryBuilder> Iterator for ChunkBuild<'_, B> {
    type Item = BuiltChunk<B::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        // A finished build stays finished; a late cancel does not mark it cancelled.
        if self.cancelled || self.plan.len() == 0 {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.cancelled = true;
            debug!(completed = self.completed, total = self.total(), "chunk build cancelled");
            return None;
        }

        let descriptor = self.plan.next()?;
        let view = ChunkView::new(descriptor, self.grid, self.walls);
        let output = self.builder.build_chunk(&view);
        self.completed += 1;
        Some(BuiltChunk { descriptor, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::derive_walls;

    struct CountingBuilder {
        walkable: usize,
        edges: usize,
    }

    impl GeometryBuilder for CountingBuilder {
        type Output = usize;

        fn build_chunk(&mut self, chunk: &ChunkView<'_>) -> usize {
            let walkable = chunk.walkable_cells().count();
            self.walkable += walkable;
            self.edges += chunk.wall_edges().count();
            walkable
        }
    }

    fn room_grid() -> TileGrid {
        let mut grid = TileGrid::new(20, 13);
        for z in 2..11 {
            for x in 3..17 {
                grid.set(Pos::new(x, z), Cell::Floor);
            }
        }
        grid
    }

    #[test]
    fn plan_covers_every_cell_exactly_once() {
        let (width, depth) = (37, 21);
        let mut hits = vec![0_u8; width * depth];
        let plan = plan_chunks(width, depth, 8);
        assert_eq!(plan.len(), 5 * 3);
        for chunk in plan {
            for pos in chunk.positions() {
                hits[pos.z as usize * width + pos.x as usize] += 1;
            }
        }
        assert!(hits.iter().all(|&count| count == 1));
    }

    #[test]
    fn plan_is_row_major_with_clipped_edges() {
        let chunks: Vec<ChunkDescriptor> = plan_chunks(10, 6, 4).collect();
        assert_eq!(chunks.len(), 6);
        assert_eq!((chunks[1].column, chunks[1].row), (1, 0));
        assert_eq!((chunks[3].column, chunks[3].row), (0, 1));
        assert_eq!(chunks[2].width, 2);
        assert_eq!(chunks[5].depth, 2);
        assert_eq!(chunks[5].origin, Pos::new(8, 4));
    }

    #[test]
    fn build_visits_every_walkable_cell_and_wall_edge() {
        let grid = room_grid();
        let walls = derive_walls(&grid);
        let builder = CountingBuilder { walkable: 0, edges: 0 };
        let mut build = ChunkBuild::new(&grid, &walls, 6, builder, CancelToken::new());
        let outputs: usize = build.by_ref().map(|chunk| chunk.output).sum();

        assert_eq!(outputs, grid.walkable_positions().len());
        assert_eq!(build.completed(), build.total());
        assert!(!build.was_cancelled());
        let builder = build.into_builder();
        assert_eq!(builder.walkable, grid.walkable_positions().len());
        assert_eq!(builder.edges, walls.len());
    }

    #[test]
    fn cancellation_stops_at_the_next_chunk_boundary() {
        let grid = room_grid();
        let walls = derive_walls(&grid);
        let cancel = CancelToken::new();
        let mut build = ChunkBuild::new(
            &grid,
            &walls,
            4,
            CountingBuilder { walkable: 0, edges: 0 },
            cancel.clone(),
        );

        let first = build.next().expect("first chunk builds");
        assert_eq!(first.descriptor.index, 0);
        build.next().expect("second chunk builds");
        cancel.cancel();

        assert!(build.next().is_none());
        assert!(build.next().is_none());
        assert!(build.was_cancelled());
        assert_eq!(build.completed(), 2);
        assert!(build.completed() < build.total());
    }

    #[test]
    fn cancel_after_the_last_chunk_leaves_the_build_complete() {
        let grid = room_grid();
        let walls = derive_walls(&grid);
        let cancel = CancelToken::new();
        let mut build = ChunkBuild::new(
            &grid,
            &walls,
            8,
            CountingBuilder { walkable: 0, edges: 0 },
            cancel.clone(),
        );

        let built = build.by_ref().count();
        cancel.cancel();

        assert!(build.next().is_none());
        assert_eq!(built, build.total());
        assert_eq!(build.completed(), build.total());
        assert!(!build.was_cancelled());
    }

    #[test]
    fn view_hides_cells_outside_its_chunk() {
        let grid = room_grid();
        let walls = derive_walls(&grid);
        let descriptor = plan_chunks(20, 13, 5).next().expect("first chunk");
        let view = ChunkView::new(descriptor, &grid, &walls);
        assert_eq!(view.cell(Pos::new(4, 4)), Cell::Floor);
        assert_eq!(view.cell(Pos::new(6, 4)), Cell::Void);
    }
}
