use crate::core::IVec2;
use crate::spatial::{Cell, ChunkCoord};

use super::Grid;

impl Grid {
    /// Cell at a world position, resolving the owning chunk. `None` when the chunk is absent.
    #[inline]
    pub fn cell(&self, pos: IVec2) -> Option<&Cell> {
        self.chunks
            .get(&ChunkCoord::of(pos))
            .map(|chunk| chunk.cell(ChunkCoord::local(pos)))
    }

    #[inline]
    pub fn cell_mut(&mut self, pos: IVec2) -> Option<&mut Cell> {
        self.chunks
            .get_mut(&ChunkCoord::of(pos))
            .map(|chunk| chunk.cell_mut(ChunkCoord::local(pos)))
    }

    /// Overwrite a slot. Returns false (and writes nothing) when the chunk is absent.
    #[inline]
    pub fn set_cell(&mut self, pos: IVec2, cell: Cell) -> bool {
        match self.cell_mut(pos) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Grow the dirty rect of every chunk within `dirty_border` cells of `pos`, so a write at
    /// a chunk edge also wakes the neighboring chunk.
    pub fn mark_dirty(&mut self, pos: IVec2) {
        let m = self.dirty_border;
        let lo = ChunkCoord::of(pos.offset(-m, -m));
        let hi = ChunkCoord::of(pos.offset(m, m));
        for cy in lo.y..=hi.y {
            for cx in lo.x..=hi.x {
                let coord = ChunkCoord::new(cx, cy);
                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    let o = coord.origin();
                    chunk.dirty.include(
                        pos.x - m - o.x,
                        pos.y - m - o.y,
                        pos.x + m - o.x,
                        pos.y + m - o.y,
                    );
                }
            }
        }
    }

    pub fn mark_collider_stale(&mut self, pos: IVec2) {
        if let Some(chunk) = self.chunks.get_mut(&ChunkCoord::of(pos)) {
            chunk.mark_collider_stale();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{DirtyRect, CHUNK_SIZE};

    #[test]
    fn lookups_cross_chunk_edges() {
        let mut grid = Grid::new(2, 20.0);
        grid.ensure_chunk(ChunkCoord::new(0, 0));
        assert!(grid.cell(IVec2::new(CHUNK_SIZE, 0)).is_none());
        grid.ensure_chunk(ChunkCoord::new(1, 0));
        let right = IVec2::new(CHUNK_SIZE, 0);
        grid.cell_mut(right).unwrap().temperature = 55.0;
        assert_eq!(grid.chunk(ChunkCoord::new(1, 0)).unwrap().cell(IVec2::new(0, 0)).temperature, 55.0);
        assert!(!grid.set_cell(IVec2::new(0, -1), Cell::empty(20.0, false)));
    }

    #[test]
    fn edge_write_dirties_the_neighbor_chunk() {
        let mut grid = Grid::new(2, 20.0);
        grid.ensure_chunk(ChunkCoord::new(0, 0));
        grid.ensure_chunk(ChunkCoord::new(1, 0));
        grid.ensure_chunk(ChunkCoord::new(0, 1));

        grid.mark_dirty(IVec2::new(CHUNK_SIZE - 1, 10));

        let left = grid.chunk(ChunkCoord::new(0, 0)).unwrap().dirty_rect();
        assert_eq!(left, DirtyRect { min_x: CHUNK_SIZE - 3, min_y: 8, max_x: CHUNK_SIZE - 1, max_y: 12 });
        let right = grid.chunk(ChunkCoord::new(1, 0)).unwrap().dirty_rect();
        assert_eq!(right, DirtyRect { min_x: 0, min_y: 8, max_x: 1, max_y: 12 });
        assert!(grid.chunk(ChunkCoord::new(0, 1)).unwrap().dirty_rect().is_empty());
    }

    #[test]
    fn chunk_order_is_row_major() {
        let mut grid = Grid::new(2, 20.0);
        for coord in [ChunkCoord::new(1, 1), ChunkCoord::new(-1, 1), ChunkCoord::new(3, 0)] {
            grid.ensure_chunk(coord);
        }
        assert_eq!(
            grid.chunk_coords(),
            &[ChunkCoord::new(3, 0), ChunkCoord::new(-1, 1), ChunkCoord::new(1, 1)]
        );
    }
}
