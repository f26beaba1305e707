use std::collections::BTreeSet;

use crate::core::{IVec2, SnapshotError};
use crate::domain::ElementCatalog;
use crate::systems::physics::BodyHandle;

use super::{Cell, ChunkCoord, DirtyRect, CHUNK_AREA, CHUNK_SIZE};

/// Fixed-size tile of the grid: cells, dirty rect and the chunk's static collider body.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    cells: Vec<Cell>,
    pub(crate) dirty: DirtyRect,
    collider: Option<BodyHandle>,
    collider_stale: bool,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, ambient_temp: f32, phase: bool) -> Self {
        Self {
            coord,
            cells: vec![Cell::empty(ambient_temp, phase); CHUNK_AREA],
            dirty: DirtyRect::EMPTY,
            collider: None,
            collider_stale: false,
        }
    }

    /// Rebuild a chunk from snapshot parts. The collider handle is never part of a snapshot,
    /// so the chunk comes back stale.
    pub fn from_parts(coord: ChunkCoord, cells: Vec<Cell>, dirty: DirtyRect) -> Result<Self, SnapshotError> {
        if cells.len() != CHUNK_AREA {
            return Err(SnapshotError::CellCount { expected: CHUNK_AREA, found: cells.len() });
        }
        let mut clamped = DirtyRect::EMPTY;
        if !dirty.is_empty() {
            clamped.include(dirty.min_x, dirty.min_y, dirty.max_x, dirty.max_y);
        }
        Ok(Self { coord, cells, dirty: clamped, collider: None, collider_stale: true })
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn index(local: IVec2) -> usize {
        debug_assert!(local.x >= 0 && local.x < CHUNK_SIZE && local.y >= 0 && local.y < CHUNK_SIZE);
        (local.y * CHUNK_SIZE + local.x) as usize
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, local: IVec2) -> &Cell {
        &self.cells[Self::index(local)]
    }

    #[inline]
    pub fn cell_mut(&mut self, local: IVec2) -> &mut Cell {
        &mut self.cells[Self::index(local)]
    }

    pub fn dirty_rect(&self) -> DirtyRect {
        self.dirty
    }

    /// Snapshot the rect to visit this tick, then pull the live rect in by `border`.
    pub fn take_work_rect(&mut self, border: i32) -> DirtyRect {
        let work = self.dirty;
        self.dirty.shrink(border);
        work
    }

    /// Re-arm the grid-owned cells inside `rect` for a pass whose phase is `!stale`. Cells
    /// that sat outside every work rect keep whatever bit they had, so this runs before any
    /// chunk of the pass is scanned.
    pub fn reset_updated(&mut self, rect: DirtyRect, stale: bool) {
        if rect.is_empty() {
            return;
        }
        for y in rect.min_y..=rect.max_y {
            let row = (y * CHUNK_SIZE) as usize;
            for cell in &mut self.cells[row + rect.min_x as usize..=row + rect.max_x as usize] {
                if !cell.is_rigid() {
                    cell.updated = stale;
                }
            }
        }
    }

    pub fn collider(&self) -> Option<BodyHandle> {
        self.collider
    }

    pub(crate) fn set_collider(&mut self, handle: Option<BodyHandle>) {
        self.collider = handle;
    }

    pub fn collider_stale(&self) -> bool {
        self.collider_stale
    }

    pub fn mark_collider_stale(&mut self) {
        self.collider_stale = true;
    }

    pub(crate) fn clear_collider_stale(&mut self) {
        self.collider_stale = false;
    }

    /// Local coordinates of grid-owned cells that belong in the static collider.
    pub fn collidable_cells(&self, catalog: &ElementCatalog) -> BTreeSet<IVec2> {
        let mut out = BTreeSet::new();
        for y in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let cell = &self.cells[(y * CHUNK_SIZE + x) as usize];
                if !cell.is_rigid() && catalog.is_collidable(cell.element) {
                    out.insert(IVec2::new(x, y));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{BodyId, Owner};

    #[test]
    fn reset_touches_only_grid_cells_inside_the_rect() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 20.0, true);
        chunk.cell_mut(IVec2::new(3, 3)).owner = Owner::Body(BodyId(1));
        let rect = DirtyRect { min_x: 2, min_y: 2, max_x: 4, max_y: 4 };
        chunk.reset_updated(rect, false);

        assert!(!chunk.cell(IVec2::new(2, 2)).updated);
        assert!(!chunk.cell(IVec2::new(4, 4)).updated);
        assert!(chunk.cell(IVec2::new(3, 3)).updated);
        assert!(chunk.cell(IVec2::new(5, 4)).updated);
        assert!(chunk.cell(IVec2::new(2, 1)).updated);
    }

    #[test]
    fn snapshot_parts_are_validated() {
        let cells = vec![Cell::empty(20.0, false); CHUNK_AREA - 1];
        assert!(matches!(
            Chunk::from_parts(ChunkCoord::new(0, 0), cells, DirtyRect::EMPTY),
            Err(SnapshotError::CellCount { .. })
        ));

        let cells = vec![Cell::empty(20.0, false); CHUNK_AREA];
        let wild = DirtyRect { min_x: -5, min_y: 3, max_x: 99, max_y: 4 };
        let chunk = Chunk::from_parts(ChunkCoord::new(0, 0), cells, wild).unwrap();
        assert_eq!(chunk.dirty_rect(), DirtyRect { min_x: 0, min_y: 3, max_x: CHUNK_SIZE - 1, max_y: 4 });
        assert!(chunk.collider_stale());
    }
}
