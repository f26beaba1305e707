//! Moving a body's cells between the body and the grid
//!
//! Ownership is flipped by the same write that moves a cell, never ahead of it.

use log::debug;

use crate::core::IVec2;
use crate::domain::ElementCatalog;
use crate::spatial::{Cell, ChunkCoord, Grid, Owner};

use super::{BodyState, PixelBody};

enum Reclaim {
    Own(Cell),
    Adopt(Cell),
    Evict,
}

impl PixelBody {
    /// Take the body's cells back out of the grid.
    ///
    /// A slot still holding this body's cell is copied back and cleared. A slot the grid
    /// overwrote with a solid cell is adopted as the body's new cell; any other overwrite
    /// evicts the cell from the body and flags a regenerate. Hidden cells were never written
    /// and only lose their flag. Returns the number of evicted cells.
    pub fn exit_world(&mut self, grid: &mut Grid, catalog: &ElementCatalog, idle: bool) -> usize {
        if self.state != BodyState::InWorld {
            return 0;
        }
        let id = self.id;
        let empty = Cell::empty(grid.ambient_temp(), grid.phase());
        let mut evicted: Vec<IVec2> = Vec::new();

        for (offset, bc) in self.cells.iter_mut() {
            if bc.hidden {
                bc.hidden = false;
                continue;
            }
            let pos = bc.world_pos;
            let reclaim = match grid.cell_mut(pos) {
                Some(slot) if slot.is_owned_by(id) && slot.element == bc.cell.element => {
                    let own = *slot;
                    *slot = empty;
                    Reclaim::Own(own)
                }
                Some(slot) if !slot.is_rigid() && catalog.is_collidable(slot.element) => {
                    let mut adopted = *slot;
                    *slot = empty;
                    adopted.owner = Owner::Body(id);
                    Reclaim::Adopt(adopted)
                }
                _ => Reclaim::Evict,
            };
            match reclaim {
                Reclaim::Own(cell) => {
                    bc.cell = cell;
                    if !idle {
                        grid.mark_dirty(pos);
                    }
                }
                Reclaim::Adopt(cell) => {
                    bc.cell = cell;
                    grid.mark_dirty(pos);
                    grid.mark_collider_stale(pos);
                }
                Reclaim::Evict => evicted.push(*offset),
            }
        }

        for offset in &evicted {
            self.cells.remove(offset);
        }
        if !evicted.is_empty() {
            debug!("body {} lost {} cells to the grid", id, evicted.len());
            self.needs_regenerate = true;
        }
        self.state = BodyState::Detached;
        evicted.len()
    }

    /// Write the body's cells into their current world slots. Occupied slots are left alone
    /// and the cell is hidden until the next exit. Chunks are created as needed.
    pub fn enter_world(&mut self, grid: &mut Grid, idle: bool) {
        let id = self.id;
        for bc in self.cells.values_mut() {
            let pos = bc.world_pos;
            let slot = grid.ensure_chunk(ChunkCoord::of(pos)).cell_mut(ChunkCoord::local(pos));
            if !slot.is_empty() {
                bc.hidden = true;
                continue;
            }
            bc.cell.owner = Owner::Body(id);
            *slot = bc.cell;
            bc.hidden = false;
            if !idle {
                grid.mark_dirty(pos);
            }
        }
        self.state = BodyState::InWorld;
    }

    /// Hand every cell back to the grid and empty the body. Cells land on their last world
    /// slot if it still holds this body's mirror or is empty; returns how many landed.
    pub fn release_into(&mut self, grid: &mut Grid) -> usize {
        let id = self.id;
        let mut released = 0;
        for bc in self.cells.values() {
            if bc.hidden {
                continue;
            }
            let pos = bc.world_pos;
            let slot = grid.ensure_chunk(ChunkCoord::of(pos)).cell_mut(ChunkCoord::local(pos));
            if !(slot.is_owned_by(id) || slot.is_empty()) {
                continue;
            }
            let mut cell = bc.cell;
            cell.owner = Owner::Grid;
            *slot = cell;
            grid.mark_dirty(pos);
            grid.mark_collider_stale(pos);
            released += 1;
        }
        self.cells.clear();
        self.state = BodyState::Detached;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::elements::{EL_METAL, EL_STONE, EL_WATER};
    use crate::spatial::BodyId;
    use crate::systems::physics::BodyHandle;

    fn setup() -> (Grid, ElementCatalog, PixelBody) {
        let mut grid = Grid::new(2, 20.0);
        grid.ensure_chunk(ChunkCoord::new(0, 0));
        let catalog = ElementCatalog::builtin();
        let stone = catalog.make_cell(EL_STONE, 0, false);
        let world = [(4, 4), (5, 4), (6, 4)].map(|(x, y)| (IVec2::new(x, y), stone));
        let cells = PixelBody::local_cells(IVec2::new(5, 4), world);
        let body = PixelBody::new(BodyId(7), BodyHandle(1), cells, BodyState::Detached);
        (grid, catalog, body)
    }

    #[test]
    fn enter_then_exit_round_trips_ownership() {
        let (mut grid, catalog, mut body) = setup();
        body.enter_world(&mut grid, false);
        assert_eq!(body.state(), BodyState::InWorld);
        for x in 4..=6 {
            let cell = grid.cell(IVec2::new(x, 4)).unwrap();
            assert!(cell.is_owned_by(BodyId(7)));
            assert_eq!(cell.element, EL_STONE);
        }
        assert!(!grid.chunk(ChunkCoord::new(0, 0)).unwrap().dirty_rect().is_empty());

        assert_eq!(body.exit_world(&mut grid, &catalog, false), 0);
        assert_eq!(body.state(), BodyState::Detached);
        assert_eq!(body.cell_count(), 3);
        assert!(!body.needs_regenerate());
        for x in 4..=6 {
            assert!(grid.cell(IVec2::new(x, 4)).unwrap().is_empty());
        }
    }

    #[test]
    fn idle_body_leaves_dirty_rects_alone() {
        let (mut grid, catalog, mut body) = setup();
        body.enter_world(&mut grid, true);
        body.exit_world(&mut grid, &catalog, true);
        body.enter_world(&mut grid, true);
        assert!(grid.chunk(ChunkCoord::new(0, 0)).unwrap().dirty_rect().is_empty());
    }

    #[test]
    fn occupied_destination_hides_the_cell() {
        let (mut grid, catalog, mut body) = setup();
        let water = catalog.make_cell(EL_WATER, 0, false);
        grid.set_cell(IVec2::new(6, 4), water);

        body.enter_world(&mut grid, false);
        let hidden: Vec<_> = body.cells().values().filter(|c| c.hidden).map(|c| c.world_pos).collect();
        assert_eq!(hidden, vec![IVec2::new(6, 4)]);
        assert_eq!(grid.cell(IVec2::new(6, 4)).unwrap().element, EL_WATER);

        body.exit_world(&mut grid, &catalog, false);
        assert_eq!(body.cell_count(), 3);
        assert!(body.cells().values().all(|c| !c.hidden));
        assert_eq!(grid.cell(IVec2::new(6, 4)).unwrap().element, EL_WATER);
    }

    #[test]
    fn erased_cell_is_evicted_and_flags_regenerate() {
        let (mut grid, catalog, mut body) = setup();
        body.enter_world(&mut grid, false);
        grid.set_cell(IVec2::new(4, 4), Cell::empty(20.0, false));

        assert_eq!(body.exit_world(&mut grid, &catalog, false), 1);
        assert_eq!(body.cell_count(), 2);
        assert!(body.needs_regenerate());
        assert!(!body.cells().contains_key(&IVec2::new(-1, 0)));
    }

    #[test]
    fn solid_overwrite_is_adopted() {
        let (mut grid, catalog, mut body) = setup();
        body.enter_world(&mut grid, false);
        grid.set_cell(IVec2::new(5, 4), catalog.make_cell(EL_METAL, 0, false));

        assert_eq!(body.exit_world(&mut grid, &catalog, true), 0);
        let adopted = body.cells()[&IVec2::ZERO].cell;
        assert_eq!(adopted.element, EL_METAL);
        assert!(adopted.is_owned_by(BodyId(7)));
        assert!(grid.cell(IVec2::new(5, 4)).unwrap().is_empty());
        assert!(grid.chunk(ChunkCoord::new(0, 0)).unwrap().collider_stale());
    }

    #[test]
    fn release_returns_cells_to_the_grid() {
        let (mut grid, _catalog, mut body) = setup();
        body.enter_world(&mut grid, false);
        assert_eq!(body.release_into(&mut grid), 3);
        assert!(body.is_empty());
        for x in 4..=6 {
            let cell = grid.cell(IVec2::new(x, 4)).unwrap();
            assert_eq!(cell.element, EL_STONE);
            assert!(!cell.is_rigid());
        }
    }
}
