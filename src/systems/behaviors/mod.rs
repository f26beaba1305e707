//! Behaviors - movement rules, one per element category
//!
//! Each behavior runs last in a cell's update, after reactions, heat and combustion had their
//! chance to rewrite it. Solids have no behavior.

mod fire;
mod gas;
mod liquid;
mod powder;

pub use fire::FireBehavior;
pub use gas::GasBehavior;
pub use liquid::LiquidBehavior;
pub use powder::PowderBehavior;

use crate::core::{IVec2, TickRng};
use crate::domain::{Category, ElementCatalog, ElementDef, ElementId};
use crate::spatial::{Cell, Grid};

/// Tunables the per-cell rules read every tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateParams {
    pub thermal_rate: f32,
    pub thermal_epsilon: f32,
    pub fire_cooling: f32,
    pub ambient_temp: f32,
}

impl Default for UpdateParams {
    fn default() -> Self {
        Self { thermal_rate: 0.5, thermal_epsilon: 0.05, fire_cooling: 0.02, ambient_temp: 20.0 }
    }
}

/// Work done by one grid pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateCounters {
    pub cells: u32,
    pub reactions: u32,
    pub phase_changes: u32,
    pub ignitions: u32,
}

/// Everything one cell update may touch
pub struct UpdateContext<'a> {
    pub grid: &'a mut Grid,
    pub catalog: &'a ElementCatalog,
    pub rng: &'a mut TickRng,
    pub params: &'a UpdateParams,
    pub counters: &'a mut UpdateCounters,
    pub pos: IVec2,
    pub phase: bool,
}

impl<'a> UpdateContext<'a> {
    #[inline]
    pub fn cell_at(&self, pos: IVec2) -> Option<Cell> {
        self.grid.cell(pos).copied()
    }

    /// Neighbor the grid pass may rewrite: present and not owned by a body.
    #[inline]
    pub fn writable_at(&self, pos: IVec2) -> Option<Cell> {
        self.cell_at(pos).filter(|c| !c.is_rigid())
    }

    #[inline]
    pub fn def(&self, id: ElementId) -> &'a ElementDef {
        self.catalog.get(id)
    }

    /// Fresh cell of `id`, already marked as processed this tick.
    pub fn spawn(&mut self, id: ElementId) -> Cell {
        let seed = (self.rng.next_u32() & 0xFF) as u8;
        self.catalog.make_cell(id, seed, self.phase)
    }

    /// Overwrite a grid-owned slot, growing dirty rects and flagging the chunk collider when
    /// the slot's collidability flips.
    pub fn write(&mut self, pos: IVec2, cell: Cell) {
        let Some(slot) = self.grid.cell_mut(pos) else {
            return;
        };
        debug_assert!(!slot.is_rigid(), "grid pass wrote body-owned slot {:?}", pos);
        let was_collidable = self.catalog.is_collidable(slot.element);
        *slot = cell;
        if was_collidable != self.catalog.is_collidable(cell.element) {
            self.grid.mark_collider_stale(pos);
        }
        self.grid.mark_dirty(pos);
    }

    /// Put `cell` (the possibly modified content of `from`) at `to` and whatever `to` held
    /// at `from`. The displaced cell counts as processed for this tick.
    pub fn move_to(&mut self, from: IVec2, to: IVec2, cell: Cell) -> bool {
        let Some(mut displaced) = self.writable_at(to) else {
            return false;
        };
        displaced.updated = self.phase;
        self.write(from, displaced);
        self.write(to, cell);
        true
    }

    #[inline]
    pub fn mark_dirty(&mut self, pos: IVec2) {
        self.grid.mark_dirty(pos);
    }

    /// `pos` holds something a mover of `density` may swap with. Absent chunks and body
    /// cells are walls; empty always yields.
    pub fn can_displace(&self, pos: IVec2, density: f32) -> bool {
        let Some(target) = self.writable_at(pos) else {
            return false;
        };
        if target.is_empty() {
            return true;
        }
        let def = self.def(target.element);
        def.category.is_fluid() && def.density < density
    }

    /// Solid for the diagonal corner guard: walls, body cells and static solids.
    pub fn is_solid_at(&self, pos: IVec2) -> bool {
        match self.cell_at(pos) {
            None => true,
            Some(c) if c.is_rigid() => true,
            Some(c) => !c.is_empty() && self.catalog.category(c.element) == Category::Solid,
        }
    }
}

/// Behavior trait - each movable category implements this
pub trait Behavior {
    fn update(&self, ctx: &mut UpdateContext, cell: Cell);
}

/// Behavior registry - dispatch by category
pub struct BehaviorRegistry {
    powder: PowderBehavior,
    liquid: LiquidBehavior,
    gas: GasBehavior,
    fire: FireBehavior,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self {
            powder: PowderBehavior,
            liquid: LiquidBehavior,
            gas: GasBehavior,
            fire: FireBehavior,
        }
    }

    pub fn update(&self, category: Category, ctx: &mut UpdateContext, cell: Cell) {
        match category {
            Category::MovableSolid => self.powder.update(ctx, cell),
            Category::Liquid => self.liquid.update(ctx, cell),
            Category::Gas => self.gas.update(ctx, cell),
            Category::Fire => self.fire.update(ctx, cell),
            Category::Solid => {}
        }
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::spatial::ChunkCoord;

    /// Single-chunk grid plus everything an `UpdateContext` borrows.
    pub struct Bench {
        pub grid: Grid,
        pub catalog: ElementCatalog,
        pub rng: TickRng,
        pub params: UpdateParams,
        pub counters: UpdateCounters,
    }

    impl Bench {
        pub fn new() -> Self {
            let mut grid = Grid::new(2, 20.0);
            grid.ensure_chunk(ChunkCoord::new(0, 0));
            Self {
                grid,
                catalog: ElementCatalog::builtin(),
                rng: TickRng::new(1, ChunkCoord::new(0, 0), 0),
                params: UpdateParams::default(),
                counters: UpdateCounters::default(),
            }
        }

        pub fn put(&mut self, x: i32, y: i32, id: ElementId) {
            let cell = self.catalog.make_cell(id, 0, !self.grid.phase());
            self.grid.set_cell(IVec2::new(x, y), cell);
        }

        pub fn element(&self, x: i32, y: i32) -> ElementId {
            self.grid.cell(IVec2::new(x, y)).map(|c| c.element).unwrap_or_default()
        }

        pub fn ctx(&mut self, x: i32, y: i32) -> UpdateContext<'_> {
            UpdateContext {
                phase: self.grid.phase(),
                grid: &mut self.grid,
                catalog: &self.catalog,
                rng: &mut self.rng,
                params: &self.params,
                counters: &mut self.counters,
                pos: IVec2::new(x, y),
            }
        }

        /// Run the category behavior of the cell at (x, y) once.
        pub fn run(&mut self, x: i32, y: i32) {
            let Some(cell) = self.grid.cell(IVec2::new(x, y)).copied() else {
                return;
            };
            let category = self.catalog.category(cell.element);
            let registry = BehaviorRegistry::new();
            let mut ctx = self.ctx(x, y);
            registry.update(category, &mut ctx, cell);
        }
    }
}
