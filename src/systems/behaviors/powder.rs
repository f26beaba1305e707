//! PowderBehavior - sand, ash and other movable solids
//!
//! Falls straight down into empty space or lighter fluids. Once blocked it keeps rolling
//! diagonally while `sliding`, each tick losing a friction-gated coin flip to stop.

use super::{Behavior, UpdateContext};
use crate::core::IVec2;
use crate::domain::Category;
use crate::spatial::Cell;

pub struct PowderBehavior;

impl PowderBehavior {
    /// "Corner cutting" guard for diagonal moves.
    ///
    /// A 1px staircase wall is only watertight if grains cannot slip between two solids that
    /// touch diagonally, so the move is refused when both orthogonal cells are solid.
    #[inline]
    fn is_corner_blocked(ctx: &UpdateContext, pos: IVec2, dx: i32) -> bool {
        ctx.is_solid_at(pos.offset(dx, 0)) && ctx.is_solid_at(pos + IVec2::DOWN)
    }

    fn settle(ctx: &mut UpdateContext, mut cell: Cell) {
        cell.sliding = false;
        cell.bias = 0;
        ctx.write(ctx.pos, cell);
    }
}

impl Behavior for PowderBehavior {
    fn update(&self, ctx: &mut UpdateContext, mut cell: Cell) {
        let pos = ctx.pos;
        let def = ctx.def(cell.element);
        let below = pos + IVec2::DOWN;

        if ctx.can_displace(below, def.density) {
            cell.sliding = true;
            ctx.move_to(pos, below, cell);
            return;
        }

        // Wait for a grain below that is still settling instead of rolling off it.
        if let Some(support) = ctx.writable_at(below) {
            if support.sliding && ctx.catalog.category(support.element) == Category::MovableSolid {
                ctx.mark_dirty(pos);
                return;
            }
        }

        if !cell.sliding {
            return;
        }

        if ctx.rng.chance(def.friction) {
            Self::settle(ctx, cell);
            return;
        }

        let first = if cell.bias != 0 { cell.bias as i32 } else { ctx.rng.sign() };
        for dx in [first, -first] {
            let diagonal = pos.offset(dx, 1);
            if Self::is_corner_blocked(ctx, pos, dx) || !ctx.can_displace(diagonal, def.density) {
                continue;
            }
            cell.bias = dx as i8;
            ctx.move_to(pos, diagonal, cell);
            return;
        }

        Self::settle(ctx, cell);
    }
}
