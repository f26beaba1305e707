//! GasBehavior - inverted density: rises through empty space and denser fluids

use super::{Behavior, UpdateContext};
use crate::core::IVec2;
use crate::spatial::Cell;

pub struct GasBehavior;

impl GasBehavior {
    fn can_rise_into(ctx: &UpdateContext, pos: IVec2, density: f32) -> bool {
        let Some(target) = ctx.writable_at(pos) else {
            return false;
        };
        if target.is_empty() {
            return true;
        }
        let def = ctx.def(target.element);
        def.category.is_fluid() && def.density > density
    }
}

impl Behavior for GasBehavior {
    fn update(&self, ctx: &mut UpdateContext, cell: Cell) {
        let pos = ctx.pos;
        let density = ctx.def(cell.element).density;
        let side = ctx.rng.sign();

        let candidates = [
            IVec2::UP,
            IVec2::new(side, -1),
            IVec2::new(-side, -1),
            IVec2::new(side, 0),
            IVec2::new(-side, 0),
        ];
        for dir in candidates {
            let target = pos + dir;
            if Self::can_rise_into(ctx, target, density) {
                ctx.move_to(pos, target, cell);
                return;
            }
        }
    }
}
