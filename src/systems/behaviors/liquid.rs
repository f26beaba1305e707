//! LiquidBehavior - falls, then scans sideways
//!
//! A blocked liquid "scans & teleports" up to `dispersion` cells along the row, trying a
//! random side first and the other side as fallback. The scan stops early above a drop so
//! liquids pour off ledges instead of skating over them.

use super::{Behavior, UpdateContext};
use crate::core::IVec2;
use crate::spatial::Cell;

pub struct LiquidBehavior;

impl LiquidBehavior {
    /// Farthest reachable cell along the row in direction `dir`.
    fn scan_line(ctx: &UpdateContext, start: IVec2, dir: i32, range: i32, density: f32) -> Option<IVec2> {
        let mut best = None;
        for i in 1..=range {
            let target = start.offset(dir * i, 0);
            if !ctx.can_displace(target, density) {
                break;
            }
            best = Some(target);
            if ctx.can_displace(target + IVec2::DOWN, density) {
                break;
            }
        }
        best
    }
}

impl Behavior for LiquidBehavior {
    fn update(&self, ctx: &mut UpdateContext, cell: Cell) {
        let pos = ctx.pos;
        let def = ctx.def(cell.element);
        let below = pos + IVec2::DOWN;

        if ctx.can_displace(below, def.density) {
            ctx.move_to(pos, below, cell);
            return;
        }

        let range = def.dispersion.max(1) as i32;
        let first = ctx.rng.sign();
        for dir in [first, -first] {
            if let Some(target) = Self::scan_line(ctx, pos, dir, range, def.density) {
                ctx.move_to(pos, target, cell);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::elements::{EL_EMPTY, EL_OIL, EL_STONE, EL_WATER};
    use crate::systems::behaviors::test_support::Bench;

    #[test]
    fn spreads_along_a_floor() {
        let mut bench = Bench::new();
        for x in 0..20 {
            bench.put(x, 6, EL_STONE);
        }
        bench.put(10, 5, EL_WATER);
        bench.run(10, 5);
        assert_eq!(bench.element(10, 5), EL_EMPTY);
        let moved = (6..=14).filter(|&x| bench.element(x, 5) == EL_WATER).count();
        assert_eq!(moved, 1);
        assert!(bench.element(6, 5) == EL_WATER || bench.element(14, 5) == EL_WATER);
    }

    #[test]
    fn stops_above_a_drop() {
        let mut bench = Bench::new();
        for x in 0..20 {
            if x != 12 {
                bench.put(x, 6, EL_STONE);
            }
        }
        bench.put(9, 5, EL_STONE);
        bench.put(10, 5, EL_WATER);
        bench.run(10, 5);
        assert_eq!(bench.element(12, 5), EL_WATER);
    }

    #[test]
    fn heavier_liquid_sinks_below_lighter() {
        let mut bench = Bench::new();
        bench.put(3, 3, EL_WATER);
        bench.put(3, 4, EL_OIL);
        bench.run(3, 3);
        assert_eq!(bench.element(3, 3), EL_OIL);
        assert_eq!(bench.element(3, 4), EL_WATER);
    }

    #[test]
    fn walled_in_liquid_stays_put() {
        let mut bench = Bench::new();
        for (x, y) in [(2, 4), (4, 4), (3, 5)] {
            bench.put(x, y, EL_STONE);
        }
        bench.put(3, 4, EL_WATER);
        bench.run(3, 4);
        assert_eq!(bench.element(3, 4), EL_WATER);
    }
}
