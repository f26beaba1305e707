//! Pairwise chemical reactions between a cell and its cardinal neighbors

use crate::core::IVec2;

use super::behaviors::UpdateContext;
use crate::spatial::Cell;

/// Try the catalog's reaction rules against each neighbor in cardinal order. The first rule
/// whose probability roll succeeds rewrites both cells; returns whether one fired.
///
/// Body-owned neighbors never react, the grid may not write them.
pub fn try_react(ctx: &mut UpdateContext, cell: &Cell) -> bool {
    for dir in IVec2::CARDINAL {
        let n = ctx.pos + dir;
        let Some(other) = ctx.writable_at(n) else {
            continue;
        };
        let Some(rule) = ctx.catalog.reaction(cell.element, other.element) else {
            continue;
        };
        if !ctx.rng.chance(rule.probability) {
            continue;
        }

        let temperature = (cell.temperature + other.temperature) * 0.5;
        let mut out_self = ctx.spawn(rule.out_a);
        let mut out_other = ctx.spawn(rule.out_b);
        out_self.temperature = temperature;
        out_other.temperature = temperature;

        let pos = ctx.pos;
        ctx.write(pos, out_self);
        ctx.write(n, out_other);
        ctx.counters.reactions += 1;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::elements::{EL_ICE, EL_LAVA, EL_SAND, EL_STEAM, EL_STONE, EL_WATER};
    use crate::systems::behaviors::test_support::Bench;

    fn react_at(bench: &mut Bench, x: i32, y: i32) -> bool {
        let cell = bench.grid.cell(IVec2::new(x, y)).copied().unwrap();
        let mut ctx = bench.ctx(x, y);
        try_react(&mut ctx, &cell)
    }

    #[test]
    fn lava_and_water_make_stone_and_steam_from_either_side() {
        for (lava_x, water_x) in [(5, 6), (6, 5)] {
            let mut bench = Bench::new();
            bench.put(lava_x, 5, EL_LAVA);
            bench.put(water_x, 5, EL_WATER);
            assert!(react_at(&mut bench, water_x, 5));
            assert_eq!(bench.element(lava_x, 5), EL_STONE);
            assert_eq!(bench.element(water_x, 5), EL_STEAM);
            assert_eq!(bench.counters.reactions, 1);
        }
    }

    #[test]
    fn outputs_share_the_mean_temperature() {
        let mut bench = Bench::new();
        bench.put(5, 5, EL_LAVA);
        bench.put(5, 6, EL_WATER);
        bench.grid.cell_mut(IVec2::new(5, 5)).unwrap().temperature = 1000.0;
        bench.grid.cell_mut(IVec2::new(5, 6)).unwrap().temperature = 20.0;
        assert!(react_at(&mut bench, 5, 5));
        for y in [5, 6] {
            assert_eq!(bench.grid.cell(IVec2::new(5, y)).unwrap().temperature, 510.0);
        }
    }

    #[test]
    fn tag_rule_fires_for_molten_and_frozen() {
        let mut bench = Bench::new();
        bench.put(5, 5, EL_ICE);
        bench.put(5, 4, EL_LAVA);
        // 60% rule: retry until the roll succeeds
        assert!((0..64).any(|_| react_at(&mut bench, 5, 5)));
        assert_eq!(bench.element(5, 4), EL_STONE);
        assert_eq!(bench.element(5, 5), EL_WATER);
    }

    #[test]
    fn unrelated_neighbors_do_nothing() {
        let mut bench = Bench::new();
        bench.put(5, 5, EL_SAND);
        bench.put(5, 6, EL_WATER);
        assert!(!react_at(&mut bench, 5, 5));
        assert_eq!(bench.element(5, 5), EL_SAND);
    }
}
