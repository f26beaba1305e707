use crate::domain::{ElementDef, ElementId};
use crate::spatial::Cell;
use crate::systems::behaviors::UpdateContext;

/// Element `def` turns into at `temp`, if any. Melting is checked before freezing.
pub fn check_phase_change(def: &ElementDef, temp: f32) -> Option<ElementId> {
    if let Some(melt) = def.melt {
        if temp > melt.threshold {
            return Some(melt.into);
        }
    }
    if let Some(freeze) = def.freeze {
        if temp < freeze.threshold {
            return Some(freeze.into);
        }
    }
    None
}

/// Swap the cell's element when its temperature crossed a threshold. The new cell keeps the
/// old temperature. Returns whether a change happened.
pub fn apply_phase_change(ctx: &mut UpdateContext, cell: &Cell) -> bool {
    let Some(into) = check_phase_change(ctx.def(cell.element), cell.temperature) else {
        return false;
    };
    let mut next = ctx.spawn(into);
    next.temperature = cell.temperature;
    let pos = ctx.pos;
    ctx.write(pos, next);
    ctx.counters.phase_changes += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IVec2;
    use crate::domain::elements::{EL_ICE, EL_LAVA, EL_SAND, EL_STEAM, EL_STONE, EL_WATER};
    use crate::domain::ElementCatalog;
    use crate::systems::behaviors::test_support::Bench;

    #[test]
    fn thresholds_are_strict() {
        let catalog = ElementCatalog::builtin();
        let water = catalog.get(EL_WATER);
        assert_eq!(check_phase_change(water, 100.0), None);
        assert_eq!(check_phase_change(water, 100.5), Some(EL_STEAM));
        assert_eq!(check_phase_change(water, -0.5), Some(EL_ICE));
        assert_eq!(check_phase_change(catalog.get(EL_LAVA), 650.0), Some(EL_STONE));
        assert_eq!(check_phase_change(catalog.get(EL_SAND), 20.0), None);
    }

    #[test]
    fn change_preserves_temperature() {
        let mut bench = Bench::new();
        bench.put(5, 5, EL_STONE);
        bench.grid.cell_mut(IVec2::new(5, 5)).unwrap().temperature = 950.0;
        let cell = bench.grid.cell(IVec2::new(5, 5)).copied().unwrap();
        let mut ctx = bench.ctx(5, 5);
        assert!(apply_phase_change(&mut ctx, &cell));
        let after = bench.grid.cell(IVec2::new(5, 5)).copied().unwrap();
        assert_eq!(after.element, EL_LAVA);
        assert_eq!(after.temperature, 950.0);
        assert_eq!(bench.counters.phase_changes, 1);
    }
}
