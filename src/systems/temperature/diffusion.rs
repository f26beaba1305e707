use crate::core::IVec2;
use crate::spatial::Cell;
use crate::systems::behaviors::UpdateContext;

/// Exchange heat with each present neighbor. Body-owned neighbors heat or cool this cell but
/// are never written. Returns the updated cell, already stored in the grid.
pub fn diffuse(ctx: &mut UpdateContext, mut cell: Cell) -> Cell {
    let def = ctx.def(cell.element);
    if def.conductivity == 0 {
        return cell;
    }
    let self_damping = def.density.max(1.0);
    let start_temp = cell.temperature;

    for dir in IVec2::CARDINAL {
        let n = ctx.pos + dir;
        let Some(other) = ctx.cell_at(n) else {
            continue;
        };
        let other_def = ctx.def(other.element);
        let conductivity = def.conductivity.min(other_def.conductivity);
        if conductivity == 0 {
            continue;
        }

        let rate = conductivity as f32 / 100.0 * ctx.params.thermal_rate;
        let diff = other.temperature - cell.temperature;
        cell.temperature += diff * rate / self_damping;

        if other.is_rigid() {
            continue;
        }
        let delta = -diff * rate / other_def.density.max(1.0);
        if let Some(slot) = ctx.grid.cell_mut(n) {
            slot.temperature += delta;
        }
        if delta.abs() > ctx.params.thermal_epsilon {
            ctx.mark_dirty(n);
        }
    }

    let pos = ctx.pos;
    if let Some(slot) = ctx.grid.cell_mut(pos) {
        slot.temperature = cell.temperature;
    }
    if (cell.temperature - start_temp).abs() > ctx.params.thermal_epsilon {
        ctx.mark_dirty(pos);
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IVec2;
    use crate::domain::elements::{EL_METAL, EL_STONE};
    use crate::spatial::{BodyId, Owner};
    use crate::systems::behaviors::test_support::Bench;

    fn temp(bench: &Bench, x: i32, y: i32) -> f32 {
        bench.grid.cell(IVec2::new(x, y)).unwrap().temperature
    }

    fn run(bench: &mut Bench, x: i32, y: i32) {
        let cell = bench.grid.cell(IVec2::new(x, y)).copied().unwrap();
        let mut ctx = bench.ctx(x, y);
        diffuse(&mut ctx, cell);
    }

    #[test]
    fn heat_flows_from_hot_to_cold() {
        let mut bench = Bench::new();
        bench.put(5, 5, EL_METAL);
        bench.put(6, 5, EL_METAL);
        bench.grid.cell_mut(IVec2::new(5, 5)).unwrap().temperature = 500.0;
        run(&mut bench, 5, 5);
        let hot = temp(&bench, 5, 5);
        let cold = temp(&bench, 6, 5);
        assert!(hot < 500.0 && cold > 20.0);
        assert!(hot > cold);
    }

    #[test]
    fn empty_air_does_not_conduct() {
        let mut bench = Bench::new();
        bench.put(5, 5, EL_STONE);
        bench.grid.cell_mut(IVec2::new(5, 5)).unwrap().temperature = 500.0;
        run(&mut bench, 5, 5);
        assert_eq!(temp(&bench, 5, 5), 500.0);
        assert_eq!(temp(&bench, 5, 4), 20.0);
    }

    #[test]
    fn body_cells_are_read_only() {
        let mut bench = Bench::new();
        bench.put(5, 5, EL_METAL);
        bench.put(6, 5, EL_METAL);
        bench.grid.cell_mut(IVec2::new(5, 5)).unwrap().temperature = 500.0;
        bench.grid.cell_mut(IVec2::new(6, 5)).unwrap().owner = Owner::Body(BodyId(1));
        run(&mut bench, 5, 5);
        assert!(temp(&bench, 5, 5) < 500.0);
        assert_eq!(temp(&bench, 6, 5), 20.0);
    }
}
