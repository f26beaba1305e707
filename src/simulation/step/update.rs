use crate::systems::combustion::burn;
use crate::systems::reactions::try_react;
use crate::systems::temperature::{apply_phase_change, diffuse};
use crate::systems::{BehaviorRegistry, UpdateContext};

/// Update one cell: reactions, heat, phase change, combustion, then movement. Each stage
/// that rewrites the cell into something else ends the update for this tick.
pub(super) fn update_cell(ctx: &mut UpdateContext, behaviors: &BehaviorRegistry) {
    let pos = ctx.pos;
    let phase = ctx.phase;
    let Some(slot) = ctx.grid.cell_mut(pos) else {
        return;
    };
    if slot.updated == phase || slot.is_rigid() {
        return;
    }
    // Mark first, so a swap that carries this cell further along the scan skips it.
    slot.updated = phase;
    let cell = *slot;
    if cell.is_empty() || !ctx.catalog.is_valid_element_id(cell.element) {
        return;
    }
    ctx.counters.cells += 1;

    if try_react(ctx, &cell) {
        return;
    }

    let cell = diffuse(ctx, cell);

    if apply_phase_change(ctx, &cell) {
        return;
    }

    let (cell, burnt_out) = burn(ctx, cell);
    if burnt_out {
        return;
    }

    let category = ctx.catalog.category(cell.element);
    behaviors.update(category, ctx, cell);
}
